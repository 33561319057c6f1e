use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use std::path::PathBuf;

use crate::export::ExportFormat;

/// State for the query result export dialog
pub struct ExportDialog {
    /// Selected format
    pub format: ExportFormat,
    /// Output path
    pub output_path: PathBuf,
    /// Available formats
    formats: Vec<ExportFormat>,
    /// Selected format index
    selected_index: usize,
}

impl ExportDialog {
    pub fn new(default_dir: PathBuf) -> Self {
        let formats = vec![ExportFormat::Json, ExportFormat::Csv, ExportFormat::Html];

        Self {
            format: ExportFormat::Json,
            output_path: default_dir.join("curio_results.json"),
            formats,
            selected_index: 0,
        }
    }

    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.update_format();
        }
    }

    pub fn move_down(&mut self) {
        if self.selected_index < self.formats.len() - 1 {
            self.selected_index += 1;
            self.update_format();
        }
    }

    fn update_format(&mut self) {
        self.format = self.formats[self.selected_index];
        // Keep the output extension in sync with the format
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "curio_results".to_string());

        if let Some(parent) = self.output_path.parent() {
            self.output_path = parent.join(format!("{}.{}", stem, self.format.extension()));
        }
    }

    pub fn selected_format(&self) -> ExportFormat {
        self.format
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }
}

pub fn render(frame: &mut Frame, dialog: &ExportDialog, area: Rect) {
    // Center the dialog
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 15.min(area.height.saturating_sub(4));

    let x = (area.width - dialog_width) / 2;
    let y = (area.height - dialog_height) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(5), // Format selection
            Constraint::Length(3), // Output path
            Constraint::Length(2), // Footer
        ])
        .split(dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Export Results ")
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(block, dialog_area);

    let header =
        Paragraph::new("Select export format:").style(Style::default().fg(Color::Green));
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = dialog
        .formats
        .iter()
        .map(|f| {
            let desc = match f {
                ExportFormat::Json => "JSON - Array of row objects",
                ExportFormat::Csv => "CSV  - Spreadsheet compatible",
                ExportFormat::Html => "HTML - Table report",
            };
            ListItem::new(desc)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(dialog.selected_index));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    let path = Paragraph::new(dialog.output_path.to_string_lossy().to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Output ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(path, chunks[2]);

    let footer = Paragraph::new("Enter: export | ↑↓: format | Esc: cancel")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);
}
