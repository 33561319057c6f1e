use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

/// State for the API key entry dialog
pub struct ApiKeyDialog {
    /// Key input
    pub input: String,
    /// Cursor position
    pub cursor: usize,
}

impl ApiKeyDialog {
    pub fn new(current: Option<&str>) -> Self {
        let input = current.unwrap_or_default().to_string();
        let cursor = input.len();
        Self { input, cursor }
    }

    pub fn handle_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.input.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.input.len() {
            self.cursor += 1;
        }
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// The entered key, or None when the field was left empty.
    pub fn key(&self) -> Option<String> {
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

pub fn render(frame: &mut Frame, dialog: &ApiKeyDialog, area: Rect) {
    // Center the dialog
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 9.min(area.height.saturating_sub(4));

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
            Constraint::Length(3), // Key input
            Constraint::Length(2), // Footer
        ])
        .split(dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" API Key ")
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(block, dialog_area);

    let header = Paragraph::new("Key for api.harvardartmuseums.org (session only, not saved):")
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(header, chunks[0]);

    // Masked input with cursor
    let masked_before = "\u{2022}".repeat(dialog.cursor);
    let masked_after = "\u{2022}".repeat(dialog.input.len() - dialog.cursor);
    let input = Paragraph::new(Line::from(vec![
        Span::raw(masked_before),
        Span::styled(
            "|",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(masked_after),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Key ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(input, chunks[1]);

    let footer = Paragraph::new("Enter: apply | Ctrl+U: clear | Esc: cancel")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[2]);
}
