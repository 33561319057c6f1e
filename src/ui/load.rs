//! Load tab: staged batch summary and database table statistics.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);

    render_staged(frame, app, chunks[0]);
    render_database(frame, app, chunks[1]);
}

fn render_staged(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.staged.as_ref() {
        Some(staged) => vec![
            kv("classification", staged.classification.clone()),
            kv(
                "fetched at",
                staged.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            ),
            kv("records", staged.fetched.to_string()),
            kv("metadata rows", staged.batch.metadata.len().to_string()),
            kv("media rows", staged.batch.media.len().to_string()),
            kv("color rows", staged.batch.colors.len().to_string()),
            Line::from(""),
            Line::from(Span::styled(
                "Press i to insert the staged rows",
                Style::default().fg(Color::Green),
            )),
        ],
        None => vec![
            Line::from(Span::styled(
                "Nothing staged.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Collect data on the Collect tab first.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Staged Batch ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, area);
}

fn render_database(frame: &mut Frame, app: &App, area: Rect) {
    let stats = &app.table_stats;
    let lines = vec![
        kv("path", app.config.db_path.to_string_lossy().to_string()),
        Line::from(""),
        kv("artifact_metadata", format!("{} rows", stats.metadata)),
        kv("artifact_media", format!("{} rows", stats.media)),
        kv("artifact_colors", format!("{} rows", stats.colors)),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Database ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

fn kv(key: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<16}", key), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}
