use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::{App, Tab};
use crate::queries::CATALOG;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // If there's a status message, show it prominently
    if let Some(ref message) = app.status_message {
        let line = Line::from(vec![Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        )]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    // Build running task indicators
    let running_tasks = app.task_manager.running_tasks();
    let task_indicators: String = if running_tasks.is_empty() {
        String::new()
    } else {
        let indicators: Vec<String> = running_tasks
            .iter()
            .map(|task| {
                if let Some(ref progress) = task.progress {
                    format!("[{}:{}%]", task.task_type.short_name(), progress.percent())
                } else {
                    format!("[{}:...]", task.task_type.short_name())
                }
            })
            .collect();
        indicators.join(" ")
    };

    let staged = match app.staged.as_ref() {
        Some(staged) => format!(
            " staged: {} ({} records) ",
            staged.classification, staged.fetched
        ),
        None => " nothing staged ".to_string(),
    };

    let mut spans = Vec::new();

    // Left: database path
    spans.push(Span::styled(
        format!(" {} ", app.config.db_path.to_string_lossy()),
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    // Middle: staged batch summary
    spans.push(Span::styled(staged, Style::default().fg(Color::Gray)));

    // Task indicators (if any)
    if !task_indicators.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", task_indicators),
            Style::default().fg(Color::Cyan),
        ));
    }

    let position = match app.active_tab {
        Tab::Collect => format!(
            "{}/{}",
            app.classification_index + 1,
            app.config.classifications.len()
        ),
        Tab::Load => String::new(),
        Tab::Queries => format!("{}/{}", app.query_index + 1, CATALOG.len()),
    };

    let hints = match app.active_tab {
        Tab::Collect => "Enter:fetch a:key",
        Tab::Load => "i:insert",
        Tab::Queries => "Enter:run e:export",
    };

    let help_text = if position.is_empty() {
        format!(" {} ?:help q:quit ", hints)
    } else {
        format!(" {} | {} ?:help q:quit ", position, hints)
    };

    // Calculate remaining space and pad so hints sit on the right edge
    let content_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let help_len = help_text.chars().count();
    let available = area.width as usize;
    if available > content_len + help_len {
        spans.push(Span::raw(" ".repeat(available - content_len - help_len)));
    }

    spans.push(Span::styled(
        help_text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
