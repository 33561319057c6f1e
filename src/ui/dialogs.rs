use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render_help(frame: &mut Frame, area: Rect) {
    // Center the help dialog
    let dialog_width = 58.min(area.width.saturating_sub(4));
    let dialog_height = 26.min(area.height.saturating_sub(4));

    let x = (area.width - dialog_width) / 2;
    let y = (area.height - dialog_height) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Tabs",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from("  Tab / S-Tab  Next / previous tab"),
        Line::from("  1 2 3        Jump to Collect / Load / Queries"),
        Line::from(""),
        Line::from(Span::styled(
            "Collect",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from("  j / k        Select classification"),
        Line::from("  Enter        Fetch records for the selection"),
        Line::from("  a            Set API key"),
        Line::from(""),
        Line::from(Span::styled(
            "Load",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from("  i            Insert staged rows into the database"),
        Line::from(""),
        Line::from(Span::styled(
            "Queries",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from("  j / k        Select query"),
        Line::from("  Enter        Run the selected query"),
        Line::from("  J / K        Scroll results"),
        Line::from("  e            Export results"),
        Line::from(""),
        Line::from("  Esc          Cancel running task"),
        Line::from("  q            Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, dialog_area);
}
