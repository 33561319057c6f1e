//! Collect tab: classification selector plus a preview of the first
//! staged record's three projections.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::App;
use crate::harvest::flatten::SampleRecord;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    render_selector(frame, app, chunks[0]);
    render_preview(frame, app, chunks[1]);
}

fn render_selector(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(area);

    let items: Vec<ListItem> = app
        .config
        .classifications
        .iter()
        .map(|c| ListItem::new(c.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Classification ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.config.classifications.is_empty() {
        state.select(Some(app.classification_index));
    }
    frame.render_stateful_widget(list, rows[0], &mut state);

    let key_status = if app.api_key.is_some() {
        Span::styled("configured", Style::default().fg(Color::Green))
    } else {
        Span::styled("missing (press a)", Style::default().fg(Color::Red))
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("API key: ", Style::default().fg(Color::Gray)),
            key_status,
        ]),
        Line::from(format!("Target: {} records", app.config.api.target_records)),
        Line::from(format!("Page size: {}", app.config.api.page_size)),
        Line::from(format!("Delay: {} ms/page", app.config.api.rate_limit_ms)),
    ];
    let fetch = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Fetch ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(fetch, rows[1]);
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let (title, sample) = match app.staged.as_ref() {
        Some(staged) => (
            format!(
                " Sample Record ({}, {} fetched) ",
                staged.classification, staged.fetched
            ),
            staged.batch.sample(),
        ),
        None => (" Sample Record ".to_string(), None),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(sample) = sample else {
        let info = Paragraph::new(
            "No staged data.\n\nSelect a classification and press Enter to collect records.",
        )
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
        frame.render_widget(info, inner);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(inner);

    render_metadata_column(frame, &sample, columns[0]);
    render_media_column(frame, &sample, columns[1]);
    render_colors_column(frame, &sample, columns[2]);
}

fn render_metadata_column(frame: &mut Frame, sample: &SampleRecord, area: Rect) {
    let m = sample.metadata;
    let lines = vec![
        kv("id", m.id.to_string()),
        kv("title", text(&m.title)),
        kv("culture", text(&m.culture)),
        kv("period", text(&m.period)),
        kv("century", text(&m.century)),
        kv("medium", text(&m.medium)),
        kv("dimensions", text(&m.dimensions)),
        kv("description", text(&m.description)),
        kv("department", text(&m.department)),
        kv("classification", text(&m.classification)),
        kv("accessionyear", num(m.accessionyear)),
        kv("accessionmethod", text(&m.accessionmethod)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(column_block(" Metadata "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_media_column(frame: &mut Frame, sample: &SampleRecord, area: Rect) {
    let lines = match sample.media {
        Some(m) => vec![
            kv("objectid", m.objectid.to_string()),
            kv("imagecount", num(m.imagecount)),
            kv("mediacount", num(m.mediacount)),
            kv("colorcount", m.colorcount.to_string()),
            kv("rank", num(m.rank)),
            kv("datebegin", num(m.datebegin)),
            kv("dateend", num(m.dateend)),
        ],
        None => vec![Line::from("(none)")],
    };

    let paragraph = Paragraph::new(lines)
        .block(column_block(" Media "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_colors_column(frame: &mut Frame, sample: &SampleRecord, area: Rect) {
    let mut lines = Vec::new();
    if sample.colors.is_empty() {
        lines.push(Line::from(Span::styled(
            "(no color entries)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for color in &sample.colors {
        let percent = color
            .percent
            .map(|p| format!("{:.2}", p))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(
                color.hue.as_deref().unwrap_or("(no hue)").to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("  "),
            Span::styled(percent, Style::default().fg(Color::Green)),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "  {} {}",
                color.color.as_deref().unwrap_or(""),
                color.css3.as_deref().unwrap_or("")
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(column_block(" Colours "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn column_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn kv(key: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", key), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn num(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}
