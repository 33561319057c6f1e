//! Queries tab: the fixed catalog on the left, results table on the right.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::{App, QueryResults};
use crate::queries::CATALOG;

/// Widest a results column is allowed to render.
const MAX_COLUMN_WIDTH: usize = 32;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_catalog(frame, app, chunks[0]);

    match app.results.as_ref() {
        Some(results) => render_results(frame, results, app.results_scroll, chunks[1]),
        None => {
            let info = Paragraph::new("Select a query and press Enter to run it.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Results ")
                        .border_style(Style::default().fg(Color::DarkGray)),
                );
            frame.render_widget(info, chunks[1]);
        }
    }
}

fn render_catalog(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = CATALOG.iter().map(|q| ListItem::new(q.label)).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Query Catalog ({}) ", CATALOG.len()))
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
    state.select(Some(app.query_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_results(frame: &mut Frame, results: &QueryResults, scroll: usize, area: Rect) {
    let total = results.set.rows.len();

    if total == 0 {
        let info = Paragraph::new("(no rows)")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} (0 rows) ", results.label))
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(info, area);
        return;
    }

    // Borders, header row and header spacing
    let visible_height = area.height.saturating_sub(4).max(1) as usize;
    let start = scroll.min(total.saturating_sub(1));
    let end = (start + visible_height).min(total);
    let visible = &results.set.rows[start..end];

    let widths: Vec<Constraint> = column_widths(&results.set.columns, visible)
        .into_iter()
        .map(|w| Constraint::Length(w as u16))
        .collect();

    let header = Row::new(
        results
            .set
            .columns
            .iter()
            .map(|c| Cell::from(c.as_str())),
    )
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let rows = visible
        .iter()
        .map(|row| Row::new(row.iter().map(|value| Cell::from(truncate(value)))));

    let title = format!(
        " {} ({}-{} of {} rows) ",
        results.label,
        start + 1,
        end,
        total
    );

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(table, area);
}

/// Column widths sized to the visible content, clamped to a sane range.
fn column_widths(columns: &[String], visible: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let content_max = visible
                .iter()
                .filter_map(|row| row.get(i))
                .map(|v| v.chars().count())
                .max()
                .unwrap_or(0);
            name.chars().count().max(content_max).clamp(4, MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_COLUMN_WIDTH {
        value.to_string()
    } else {
        let kept: String = value.chars().take(MAX_COLUMN_WIDTH - 3).collect();
        format!("{}...", kept)
    }
}
