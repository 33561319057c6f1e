pub mod api_key_dialog;
mod collect;
mod dialogs;
pub mod export_dialog;
mod load;
mod queries_view;
mod status_bar;

use ratatui::prelude::*;
use ratatui::widgets::Tabs;

use crate::app::{App, AppMode, Tab};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Tab row + content + status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(frame, app, main_chunks[0]);

    match app.active_tab {
        Tab::Collect => collect::render(frame, app, main_chunks[1]),
        Tab::Load => load::render(frame, app, main_chunks[1]),
        Tab::Queries => queries_view::render(frame, app, main_chunks[1]),
    }

    status_bar::render(frame, app, main_chunks[2]);

    // Overlays
    match app.mode {
        AppMode::Help => dialogs::render_help(frame, area),
        AppMode::EditingApiKey => {
            if let Some(ref dialog) = app.api_key_dialog {
                api_key_dialog::render(frame, dialog, area);
            }
        }
        AppMode::Exporting => {
            if let Some(ref dialog) = app.export_dialog {
                export_dialog::render(frame, dialog, area);
            }
        }
        AppMode::Normal => {}
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.title())));

    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");

    frame.render_widget(tabs, area);
}
