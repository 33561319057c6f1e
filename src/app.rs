use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::db::{Database, ResultSet, TableStats};
use crate::export;
use crate::harvest::{Harvester, HarvestOutcome};
use crate::queries::CATALOG;
use crate::tasks::{BackgroundTaskManager, TaskProgress, TaskType, TaskUpdate};
use crate::ui;
use crate::ui::api_key_dialog::ApiKeyDialog;
use crate::ui::export_dialog::ExportDialog;

/// How far J/K move through query results.
const RESULTS_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    EditingApiKey,
    Exporting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Collect,
    Load,
    Queries,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Collect, Tab::Load, Tab::Queries];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Collect => "Collect",
            Tab::Load => "Load",
            Tab::Queries => "Queries",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Collect => 0,
            Tab::Load => 1,
            Tab::Queries => 2,
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Collect => Tab::Load,
            Tab::Load => Tab::Queries,
            Tab::Queries => Tab::Collect,
        }
    }

    pub fn prev(&self) -> Tab {
        match self {
            Tab::Collect => Tab::Queries,
            Tab::Load => Tab::Collect,
            Tab::Queries => Tab::Load,
        }
    }
}

/// The most recently executed catalog query and its rows.
pub struct QueryResults {
    pub label: String,
    pub set: ResultSet,
}

pub struct App {
    pub config: Config,
    pub db: Database,
    pub mode: AppMode,
    pub active_tab: Tab,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Resolved API key (env, config file or key dialog).
    pub api_key: Option<String>,
    pub classification_index: usize,
    /// Last fetch session, held in memory until inserted.
    pub staged: Option<HarvestOutcome>,
    pub table_stats: TableStats,
    pub query_index: usize,
    pub results: Option<QueryResults>,
    pub results_scroll: usize,
    // Background task manager
    pub task_manager: BackgroundTaskManager,
    // API key dialog state
    pub api_key_dialog: Option<ApiKeyDialog>,
    // Export dialog state
    pub export_dialog: Option<ExportDialog>,
    // Channel the running harvest ships its staged rows through
    harvest_rx: Option<mpsc::Receiver<HarvestOutcome>>,
}

impl App {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let api_key = config.api.resolve_api_key();
        let table_stats = db.table_stats()?;

        Ok(Self {
            config,
            db,
            mode: AppMode::Normal,
            active_tab: Tab::Collect,
            should_quit: false,
            status_message: None,
            api_key,
            classification_index: 0,
            staged: None,
            table_stats,
            query_index: 0,
            results: None,
            results_scroll: 0,
            task_manager: BackgroundTaskManager::new(),
            api_key_dialog: None,
            export_dialog: None,
            harvest_rx: None,
        })
    }

    pub fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        while !self.should_quit {
            // Poll for task updates and handle completions
            let completions = self.task_manager.poll_updates();
            for completion in completions {
                let prefix = completion.task_type.display_name();
                if completion.success {
                    self.status_message = Some(format!("{}: {}", prefix, completion.message));
                    if completion.task_type == TaskType::Insert {
                        self.refresh_stats();
                    }
                } else {
                    self.status_message = Some(format!("{} - {}", prefix, completion.message));
                }
            }

            self.poll_harvest_outcome();

            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key)?;
                }
            }
        }

        Ok(())
    }

    /// Pick up staged rows shipped back by a finished harvest thread.
    fn poll_harvest_outcome(&mut self) {
        if let Some(rx) = self.harvest_rx.take() {
            match rx.try_recv() {
                Ok(outcome) => {
                    self.staged = Some(outcome);
                }
                Err(mpsc::TryRecvError::Empty) => {
                    self.harvest_rx = Some(rx);
                }
                Err(mpsc::TryRecvError::Disconnected) => {}
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Any key closes the help overlay
        if self.mode == AppMode::Help {
            self.mode = AppMode::Normal;
            return Ok(());
        }

        if self.mode == AppMode::EditingApiKey {
            return self.handle_api_key_dialog_key(key);
        }

        if self.mode == AppMode::Exporting {
            return self.handle_export_dialog_key(key);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.task_manager.cancel_all();
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.mode = AppMode::Help;
            }
            KeyCode::Tab => {
                self.active_tab = self.active_tab.next();
            }
            KeyCode::BackTab => {
                self.active_tab = self.active_tab.prev();
            }
            KeyCode::Char('1') => self.active_tab = Tab::Collect,
            KeyCode::Char('2') => self.active_tab = Tab::Load,
            KeyCode::Char('3') => self.active_tab = Tab::Queries,
            KeyCode::Esc => {
                if self.task_manager.cancel_most_recent() {
                    self.status_message = Some("Cancelling task...".to_string());
                } else {
                    self.status_message = None;
                }
            }
            _ => match self.active_tab {
                Tab::Collect => self.handle_collect_key(key)?,
                Tab::Load => self.handle_load_key(key)?,
                Tab::Queries => self.handle_queries_key(key)?,
            },
        }

        Ok(())
    }

    fn handle_collect_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let last = self.config.classifications.len().saturating_sub(1);
                if self.classification_index < last {
                    self.classification_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.classification_index > 0 {
                    self.classification_index -= 1;
                }
            }
            KeyCode::Char('a') => {
                self.api_key_dialog = Some(ApiKeyDialog::new(self.api_key.as_deref()));
                self.mode = AppMode::EditingApiKey;
            }
            KeyCode::Enter | KeyCode::Char('c') => {
                self.start_harvest()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_load_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('i') {
            self.start_insert()?;
        }
        Ok(())
    }

    fn handle_queries_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.query_index + 1 < CATALOG.len() {
                    self.query_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.query_index > 0 {
                    self.query_index -= 1;
                }
            }
            KeyCode::Enter => {
                self.run_selected_query();
            }
            KeyCode::Char('J') | KeyCode::PageDown => {
                self.scroll_results(RESULTS_PAGE as isize);
            }
            KeyCode::Char('K') | KeyCode::PageUp => {
                self.scroll_results(-(RESULTS_PAGE as isize));
            }
            KeyCode::Char('e') => {
                self.open_export_dialog();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_api_key_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.api_key_dialog = None;
                self.mode = AppMode::Normal;
            }
            KeyCode::Enter => {
                if let Some(dialog) = self.api_key_dialog.take() {
                    self.api_key = dialog.key();
                    self.status_message = Some(
                        if self.api_key.is_some() {
                            "API key updated"
                        } else {
                            "API key cleared"
                        }
                        .to_string(),
                    );
                }
                self.mode = AppMode::Normal;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(ref mut dialog) = self.api_key_dialog {
                    dialog.clear();
                }
            }
            KeyCode::Char(c) => {
                if let Some(ref mut dialog) = self.api_key_dialog {
                    dialog.handle_char(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(ref mut dialog) = self.api_key_dialog {
                    dialog.backspace();
                }
            }
            KeyCode::Left => {
                if let Some(ref mut dialog) = self.api_key_dialog {
                    dialog.move_cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(ref mut dialog) = self.api_key_dialog {
                    dialog.move_cursor_right();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_export_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.export_dialog = None;
                self.mode = AppMode::Normal;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(ref mut dialog) = self.export_dialog {
                    dialog.move_up();
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if let Some(ref mut dialog) = self.export_dialog {
                    dialog.move_down();
                }
            }
            KeyCode::Enter => {
                if let (Some(dialog), Some(results)) =
                    (self.export_dialog.take(), self.results.as_ref())
                {
                    let path = dialog.output_path().clone();
                    match export::export_results(
                        &results.set,
                        &results.label,
                        &path,
                        dialog.selected_format(),
                    ) {
                        Ok(count) => {
                            self.status_message =
                                Some(format!("Exported {} rows to {}", count, path.display()));
                        }
                        Err(e) => {
                            self.status_message = Some(format!("Export failed: {}", e));
                        }
                    }
                }
                self.export_dialog = None;
                self.mode = AppMode::Normal;
            }
            _ => {}
        }
        Ok(())
    }

    fn start_harvest(&mut self) -> Result<()> {
        // Don't start a new fetch if one is already running
        if self.task_manager.is_running(TaskType::Harvest) {
            self.status_message = Some("Harvest already running".to_string());
            return Ok(());
        }

        let Some(api_key) = self.api_key.clone() else {
            self.status_message = Some("No API key set (press a to enter one)".to_string());
            return Ok(());
        };

        let Some(classification) = self
            .config
            .classifications
            .get(self.classification_index)
            .cloned()
        else {
            return Ok(());
        };

        let (_task_id, tx, cancel_flag) = self.task_manager.register_task(TaskType::Harvest);
        let (outcome_tx, outcome_rx) = mpsc::channel();
        self.harvest_rx = Some(outcome_rx);

        let api_config = self.config.api.clone();
        self.status_message = Some(format!("Fetching {}...", classification));

        // Fetch in a background thread so the UI stays responsive
        std::thread::spawn(move || {
            let harvester = Harvester::new(&api_config, api_key);
            harvester.run_cancellable(&classification, tx, outcome_tx, cancel_flag);
        });

        Ok(())
    }

    fn start_insert(&mut self) -> Result<()> {
        if self.task_manager.is_running(TaskType::Insert) {
            self.status_message = Some("Insert already running".to_string());
            return Ok(());
        }

        let Some(staged) = self.staged.clone() else {
            self.status_message = Some("Nothing staged to insert".to_string());
            return Ok(());
        };

        let (_task_id, tx, cancel_flag) = self.task_manager.register_task(TaskType::Insert);
        let db_path = self.config.db_path.clone();

        // The worker opens its own connection; the UI keeps using ours
        std::thread::spawn(move || {
            insert_worker(db_path, staged, tx, cancel_flag);
        });

        self.status_message = Some("Inserting staged rows...".to_string());

        Ok(())
    }

    fn run_selected_query(&mut self) {
        let Some(query) = CATALOG.get(self.query_index) else {
            return;
        };

        match self.db.run_query(query.sql) {
            Ok(set) => {
                let rows = set.rows.len();
                info!(query = query.label, rows, "catalog query executed");
                self.results = Some(QueryResults {
                    label: query.label.to_string(),
                    set,
                });
                self.results_scroll = 0;
                self.status_message = Some(format!("{} rows", rows));
            }
            Err(e) => {
                self.status_message = Some(format!("Query failed: {}", e));
            }
        }
    }

    fn scroll_results(&mut self, delta: isize) {
        let Some(results) = self.results.as_ref() else {
            return;
        };
        let max_scroll = results.set.rows.len().saturating_sub(1);
        let next = self.results_scroll as isize + delta;
        self.results_scroll = next.clamp(0, max_scroll as isize) as usize;
    }

    fn open_export_dialog(&mut self) {
        if self.results.is_none() {
            self.status_message = Some("Run a query first".to_string());
            return;
        }
        self.export_dialog = Some(ExportDialog::new(self.config.export.output_dir.clone()));
        self.mode = AppMode::Exporting;
    }

    fn refresh_stats(&mut self) {
        if let Ok(stats) = self.db.table_stats() {
            self.table_stats = stats;
        }
    }
}

/// Insert a staged batch on a worker thread: metadata first so the
/// media/color foreign keys land against existing rows.
fn insert_worker(
    db_path: PathBuf,
    staged: HarvestOutcome,
    tx: mpsc::Sender<TaskUpdate>,
    cancel_flag: Arc<AtomicBool>,
) {
    let mut db = match Database::open(&db_path) {
        Ok(db) => db,
        Err(e) => {
            let _ = tx.send(TaskUpdate::Failed {
                error: format!("Failed to open database: {}", e),
            });
            return;
        }
    };

    if let Err(e) = db.initialize() {
        let _ = tx.send(TaskUpdate::Failed {
            error: format!("Failed to initialize database: {}", e),
        });
        return;
    }

    let batch = &staged.batch;
    let total = batch.metadata.len() + batch.media.len() + batch.colors.len();
    let _ = tx.send(TaskUpdate::Started { total });

    if cancel_flag.load(Ordering::SeqCst) {
        let _ = tx.send(TaskUpdate::Cancelled);
        return;
    }

    let report = match db.insert_metadata(&batch.metadata) {
        Ok(report) => report,
        Err(e) => {
            let _ = tx.send(TaskUpdate::Failed {
                error: format!("Metadata insert failed: {}", e),
            });
            return;
        }
    };
    let mut done = batch.metadata.len();
    let _ = tx.send(TaskUpdate::Progress(
        TaskProgress::new(done, total).with_message("metadata"),
    ));

    if cancel_flag.load(Ordering::SeqCst) {
        let _ = tx.send(TaskUpdate::Cancelled);
        return;
    }

    let media_count = match db.insert_media(&batch.media) {
        Ok(count) => count,
        Err(e) => {
            let _ = tx.send(TaskUpdate::Failed {
                error: format!("Media insert failed: {}", e),
            });
            return;
        }
    };
    done += media_count;
    let _ = tx.send(TaskUpdate::Progress(
        TaskProgress::new(done, total).with_message("media"),
    ));

    if cancel_flag.load(Ordering::SeqCst) {
        let _ = tx.send(TaskUpdate::Cancelled);
        return;
    }

    let color_count = match db.insert_colors(&batch.colors) {
        Ok(count) => count,
        Err(e) => {
            let _ = tx.send(TaskUpdate::Failed {
                error: format!("Color insert failed: {}", e),
            });
            return;
        }
    };

    info!(
        classification = %staged.classification,
        inserted = report.inserted,
        ignored = report.ignored,
        media = media_count,
        colors = color_count,
        "staged batch inserted"
    );

    let _ = tx.send(TaskUpdate::Completed {
        message: format!(
            "{} metadata ({} ignored), {} media, {} color rows",
            report.inserted, report.ignored, media_count, color_count
        ),
    });
}
