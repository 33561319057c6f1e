//! Background task management for non-blocking operations.
//!
//! Harvesting and database inserts run on worker threads and report back
//! through mpsc channels so the UI loop never blocks on them.

pub mod manager;

use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;

pub use manager::BackgroundTaskManager;

/// Unique identifier for a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        TaskId(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Harvest,
    Insert,
}

impl TaskType {
    /// Short indicator for the status bar.
    pub fn short_name(&self) -> &'static str {
        match self {
            TaskType::Harvest => "H",
            TaskType::Insert => "I",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskType::Harvest => "Harvest",
            TaskType::Insert => "Database Insert",
        }
    }
}

/// Progress information for a task.
#[derive(Debug, Clone)]
pub struct TaskProgress {
    pub current: usize,
    pub total: usize,
    pub message: Option<String>,
}

impl TaskProgress {
    pub fn new(current: usize, total: usize) -> Self {
        Self {
            current,
            total,
            message: None,
        }
    }

    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Progress percentage (0-100).
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            0
        } else {
            ((self.current as f64 / self.total as f64) * 100.0).min(100.0) as u8
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Completed,
    Cancelled,
    Failed(String),
}

/// Update messages sent from background tasks via channels.
#[derive(Debug, Clone)]
pub enum TaskUpdate {
    /// Task has started with total items to process.
    Started { total: usize },
    /// Progress update during processing.
    Progress(TaskProgress),
    /// Task completed successfully.
    Completed { message: String },
    /// Task was cancelled.
    Cancelled,
    /// Task failed with error.
    Failed { error: String },
}

/// A running background task with its state and communication channel.
pub struct BackgroundTask {
    pub id: TaskId,
    pub task_type: TaskType,
    pub state: TaskState,
    pub progress: Option<TaskProgress>,
    pub cancel_flag: Arc<AtomicBool>,
    pub receiver: mpsc::Receiver<TaskUpdate>,
}

impl BackgroundTask {
    pub fn new(
        task_type: TaskType,
        cancel_flag: Arc<AtomicBool>,
        receiver: mpsc::Receiver<TaskUpdate>,
    ) -> Self {
        Self {
            id: TaskId::new(),
            task_type,
            state: TaskState::Running,
            progress: None,
            cancel_flag,
            receiver,
        }
    }

    /// Request cancellation of this task.
    pub fn cancel(&self) {
        self.cancel_flag
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.state == TaskState::Running
    }
}

/// Result of polling task updates.
#[derive(Debug, Clone)]
pub struct TaskCompletionInfo {
    pub id: TaskId,
    pub task_type: TaskType,
    pub message: String,
    pub success: bool,
}
