//! Registry and poll loop for running background tasks.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;

use super::{BackgroundTask, TaskCompletionInfo, TaskId, TaskProgress, TaskState, TaskType, TaskUpdate};

pub struct BackgroundTaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    /// Order in which tasks were added (for "most recent" cancellation).
    task_order: Vec<TaskId>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            task_order: Vec::new(),
        }
    }

    /// Register a new background task.
    /// Returns the TaskId, a sender for the task to report through, and
    /// the shared cancel flag.
    pub fn register_task(
        &mut self,
        task_type: TaskType,
    ) -> (TaskId, mpsc::Sender<TaskUpdate>, Arc<AtomicBool>) {
        let (tx, rx) = mpsc::channel();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let task = BackgroundTask::new(task_type, cancel_flag.clone(), rx);
        let id = task.id;

        self.tasks.insert(id, task);
        self.task_order.push(id);

        (id, tx, cancel_flag)
    }

    /// Check if a task of the given type is already running.
    pub fn is_running(&self, task_type: TaskType) -> bool {
        self.tasks
            .values()
            .any(|t| t.task_type == task_type && t.is_running())
    }

    /// Cancel the most recently started running task.
    /// Returns true if a task was cancelled.
    pub fn cancel_most_recent(&mut self) -> bool {
        for id in self.task_order.iter().rev() {
            if let Some(task) = self.tasks.get(id) {
                if task.is_running() {
                    task.cancel();
                    return true;
                }
            }
        }
        false
    }

    /// Cancel all running tasks.
    pub fn cancel_all(&mut self) {
        for task in self.tasks.values() {
            if task.is_running() {
                task.cancel();
            }
        }
    }

    /// Poll all task channels for updates.
    /// Returns completion messages that should be surfaced to the user.
    pub fn poll_updates(&mut self) -> Vec<TaskCompletionInfo> {
        let mut completed = Vec::new();

        let task_ids: Vec<TaskId> = self.tasks.keys().copied().collect();

        for id in task_ids {
            if let Some(task) = self.tasks.get_mut(&id) {
                // Drain all available updates
                while let Ok(update) = task.receiver.try_recv() {
                    match update {
                        TaskUpdate::Started { total } => {
                            task.progress = Some(TaskProgress::new(0, total));
                        }
                        TaskUpdate::Progress(progress) => {
                            task.progress = Some(progress);
                        }
                        TaskUpdate::Completed { message } => {
                            task.state = TaskState::Completed;
                            completed.push(TaskCompletionInfo {
                                id,
                                task_type: task.task_type,
                                message,
                                success: true,
                            });
                        }
                        TaskUpdate::Cancelled => {
                            task.state = TaskState::Cancelled;
                            completed.push(TaskCompletionInfo {
                                id,
                                task_type: task.task_type,
                                message: "Cancelled".to_string(),
                                success: false,
                            });
                        }
                        TaskUpdate::Failed { error } => {
                            task.state = TaskState::Failed(error.clone());
                            completed.push(TaskCompletionInfo {
                                id,
                                task_type: task.task_type,
                                message: error,
                                success: false,
                            });
                        }
                    }
                }
            }
        }

        // Drop finished tasks from tracking
        for info in &completed {
            self.tasks.remove(&info.id);
            self.task_order.retain(|id| *id != info.id);
        }

        completed
    }

    /// Running tasks in start order, for the status bar indicators.
    pub fn running_tasks(&self) -> Vec<&BackgroundTask> {
        self.task_order
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .filter(|t| t.is_running())
            .collect()
    }

    pub fn has_running_tasks(&self) -> bool {
        self.tasks.values().any(|t| t.is_running())
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_clears_task() {
        let mut manager = BackgroundTaskManager::new();
        let (_id, tx, _cancel) = manager.register_task(TaskType::Harvest);
        assert!(manager.is_running(TaskType::Harvest));

        tx.send(TaskUpdate::Started { total: 10 }).unwrap();
        tx.send(TaskUpdate::Progress(TaskProgress::new(5, 10))).unwrap();
        tx.send(TaskUpdate::Completed {
            message: "done".to_string(),
        })
        .unwrap();

        let completed = manager.poll_updates();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].success);
        assert!(!manager.has_running_tasks());
    }

    #[test]
    fn test_cancel_most_recent_flags_latest_task() {
        let mut manager = BackgroundTaskManager::new();
        let (_i1, _tx1, cancel1) = manager.register_task(TaskType::Harvest);
        let (_i2, _tx2, cancel2) = manager.register_task(TaskType::Insert);

        assert!(manager.cancel_most_recent());
        assert!(cancel2.load(std::sync::atomic::Ordering::SeqCst));
        assert!(!cancel1.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(TaskProgress::new(0, 0).percent(), 0);
        assert_eq!(TaskProgress::new(5, 10).percent(), 50);
        assert_eq!(TaskProgress::new(12, 10).percent(), 100);
    }
}
