//! Harvesting: paginated API fetch plus flattening, run off the UI thread.

pub mod flatten;

pub use flatten::{flatten_records, ColorRow, FlattenedBatch, MediaRow, MetadataRow};

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::{ApiClient, ApiError};
use crate::config::ApiConfig;
use crate::tasks::{TaskProgress, TaskUpdate};

/// A completed fetch session, staged in memory until the user inserts it.
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    pub classification: String,
    pub fetched: usize,
    pub batch: FlattenedBatch,
    pub fetched_at: DateTime<Utc>,
}

pub struct Harvester {
    client: ApiClient,
    target: usize,
}

impl Harvester {
    pub fn new(config: &ApiConfig, api_key: String) -> Self {
        Self {
            client: ApiClient::new(config, api_key),
            target: config.target_records,
        }
    }

    /// Fetch and flatten one classification, reporting progress through the
    /// task channel and shipping the staged rows through `outcome_tx`.
    pub fn run_cancellable(
        &self,
        classification: &str,
        updates: Sender<TaskUpdate>,
        outcome_tx: Sender<HarvestOutcome>,
        cancel: Arc<AtomicBool>,
    ) {
        let _ = updates.send(TaskUpdate::Started { total: self.target });

        let result = self
            .client
            .fetch_classification(classification, self.target, |progress| {
                if cancel.load(Ordering::SeqCst) {
                    return false;
                }
                let _ = updates.send(TaskUpdate::Progress(
                    TaskProgress::new(progress.fetched, progress.target)
                        .with_message(format!("page {}", progress.page)),
                ));
                true
            });

        match result {
            Ok(records) => {
                let fetched = records.len();
                let batch = flatten_records(&records, classification);
                info!(
                    classification,
                    fetched,
                    metadata = batch.metadata.len(),
                    media = batch.media.len(),
                    colors = batch.colors.len(),
                    "harvest complete"
                );

                let message = format!("Fetched {} records for {}", fetched, classification);
                let _ = outcome_tx.send(HarvestOutcome {
                    classification: classification.to_string(),
                    fetched,
                    batch,
                    fetched_at: Utc::now(),
                });
                let _ = updates.send(TaskUpdate::Completed { message });
            }
            Err(ApiError::Cancelled) => {
                let _ = updates.send(TaskUpdate::Cancelled);
            }
            Err(e) => {
                error!(classification, error = %e, "harvest failed");
                let _ = updates.send(TaskUpdate::Failed {
                    error: e.to_string(),
                });
            }
        }
    }
}
