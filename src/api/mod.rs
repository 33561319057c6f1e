//! Client for the Harvard Art Museums object API.
//!
//! The API is paged: each response carries an `info` envelope with an
//! advisory page count and a `records` array. The page count is not
//! reliable for every classification, so an empty page is the
//! authoritative end-of-data signal.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ApiConfig;

/// Delay base for the linear retry backoff.
const RETRY_BACKOFF_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status} fetching page {page}")]
    Status { status: u16, page: usize },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode API response: {0}")]
    Decode(String),

    #[error("fetch cancelled")]
    Cancelled,
}

/// One page of the object endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectPage {
    pub info: Option<PageInfo>,
    #[serde(default)]
    pub records: Vec<ArtifactRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    pub totalrecords: Option<i64>,
    pub pages: Option<i64>,
}

/// An artifact object as returned by the API. Only the fields the
/// flattening step projects are modeled; everything else is ignored.
///
/// `id` and `accessionyear` stay as raw JSON values because the API is
/// not consistent about numbers vs. digit strings for them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactRecord {
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub culture: Option<String>,
    pub period: Option<String>,
    pub century: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub labeltext: Option<String>,
    pub creditline: Option<String>,
    pub department: Option<String>,
    pub classification: Option<String>,
    pub accessionyear: Option<serde_json::Value>,
    pub accessionmethod: Option<String>,
    pub imagecount: Option<i64>,
    pub mediacount: Option<i64>,
    pub rank: Option<i64>,
    pub datebegin: Option<i64>,
    pub dateend: Option<i64>,
    pub colors: Option<Vec<ColorEntry>>,
}

/// One entry of a record's color breakdown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorEntry {
    pub color: Option<String>,
    pub spectrum: Option<String>,
    pub hue: Option<String>,
    pub percent: Option<f64>,
    pub css3: Option<String>,
    pub closest_palette_color_parent: Option<String>,
}

/// Per-page progress reported while a classification is being fetched.
#[derive(Debug, Clone, Copy)]
pub struct FetchProgress {
    pub page: usize,
    pub fetched: usize,
    pub target: usize,
}

pub struct ApiClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    page_size: usize,
    rate_limit: Duration,
    max_retries: u32,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, api_key: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        Self {
            agent,
            endpoint: config.endpoint.clone(),
            api_key,
            page_size: config.page_size,
            rate_limit: Duration::from_millis(config.rate_limit_ms),
            max_retries: config.max_retries.max(1),
        }
    }

    /// Fetch a single page, retrying transport errors and 429/5xx with a
    /// linear backoff. Other HTTP statuses fail immediately.
    pub fn fetch_page(&self, classification: &str, page: usize) -> Result<ObjectPage, ApiError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let result = self
                .agent
                .get(&self.endpoint)
                .query("apikey", &self.api_key)
                .query("classification", classification)
                .query("size", &self.page_size.to_string())
                .query("page", &page.to_string())
                .call();

            match result {
                Ok(response) => {
                    return response
                        .into_json::<ObjectPage>()
                        .map_err(|e| ApiError::Decode(e.to_string()));
                }
                Err(ureq::Error::Status(status, _)) => {
                    if !is_retryable_status(status) || attempt >= self.max_retries {
                        return Err(ApiError::Status { status, page });
                    }
                    warn!(status, page, attempt, "retrying after HTTP error");
                }
                Err(err) => {
                    if attempt >= self.max_retries {
                        return Err(ApiError::Transport(err.to_string()));
                    }
                    warn!(page, attempt, error = %err, "retrying after transport error");
                }
            }

            std::thread::sleep(Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64));
        }
    }

    /// Fetch up to `target` records for a classification, page by page.
    ///
    /// `progress` is called after each page; returning `false` cancels the
    /// fetch. The result is trimmed to `target` records.
    pub fn fetch_classification<F>(
        &self,
        classification: &str,
        target: usize,
        mut progress: F,
    ) -> Result<Vec<ArtifactRecord>, ApiError>
    where
        F: FnMut(FetchProgress) -> bool,
    {
        let mut records: Vec<ArtifactRecord> = Vec::new();
        let mut page = 1usize;

        while records.len() < target {
            let batch = self.fetch_page(classification, page)?;

            if page == 1 {
                if let Some(ref info) = batch.info {
                    debug!(
                        classification,
                        totalrecords = ?info.totalrecords,
                        pages = ?info.pages,
                        "first page received"
                    );
                }
            }

            if batch.records.is_empty() {
                debug!(classification, page, "empty page, stopping");
                break;
            }

            records.extend(batch.records);

            let keep_going = progress(FetchProgress {
                page,
                fetched: records.len().min(target),
                target,
            });
            if !keep_going {
                return Err(ApiError::Cancelled);
            }

            if pages_exhausted(page, batch.info.as_ref()) {
                debug!(classification, page, "advisory page count reached");
                break;
            }

            page += 1;

            if records.len() < target {
                // Polite delay between page requests.
                std::thread::sleep(self.rate_limit);
            }
        }

        records.truncate(target);
        Ok(records)
    }
}

/// Whether the advisory `info.pages` field says the current page was the
/// last one. Absent info never stops the loop; empty pages do that.
fn pages_exhausted(page: usize, info: Option<&PageInfo>) -> bool {
    match info.and_then(|i| i.pages) {
        Some(pages) => page as i64 >= pages,
        None => false,
    }
}

fn is_retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_page() {
        let body = r##"{
            "info": {"totalrecords": 230, "pages": 3, "page": 1},
            "records": [
                {
                    "id": 1234,
                    "title": "Silver Drachm",
                    "culture": "Greek",
                    "classification": "Coins",
                    "imagecount": 2,
                    "rank": 112233,
                    "datebegin": -450,
                    "dateend": -400,
                    "colors": [
                        {"color": "#c8c8c8", "spectrum": "#8c5fa8",
                         "hue": "Grey", "percent": 0.62, "css3": "#c0c0c0"}
                    ]
                },
                {"id": "5678", "title": "Fragment"}
            ]
        }"##;

        let page: ObjectPage = serde_json::from_str(body).unwrap();
        let info = page.info.unwrap();
        assert_eq!(info.pages, Some(3));
        assert_eq!(info.totalrecords, Some(230));
        assert_eq!(page.records.len(), 2);

        let first = &page.records[0];
        assert_eq!(first.title.as_deref(), Some("Silver Drachm"));
        assert_eq!(first.datebegin, Some(-450));
        let colors = first.colors.as_ref().unwrap();
        assert_eq!(colors[0].hue.as_deref(), Some("Grey"));
        assert_eq!(colors[0].percent, Some(0.62));

        // Digit-string ids survive parsing; coercion happens at flatten time.
        assert!(page.records[1].id.is_some());
    }

    #[test]
    fn test_parse_tolerates_missing_envelope() {
        let page: ObjectPage = serde_json::from_str("{}").unwrap();
        assert!(page.info.is_none());
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_pages_exhausted() {
        let info = PageInfo {
            pages: Some(3),
            ..Default::default()
        };
        assert!(!pages_exhausted(2, Some(&info)));
        assert!(pages_exhausted(3, Some(&info)));
        assert!(pages_exhausted(4, Some(&info)));

        // Missing info or page count never terminates by itself.
        assert!(!pages_exhausted(10, None));
        let no_pages = PageInfo::default();
        assert!(!pages_exhausted(10, Some(&no_pages)));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(401));
        assert!(!is_retryable_status(404));
    }
}
