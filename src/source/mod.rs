// File: ./src/source/mod.rs
// Schedule sources. Each one turns its raw material into fragments; a source
// that cannot be reached counts as having nothing for the day.
pub mod calendar;
pub mod page;
pub mod sheet;

use crate::config::SourcesConfig;
use crate::model::RawFragment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Calendar,
    Page,
    Sheet,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Calendar => "calendar",
            SourceKind::Page => "page",
            SourceKind::Sheet => "sheet",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source is not configured")]
    NotConfigured,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("calendar error: {0}")]
    Calendar(String),
    #[error("workbook error: {0}")]
    Workbook(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Fetches one source and returns its fragments for `date`.
pub async fn fetch(
    kind: SourceKind,
    sources: &SourcesConfig,
    group: &str,
    date: NaiveDate,
    timeout: Duration,
) -> Result<Vec<RawFragment>, SourceError> {
    let work = async {
        match kind {
            SourceKind::Calendar => calendar::fetch(&sources.calendar, date).await,
            SourceKind::Page => page::fetch(&sources.page, timeout).await,
            SourceKind::Sheet => sheet::fetch(&sources.sheet, group).await,
        }
    };
    tokio::time::timeout(timeout, work)
        .await
        .map_err(|_| SourceError::Timeout(timeout))?
}

/// Like [`fetch`], but an unavailable source yields no fragments instead of an error.
pub async fn read(
    kind: SourceKind,
    sources: &SourcesConfig,
    group: &str,
    date: NaiveDate,
    timeout: Duration,
) -> Vec<RawFragment> {
    match fetch(kind, sources, group, date, timeout).await {
        Ok(fragments) => {
            info!("Source {} returned {} fragments", kind, fragments.len());
            fragments
        }
        Err(e) => {
            warn!("Source {} unavailable: {}", kind, e);
            Vec::new()
        }
    }
}
