// File: ./src/source/calendar.rs
use crate::config::CalendarConfig;
use crate::model::RawFragment;
use crate::model::adapter;
use crate::source::SourceError;
use chrono::NaiveDate;

pub fn fragments_from_ics(raw_ics: &str, date: NaiveDate) -> Result<Vec<RawFragment>, SourceError> {
    adapter::fragments_on(raw_ics, date).map_err(SourceError::Calendar)
}

pub async fn fetch(config: &CalendarConfig, date: NaiveDate) -> Result<Vec<RawFragment>, SourceError> {
    if config.path.as_os_str().is_empty() {
        return Err(SourceError::NotConfigured);
    }
    let raw_ics = tokio::fs::read_to_string(&config.path).await?;
    fragments_from_ics(&raw_ics, date)
}
