// File: ./src/pipeline.rs
use crate::config::Config;
use crate::merge::{MergePolicy, merge};
use crate::model::{RawFragment, ScheduleDay, extract, sort_lessons};
use crate::render::{TELEGRAM_MESSAGE_LIMIT, paginate, render};
use crate::source;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Extract, merge and sort. No I/O.
pub fn build_day(
    date: NaiveDate,
    primary: &[RawFragment],
    secondary: &[RawFragment],
    policy: &MergePolicy,
) -> ScheduleDay {
    let primary = primary.iter().filter_map(extract).collect();
    let secondary = secondary.iter().filter_map(extract).collect();
    let mut lessons = merge(primary, secondary, policy).into_records();
    sort_lessons(&mut lessons);
    ScheduleDay::new(date, lessons)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(ScheduleDay),
    /// Every source came back empty.
    NoData(ScheduleDay),
}

impl Outcome {
    pub fn day(&self) -> &ScheduleDay {
        match self {
            Outcome::Found(day) | Outcome::NoData(day) => day,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Arc<Config>,
}

impl Pipeline {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.fetch_timeout_secs)
    }

    /// Asks the primary and secondary sources at the same time, then the
    /// fallbacks one by one until something turns up.
    pub async fn schedule_for(&self, date: NaiveDate) -> Outcome {
        let cfg = &self.config;
        let sources = &cfg.sources;
        let timeout = self.timeout();

        let primary = source::read(sources.primary, sources, &cfg.group, date, timeout);
        let (primary, secondary) = match sources.secondary {
            Some(kind) => {
                let secondary = source::read(kind, sources, &cfg.group, date, timeout);
                futures::future::join(primary, secondary).await
            }
            None => (primary.await, Vec::new()),
        };

        let mut day = build_day(date, &primary, &secondary, &cfg.merge);

        for kind in &sources.fallbacks {
            if !day.is_empty() {
                break;
            }
            info!("Nothing from main sources, falling back to {}", kind);
            let fragments = source::read(*kind, sources, &cfg.group, date, timeout).await;
            day = build_day(date, &fragments, &[], &cfg.merge);
        }

        if day.is_empty() {
            info!("No schedule found for {}", date);
            Outcome::NoData(day)
        } else {
            info!("Schedule for {}: {} lessons", date, day.lessons.len());
            Outcome::Found(day)
        }
    }

    /// Rendered day, split to fit chat messages. The configured length is
    /// capped at what Telegram accepts.
    pub fn render_chunks(&self, day: &ScheduleDay) -> Vec<String> {
        let max_len = self.config.max_message_len.min(TELEGRAM_MESSAGE_LIMIT);
        paginate(&render(day, self.config.locale), max_len)
    }
}
