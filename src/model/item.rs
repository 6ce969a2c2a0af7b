// File: ./src/model/item.rs
// Lesson records and the per-day schedule they belong to
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Placeholder stored in any field the sources could not provide.
pub const NOT_SPECIFIED: &str = "Не указано";

static START_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[:.](\d{2})").unwrap());

pub fn is_specified(value: &str) -> bool {
    value != NOT_SPECIFIED
}

fn or_sentinel(value: impl Into<String>) -> String {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Reads the first `HH:MM` found in a time string.
pub fn parse_start_time(time: &str) -> Option<NaiveTime> {
    let caps = START_TIME_RE.captures(time)?;
    let hours = caps[1].parse::<u32>().ok()?;
    let minutes = caps[2].parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub time: String,
    pub subject: String,
    pub room: String,
    pub teacher: String,
    pub parsed_time: Option<NaiveTime>,
}

impl LessonRecord {
    /// Builds a record, replacing blank fields with [`NOT_SPECIFIED`].
    pub fn new(
        time: impl Into<String>,
        subject: impl Into<String>,
        room: impl Into<String>,
        teacher: impl Into<String>,
    ) -> Self {
        let time = or_sentinel(time);
        let parsed_time = if is_specified(&time) {
            parse_start_time(&time)
        } else {
            None
        };
        Self {
            time,
            subject: or_sentinel(subject),
            room: or_sentinel(room),
            teacher: or_sentinel(teacher),
            parsed_time,
        }
    }

    /// A record that only knows its time slot.
    pub fn at(time: impl Into<String>) -> Self {
        Self::new(time, "", "", "")
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = or_sentinel(subject);
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = or_sentinel(room);
        self
    }

    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = or_sentinel(teacher);
        self
    }

    /// True when no field carries real data.
    pub fn is_blank(&self) -> bool {
        !is_specified(&self.time)
            && !is_specified(&self.subject)
            && !is_specified(&self.room)
            && !is_specified(&self.teacher)
    }
}

/// Orders lessons by start time. Lessons without a readable time go last,
/// in the order they came in.
pub fn sort_lessons(lessons: &mut [LessonRecord]) {
    // Option orders None first, so the flag pushes the unparsed ones to the end.
    lessons.sort_by_key(|l| (l.parsed_time.is_none(), l.parsed_time));
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub lessons: Vec<LessonRecord>,
}

impl ScheduleDay {
    pub fn new(date: NaiveDate, lessons: Vec<LessonRecord>) -> Self {
        Self { date, lessons }
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

/// Source-shaped chunk of data believed to describe one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFragment {
    /// A calendar VEVENT.
    Event {
        summary: String,
        description: String,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    },
    /// Three lines lifted from a scraped page. `location` is the text after
    /// the location marker.
    Block {
        time_line: String,
        subject_line: String,
        location: String,
    },
    /// The matched row of one lesson-slot worksheet.
    Row {
        slot: u32,
        time: Option<String>,
        subject: Option<String>,
        room: Option<String>,
        teacher: Option<String>,
    },
}
