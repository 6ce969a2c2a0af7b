// File: ./src/model/parser.rs
// Pulls lesson fields out of loosely formatted fragments
use crate::model::item::{LessonRecord, RawFragment};
use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

pub const TIME_LABEL: &str = "Время";
pub const ROOM_LABEL: &str = "Кабинет";
pub const TEACHER_LABEL: &str = "Преподаватель";

static TIME_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[:.](\d{2})\s*[—–\-]\s*(\d{1,2})[:.](\d{2})").unwrap()
});
static SINGLE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[:.](\d{2})\b").unwrap());
static SUBJECT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/(.*?)/").unwrap());
static TIME_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| label_pattern(TIME_LABEL));
static ROOM_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| label_pattern(ROOM_LABEL));
static TEACHER_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| label_pattern(TEACHER_LABEL));

fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"{}:\s*(.+?)\s*\|", regex::escape(label))).unwrap()
}

fn hm(hours: &str, minutes: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

fn format_range(start: NaiveTime, end: Option<NaiveTime>) -> String {
    match end {
        Some(end) => format!("{} — {}", start.format("%H:%M"), end.format("%H:%M")),
        None => start.format("%H:%M").to_string(),
    }
}

/// Normalizes `9:00-10.30`, `09:00–10:30` etc. to `09:00 — 10:30`.
/// A lone time becomes `HH:MM`. Returns `None` when no valid time is present.
pub fn canonical_time(text: &str) -> Option<String> {
    if let Some(caps) = TIME_RANGE_RE.captures(text)
        && let Some(start) = hm(&caps[1], &caps[2])
        && let Some(end) = hm(&caps[3], &caps[4])
    {
        return Some(format_range(start, Some(end)));
    }
    let caps = SINGLE_TIME_RE.captures(text)?;
    hm(&caps[1], &caps[2]).map(|t| format_range(t, None))
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Value of a `Label: value |` pair inside a calendar description.
pub fn labeled_value(text: &str, label: &str) -> Option<String> {
    match label {
        TIME_LABEL => capture(&TIME_FIELD_RE, text),
        ROOM_LABEL => capture(&ROOM_FIELD_RE, text),
        TEACHER_LABEL => capture(&TEACHER_FIELD_RE, text),
        other => capture(&label_pattern(other), text),
    }
}

/// Subject written between slashes in an event summary: `СА-17 /Алгебра/ лекция`.
pub fn subject_from_summary(summary: &str) -> Option<String> {
    capture(&SUBJECT_RE, summary)
}

/// Splits the text after a location marker into room and teacher:
/// `305, Иванов И.И.` gives `("305", "Иванов И.И.")`.
pub fn split_location(location: &str) -> (Option<String>, Option<String>) {
    let trim_punct = |s: &str| {
        s.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-' | '–' | '—'))
            .to_string()
    };
    let location = location.trim();
    let (room, rest) = match location.split_once(char::is_whitespace) {
        Some((room, rest)) => (room, rest),
        None => (location, ""),
    };
    let room = trim_punct(room);
    let teacher = trim_punct(rest);
    (
        Some(room).filter(|r| !r.is_empty()),
        Some(teacher).filter(|t| !t.is_empty()),
    )
}

fn time_or_raw(text: &str) -> String {
    canonical_time(text).unwrap_or_else(|| text.trim().to_string())
}

/// Turns one fragment into a lesson. Fields that cannot be found become the
/// sentinel; a fragment with nothing recoverable is dropped.
pub fn extract(fragment: &RawFragment) -> Option<LessonRecord> {
    let record = match fragment {
        RawFragment::Event {
            summary,
            description,
            start,
            end,
        } => {
            let time = labeled_value(description, TIME_LABEL)
                .map(|t| time_or_raw(&t))
                .or_else(|| start.map(|s| format_range(s, *end)))
                .unwrap_or_default();
            LessonRecord::new(
                time,
                subject_from_summary(summary).unwrap_or_default(),
                labeled_value(description, ROOM_LABEL).unwrap_or_default(),
                labeled_value(description, TEACHER_LABEL).unwrap_or_default(),
            )
        }
        RawFragment::Block {
            time_line,
            subject_line,
            location,
        } => {
            let (room, teacher) = split_location(location);
            LessonRecord::new(
                canonical_time(time_line).unwrap_or_default(),
                subject_line.as_str(),
                room.unwrap_or_default(),
                teacher.unwrap_or_default(),
            )
        }
        RawFragment::Row {
            time,
            subject,
            room,
            teacher,
            ..
        } => LessonRecord::new(
            time.as_deref().map(time_or_raw).unwrap_or_default(),
            subject.clone().unwrap_or_default(),
            room.clone().unwrap_or_default(),
            teacher.clone().unwrap_or_default(),
        ),
    };

    if record.is_blank() {
        debug!("Dropping fragment with no recoverable fields: {:?}", fragment);
        return None;
    }
    Some(record)
}
