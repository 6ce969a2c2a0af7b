// File: ./src/render.rs
// Chat text for a schedule day, and splitting it into message-sized chunks
use crate::model::ScheduleDay;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Telegram refuses messages longer than this many characters.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    /// Month name in the form used after a day number ("15 октября").
    pub fn month_name(self, month: u32) -> &'static str {
        const RU: [&str; 12] = [
            "января",
            "февраля",
            "марта",
            "апреля",
            "мая",
            "июня",
            "июля",
            "августа",
            "сентября",
            "октября",
            "ноября",
            "декабря",
        ];
        const EN: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Locale::Ru => RU[idx],
            Locale::En => EN[idx],
        }
    }

    pub fn weekday_name(self, weekday: Weekday) -> &'static str {
        match (self, weekday) {
            (Locale::Ru, Weekday::Mon) => "понедельник",
            (Locale::Ru, Weekday::Tue) => "вторник",
            (Locale::Ru, Weekday::Wed) => "среда",
            (Locale::Ru, Weekday::Thu) => "четверг",
            (Locale::Ru, Weekday::Fri) => "пятница",
            (Locale::Ru, Weekday::Sat) => "суббота",
            (Locale::Ru, Weekday::Sun) => "воскресенье",
            (Locale::En, Weekday::Mon) => "Monday",
            (Locale::En, Weekday::Tue) => "Tuesday",
            (Locale::En, Weekday::Wed) => "Wednesday",
            (Locale::En, Weekday::Thu) => "Thursday",
            (Locale::En, Weekday::Fri) => "Friday",
            (Locale::En, Weekday::Sat) => "Saturday",
            (Locale::En, Weekday::Sun) => "Sunday",
        }
    }

    /// `15 октября, четверг`
    pub fn format_date(self, date: NaiveDate) -> String {
        format!(
            "{} {}, {}",
            date.day(),
            self.month_name(date.month()),
            self.weekday_name(date.weekday())
        )
    }

    pub fn no_data(self) -> &'static str {
        match self {
            Locale::Ru => "Нет данных на этот день.",
            Locale::En => "No data for this day.",
        }
    }

    pub fn greeting(self, group: &str) -> String {
        match self {
            Locale::Ru => format!("Привет! Я могу предоставить расписание группы {}.", group),
            Locale::En => format!("Hi! I can fetch the class schedule for group {}.", group),
        }
    }

    pub fn loading(self) -> &'static str {
        match self {
            Locale::Ru => "Загружаю расписание",
            Locale::En => "Loading the schedule",
        }
    }

    pub fn error_reply(self, err: &dyn std::fmt::Display) -> String {
        match self {
            Locale::Ru => format!("Произошла ошибка: {}", err),
            Locale::En => format!("Something went wrong: {}", err),
        }
    }
}

/// Renders the day as Telegram HTML. Only `<b>` is emitted; lesson text is
/// passed through as-is. Lesson blocks are separated by a blank line and the
/// text does not end with a newline.
pub fn render(day: &ScheduleDay, locale: Locale) -> String {
    let mut out = String::new();
    let _ = write!(out, "📅 <b>{}</b>\n\n", locale.format_date(day.date));

    if day.lessons.is_empty() {
        out.push_str(locale.no_data());
        return out;
    }

    let blocks: Vec<String> = day
        .lessons
        .iter()
        .map(|lesson| {
            format!(
                "🕒 <b>{}</b>\n📘 {}\n✍️ {}\n🏫 {}",
                lesson.time, lesson.subject, lesson.teacher, lesson.room
            )
        })
        .collect();
    out.push_str(&blocks.join("\n\n"));
    out
}

/// Splits `text` into chunks of at most `max_len` characters, cutting only
/// between lines. A single line longer than `max_len` becomes its own chunk.
/// Joining the chunks with `'\n'` gives back `text`.
pub fn paginate(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    if text.is_empty() {
        return chunks;
    }

    let mut current = String::new();
    let mut current_len = 0;
    let mut has_line = false;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        if has_line && current_len + 1 + line_len > max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
            has_line = false;
        }
        if has_line {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
        has_line = true;
    }

    if has_line {
        chunks.push(current);
    }
    chunks
}
