use chrono::NaiveDate;
use lessonbot::model::{LessonRecord, ScheduleDay};
use lessonbot::render::{Locale, paginate, render};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()
}

#[test]
fn test_empty_day_renders_no_data_line() {
    let text = render(&ScheduleDay::empty(date()), Locale::Ru);
    assert_eq!(text, "📅 <b>15 октября, вторник</b>\n\nНет данных на этот день.");

    let text = render(&ScheduleDay::empty(date()), Locale::En);
    assert_eq!(text, "📅 <b>15 October, Tuesday</b>\n\nNo data for this day.");
}

#[test]
fn test_lesson_blocks() {
    let day = ScheduleDay::new(
        date(),
        vec![
            LessonRecord::new("09:00 — 10:30", "Алгебра", "103", "Иванов И.И."),
            LessonRecord::at("10:40 — 12:10").with_subject("Физика"),
        ],
    );

    let text = render(&day, Locale::Ru);

    assert_eq!(
        text,
        "📅 <b>15 октября, вторник</b>\n\n\
         🕒 <b>09:00 — 10:30</b>\n📘 Алгебра\n✍️ Иванов И.И.\n🏫 103\n\n\
         🕒 <b>10:40 — 12:10</b>\n📘 Физика\n✍️ Не указано\n🏫 Не указано"
    );
}

#[test]
fn test_paginate_round_trip() {
    let lessons = (0..60)
        .map(|i| {
            LessonRecord::new(
                format!("{:02}:00", i % 24),
                format!("Предмет номер {}", i),
                format!("{}", 100 + i),
                "Преподаватель с довольно длинным именем",
            )
        })
        .collect();
    let text = render(&ScheduleDay::new(date(), lessons), Locale::Ru);
    let longest = text.split('\n').map(|l| l.chars().count()).max().unwrap();

    for max_len in [longest, longest + 7, 100, 500, 4000] {
        let max_len = max_len.max(longest);
        let chunks = paginate(&text, max_len);
        assert!(chunks.iter().all(|c| c.chars().count() <= max_len));
        assert_eq!(chunks.join("\n"), text);
    }
}

#[test]
fn test_paginate_5000_chars_into_two_chunks() {
    let line = "x".repeat(79);
    let mut lines = vec![line.as_str(); 62];
    let tail = "y".repeat(40);
    lines.push(&tail);
    let text = lines.join("\n");
    assert_eq!(text.chars().count(), 5000);

    let chunks = paginate(&text, 4000);

    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].chars().count() <= 4000);
    assert!(chunks[0].ends_with('x'));
    assert_eq!(&text[..chunks[0].len()], chunks[0]);
    assert_eq!(&text[chunks[0].len() + 1..], chunks[1]);
}

#[test]
fn test_paginate_keeps_oversized_line_whole() {
    let long = "z".repeat(50);
    let text = format!("short\n{}\nend", long);

    let chunks = paginate(&text, 10);

    assert_eq!(chunks, vec!["short".to_string(), long, "end".to_string()]);
}

#[test]
fn test_paginate_counts_chars_not_bytes() {
    // 6 Cyrillic letters = 12 bytes
    let chunks = paginate("привет\nмир", 10);
    assert_eq!(chunks, vec!["привет\nмир".to_string()]);
}

#[test]
fn test_paginate_empty_text() {
    assert!(paginate("", 4000).is_empty());
}
