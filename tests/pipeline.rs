use chrono::NaiveDate;
use lessonbot::config::{CalendarConfig, Config, PageConfig, SourcesConfig};
use lessonbot::merge::MergePolicy;
use lessonbot::model::{NOT_SPECIFIED, RawFragment};
use lessonbot::pipeline::{Outcome, Pipeline, build_day};
use lessonbot::source::SourceKind;
use mockito::Server;
use std::io::Write;
use std::sync::Arc;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()
}

fn ics() -> String {
    [
        "BEGIN:VCALENDAR",
        "VERSION:2.0",
        "PRODID:-//lessonbot//test//EN",
        "BEGIN:VEVENT",
        "UID:a@test",
        "DTSTAMP:20241001T000000Z",
        "DTSTART:20241015T104000",
        "SUMMARY:СА-17",
        "DESCRIPTION:Время: 10:40-12:10 | Кабинет: 207 | Преподаватель: Петров П.П. |",
        "END:VEVENT",
        "BEGIN:VEVENT",
        "UID:b@test",
        "DTSTAMP:20241001T000000Z",
        "DTSTART:20241015T090000",
        "SUMMARY:СА-17",
        "DESCRIPTION:Время: 09:00-10:30 | Кабинет: 103 | Преподаватель: Иванов И.И. |",
        "END:VEVENT",
        "END:VCALENDAR",
    ]
    .join("\r\n")
}

fn event(description: &str) -> RawFragment {
    RawFragment::Event {
        summary: "СА-17".to_string(),
        description: description.to_string(),
        start: None,
        end: None,
    }
}

fn block(time: &str, subject: &str) -> RawFragment {
    RawFragment::Block {
        time_line: time.to_string(),
        subject_line: subject.to_string(),
        location: String::new(),
    }
}

#[test]
fn test_build_day_merges_and_sorts() {
    let calendar = vec![
        event("Время: 10:40-12:10 | Кабинет: 207 | Преподаватель: Петров П.П. |"),
        event("Время: 09:00-10:30 | Кабинет: 103 | Преподаватель: Иванов И.И. |"),
        event("ничего полезного"),
    ];
    let page = vec![
        block("09:00 — 10:30", "Алгебра"),
        block("10:40 – 12:10", "Физика"),
        block("13:50 — 15:20", "Физкультура"),
    ];

    let day = build_day(date(), &calendar, &page, &MergePolicy::default());

    let summary: Vec<(&str, &str, &str)> = day
        .lessons
        .iter()
        .map(|l| (l.time.as_str(), l.subject.as_str(), l.room.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("09:00 — 10:30", "Алгебра", "103"),
            ("10:40 — 12:10", "Физика", "207"),
            ("13:50 — 15:20", "Физкультура", NOT_SPECIFIED),
        ]
    );
}

#[test]
fn test_build_day_positional_for_untimed_page() {
    let calendar = vec![
        event("Время: 09:00-10:30 | Кабинет: 103 | Преподаватель: Иванов И.И. |"),
        event("Время: 10:40-12:10 | Кабинет: 207 | Преподаватель: Петров П.П. |"),
    ];
    let page = vec![block("первая", "Алгебра"), block("вторая", "Физика")];

    let day = build_day(date(), &calendar, &page, &MergePolicy::default());

    assert_eq!(day.lessons.len(), 2);
    assert_eq!(day.lessons[0].subject, "Алгебра");
    assert_eq!(day.lessons[0].teacher, "Иванов И.И.");
    assert_eq!(day.lessons[1].subject, "Физика");
    assert_eq!(day.lessons[1].room, "207");
}

#[test]
fn test_build_day_without_fragments_is_empty() {
    let day = build_day(date(), &[], &[], &MergePolicy::default());
    assert!(day.is_empty());
}

fn config_with(sources: SourcesConfig) -> Arc<Config> {
    Arc::new(Config {
        fetch_timeout_secs: 5,
        sources,
        ..Config::default()
    })
}

#[tokio::test]
async fn test_schedule_from_calendar_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ics().as_bytes()).unwrap();

    let pipeline = Pipeline::new(config_with(SourcesConfig {
        calendar: CalendarConfig {
            path: file.path().to_path_buf(),
        },
        ..SourcesConfig::default()
    }));

    let outcome = pipeline.schedule_for(date()).await;

    assert!(outcome.is_found());
    let times: Vec<&str> = outcome.day().lessons.iter().map(|l| l.time.as_str()).collect();
    assert_eq!(times, vec!["09:00 — 10:30", "10:40 — 12:10"]);

    let chunks = pipeline.render_chunks(outcome.day());
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].starts_with("📅 <b>15 октября, вторник</b>"));
    assert!(chunks[0].contains("🏫 207"));
}

#[tokio::test]
async fn test_falls_back_when_main_sources_are_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/schedule")
        .with_status(404)
        .create_async()
        .await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ics().as_bytes()).unwrap();

    let pipeline = Pipeline::new(config_with(SourcesConfig {
        primary: SourceKind::Page,
        secondary: None,
        fallbacks: vec![SourceKind::Sheet, SourceKind::Calendar],
        page: PageConfig {
            url: format!("{}/schedule", server.url()),
            ..PageConfig::default()
        },
        calendar: CalendarConfig {
            path: file.path().to_path_buf(),
        },
        ..SourcesConfig::default()
    }));

    let outcome = pipeline.schedule_for(date()).await;

    assert!(outcome.is_found());
    assert_eq!(outcome.day().lessons.len(), 2);
}

#[tokio::test]
async fn test_no_data_is_not_an_error() {
    let pipeline = Pipeline::new(config_with(SourcesConfig {
        calendar: CalendarConfig {
            path: "/nowhere/sa17.ics".into(),
        },
        ..SourcesConfig::default()
    }));

    let outcome = pipeline.schedule_for(date()).await;

    assert!(matches!(outcome, Outcome::NoData(_)));
    assert_eq!(
        pipeline.render_chunks(outcome.day()),
        vec!["📅 <b>15 октября, вторник</b>\n\nНет данных на этот день.".to_string()]
    );
}
