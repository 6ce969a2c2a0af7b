use lessonbot::config::{ColumnLayout, Config, DEFAULT_API_URL};
use lessonbot::merge::{Authority, MergePolicy};
use lessonbot::render::Locale;
use lessonbot::source::SourceKind;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_empty_file_gives_defaults() {
    let config = Config::from_toml_str("").unwrap();

    assert!(config.token.is_empty());
    assert_eq!(config.group, "СА-17");
    assert_eq!(config.locale, Locale::Ru);
    assert_eq!(config.max_message_len, 4000);
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.merge, MergePolicy::default());
    assert_eq!(config.sources.primary, SourceKind::Calendar);
    assert_eq!(config.sources.secondary, None);
    assert!(config.sources.fallbacks.is_empty());
    assert_eq!(config.sources.calendar.path, PathBuf::from("sa17.ics"));
    assert_eq!(config.sources.sheet.bells.len(), 6);
}

#[test]
fn test_full_config() {
    let content = r#"
token = "abc"
group = "СА-21"
locale = "en"
max_message_len = 1000

[merge]
subject = "primary"
room = "secondary"

[sources]
primary = "sheet"
secondary = "page"
fallbacks = ["calendar"]

[sources.page]
url = "https://example.org/schedule"
location_marker = "каб."

[sources.sheet]
path = "/srv/schedule.xlsx"

[[sources.sheet.columns]]
group_col = 2
room = 1
teacher = 2
"#;

    let config = Config::from_toml_str(content).unwrap();

    assert_eq!(config.token, "abc");
    assert_eq!(config.group, "СА-21");
    assert_eq!(config.locale, Locale::En);
    assert_eq!(config.max_message_len, 1000);
    // Unset keys keep their defaults.
    assert_eq!(config.fetch_timeout_secs, 20);

    assert_eq!(config.merge.subject, Authority::Primary);
    assert_eq!(config.merge.room, Authority::Secondary);
    assert_eq!(config.merge.time, Authority::Primary);

    assert_eq!(config.sources.primary, SourceKind::Sheet);
    assert_eq!(config.sources.secondary, Some(SourceKind::Page));
    assert_eq!(config.sources.fallbacks, vec![SourceKind::Calendar]);
    assert_eq!(config.sources.page.url, "https://example.org/schedule");
    assert_eq!(config.sources.page.location_marker, "каб.");
    assert_eq!(config.sources.page.marker, "СА-17");
    assert_eq!(config.sources.sheet.path, PathBuf::from("/srv/schedule.xlsx"));
    assert_eq!(config.sources.sheet.slot_prefix, "Пара");
    assert_eq!(
        config.sources.sheet.columns,
        vec![ColumnLayout {
            group_col: 2,
            subject: None,
            room: 1,
            teacher: 2,
        }]
    );
}

#[test]
fn test_unknown_source_kind_is_rejected() {
    let result = Config::from_toml_str("[sources]\nprimary = \"fax\"\n");
    assert!(result.is_err());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "group = \"СА-18\"\npoll_timeout_secs = 5").unwrap();

    let config = Config::load_from(file.path()).unwrap();

    assert_eq!(config.group, "СА-18");
    assert_eq!(config.poll_timeout_secs, 5);
}

#[test]
fn test_load_from_missing_file_fails() {
    let err = Config::load_from(std::path::Path::new("/nowhere/config.toml")).unwrap_err();
    assert!(err.to_string().contains("/nowhere/config.toml"));
}
