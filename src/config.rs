// File: ./src/config.rs
use crate::merge::MergePolicy;
use crate::render::Locale;
use crate::source::SourceKind;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token: String,
    pub group: String,
    pub locale: Locale,
    pub max_message_len: usize,
    pub fetch_timeout_secs: u64,
    pub typing_interval_ms: u64,
    pub poll_timeout_secs: u64,
    pub api_url: String,
    pub merge: MergePolicy,
    pub sources: SourcesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            group: "СА-17".to_string(),
            locale: Locale::Ru,
            max_message_len: 4000,
            fetch_timeout_secs: 20,
            typing_interval_ms: 700,
            poll_timeout_secs: 30,
            api_url: DEFAULT_API_URL.to_string(),
            merge: MergePolicy::default(),
            sources: SourcesConfig::default(),
        }
    }
}

/// Which sources are asked, and how each one is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub primary: SourceKind,
    pub secondary: Option<SourceKind>,
    /// Tried in order when primary and secondary together yield nothing.
    pub fallbacks: Vec<SourceKind>,
    pub calendar: CalendarConfig,
    pub page: PageConfig,
    pub sheet: SheetConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary: SourceKind::Calendar,
            secondary: None,
            fallbacks: Vec::new(),
            calendar: CalendarConfig::default(),
            page: PageConfig::default(),
            sheet: SheetConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub path: PathBuf,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sa17.ics"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub url: String,
    /// Text that must appear on a correctly rendered page. Empty disables the check.
    pub marker: String,
    /// Token that starts the location line of each lesson.
    pub location_marker: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            marker: "СА-17".to_string(),
            location_marker: "ауд.".to_string(),
        }
    }
}

/// Where the room and teacher sit relative to the group code cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Zero-based column the group code is found in.
    pub group_col: usize,
    #[serde(default)]
    pub subject: Option<isize>,
    pub room: isize,
    pub teacher: isize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub path: PathBuf,
    /// Worksheets named `<prefix><n>` hold lesson slot `n`.
    pub slot_prefix: String,
    pub columns: Vec<ColumnLayout>,
    /// Bell schedule: `bells[n - 1]` is the time of slot `n`.
    pub bells: Vec<String>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("schedule.xlsx"),
            slot_prefix: "Пара".to_string(),
            columns: vec![
                ColumnLayout {
                    group_col: 0,
                    subject: Some(1),
                    room: 2,
                    teacher: 3,
                },
                ColumnLayout {
                    group_col: 5,
                    subject: Some(1),
                    room: 2,
                    teacher: 3,
                },
            ],
            bells: [
                "08:30 — 10:00",
                "10:10 — 11:40",
                "12:10 — 13:40",
                "13:50 — 15:20",
                "15:30 — 17:00",
                "17:10 — 18:40",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Config {
    pub fn get_path() -> Option<PathBuf> {
        if let Ok(path) = env::var("LESSONBOT_CONFIG") {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("com", "lessonbot", "lessonbot")
            .map(|proj| proj.config_dir().join("config.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config file")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config at {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Loads the config file if there is one, otherwise defaults.
    /// `TOKEN` in the environment overrides the file's token.
    pub fn load() -> Result<Self> {
        let mut config = match Self::get_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        if let Ok(token) = env::var("TOKEN")
            && !token.is_empty()
        {
            config.token = token;
        }
        Ok(config)
    }
}
