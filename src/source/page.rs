// File: ./src/source/page.rs
// Scraped schedule page.
//
// The page has no markup worth relying on. Each lesson is three text lines:
// the time, the subject, then a line carrying the location marker
// ("ауд. 305 Иванов И.И."). The marker line is the anchor and the two lines
// right above it belong to it.
use crate::config::PageConfig;
use crate::model::RawFragment;
use crate::source::SourceError;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("lessonbot/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    /// No context line seen since the last marker.
    #[default]
    Seeking,
    /// One context line seen, taken as the time line.
    SeekingWithOne(String),
    /// The last two lines, ready to be claimed by a marker line.
    Capturing {
        time_line: String,
        subject_line: String,
    },
}

/// Line-by-line fragment recognizer.
#[derive(Debug, Clone)]
pub struct LineScanner<'a> {
    location_marker: &'a str,
    state: ScanState,
}

impl<'a> LineScanner<'a> {
    pub fn new(location_marker: &'a str) -> Self {
        Self {
            location_marker,
            state: ScanState::Seeking,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Feeds one non-blank line. Returns a fragment when `line` is a marker
    /// line with two context lines above it.
    pub fn feed(&mut self, line: &str) -> Option<RawFragment> {
        let state = std::mem::take(&mut self.state);

        if let Some(idx) = line.find(self.location_marker) {
            let location = line[idx + self.location_marker.len()..].trim().to_string();
            return match state {
                ScanState::Capturing {
                    time_line,
                    subject_line,
                } => Some(RawFragment::Block {
                    time_line,
                    subject_line,
                    location,
                }),
                _ => {
                    debug!("Marker line without context: {}", line);
                    None
                }
            };
        }

        self.state = match state {
            ScanState::Seeking => ScanState::SeekingWithOne(line.to_string()),
            ScanState::SeekingWithOne(time_line) => ScanState::Capturing {
                time_line,
                subject_line: line.to_string(),
            },
            ScanState::Capturing { subject_line, .. } => ScanState::Capturing {
                time_line: subject_line,
                subject_line: line.to_string(),
            },
        };
        None
    }
}

/// Splits text into trimmed, non-blank lines.
pub fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Elements that start a new rendered line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "dd", "div", "dl", "dt",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead",
    "tr", "ul",
];
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Accumulates inline text until a block boundary closes the line.
#[derive(Default)]
struct LineCollector {
    lines: Vec<String>,
    current: String,
}

impl LineCollector {
    fn break_line(&mut self) {
        let line = self.current.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.current.push_str(text);
                continue;
            }
            let Some(child) = ElementRef::wrap(child) else {
                continue;
            };
            let name = child.value().name();
            if HIDDEN_TAGS.contains(&name) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                self.break_line();
            }
            self.walk(child);
            if block {
                self.break_line();
            }
        }
    }
}

/// Visible text of the page body, one entry per rendered line. Inline
/// markup (`<b>`, `<span>`, ...) stays on its line; whitespace is collapsed.
pub fn html_to_lines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("body") else {
        return Vec::new();
    };
    let Some(body) = document.select(&selector).next() else {
        return Vec::new();
    };

    let mut collector = LineCollector::default();
    collector.walk(body);
    collector.break_line();
    collector.lines
}

/// Fragments from already flattened page lines. Returns nothing when the page
/// marker is configured and missing.
pub fn fragments_from_lines(lines: &[String], config: &PageConfig) -> Vec<RawFragment> {
    if !config.marker.is_empty() && !lines.iter().any(|l| l.contains(&config.marker)) {
        debug!("Page marker {:?} not found, page not rendered", config.marker);
        return Vec::new();
    }
    if config.location_marker.is_empty() {
        return Vec::new();
    }

    let mut scanner = LineScanner::new(&config.location_marker);
    lines.iter().filter_map(|line| scanner.feed(line)).collect()
}

pub fn fragments_from_text(text: &str, config: &PageConfig) -> Vec<RawFragment> {
    fragments_from_lines(&text_lines(text), config)
}

/// Downloads the page with a client that lives only for this call.
pub async fn fetch(config: &PageConfig, timeout: Duration) -> Result<Vec<RawFragment>, SourceError> {
    if config.url.is_empty() {
        return Err(SourceError::NotConfigured);
    }
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    let html = client
        .get(&config.url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(fragments_from_lines(&html_to_lines(&html), config))
}
