// File: ./src/merge.rs
// Reconciles lessons reported by two independent sources for the same day.
//
// Alignment is decided once per call:
// - ByTime: any specified `time` string is shared by both sides, or every
//   record on both sides has a readable start time. Records pair up on exact
//   `time` equality; unmatched ones are kept as they are.
// - Positional: otherwise, if both sides have the same length. The i-th
//   records are paired.
// - ByTime (no pairs) in every remaining case.
use crate::model::{LessonRecord, is_specified};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which side wins a field when both sides have a value for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    #[default]
    Primary,
    Secondary,
}

/// Per-field precedence. A sentinel never beats a real value, whatever the
/// authority says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    pub time: Authority,
    pub subject: Authority,
    pub room: Authority,
    pub teacher: Authority,
}

impl MergePolicy {
    /// Calendar as primary for time, room and teacher; the scraped page as
    /// secondary for subject names.
    pub const fn calendar_rooms_page_subjects() -> Self {
        Self {
            time: Authority::Primary,
            subject: Authority::Secondary,
            room: Authority::Primary,
            teacher: Authority::Primary,
        }
    }

    pub const fn primary_wins() -> Self {
        Self {
            time: Authority::Primary,
            subject: Authority::Primary,
            room: Authority::Primary,
            teacher: Authority::Primary,
        }
    }

    pub const fn secondary_wins() -> Self {
        Self {
            time: Authority::Secondary,
            subject: Authority::Secondary,
            room: Authority::Secondary,
            teacher: Authority::Secondary,
        }
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::calendar_rooms_page_subjects()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Both sides reported the same `time` string.
    Time,
    /// Paired by index only.
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Matched(MatchKind),
    PrimaryOnly,
    SecondaryOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// One side was empty; the other passed through untouched.
    Passthrough,
    ByTime,
    Positional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedLesson {
    pub record: LessonRecord,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    alignment: Alignment,
    lessons: Vec<MergedLesson>,
}

impl Merged {
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn lessons(&self) -> &[MergedLesson] {
        &self.lessons
    }

    pub fn into_records(self) -> Vec<LessonRecord> {
        self.lessons.into_iter().map(|l| l.record).collect()
    }

    pub fn count(&self, origin: Origin) -> usize {
        self.lessons.iter().filter(|l| l.origin == origin).count()
    }
}

fn pick(primary: &str, secondary: &str, authority: Authority) -> String {
    let (first, second) = match authority {
        Authority::Primary => (primary, secondary),
        Authority::Secondary => (secondary, primary),
    };
    let chosen = if is_specified(first) { first } else { second };
    chosen.to_string()
}

fn combine(primary: &LessonRecord, secondary: &LessonRecord, policy: &MergePolicy) -> LessonRecord {
    LessonRecord::new(
        pick(&primary.time, &secondary.time, policy.time),
        pick(&primary.subject, &secondary.subject, policy.subject),
        pick(&primary.room, &secondary.room, policy.room),
        pick(&primary.teacher, &secondary.teacher, policy.teacher),
    )
}

fn shares_time(a: &LessonRecord, b: &LessonRecord) -> bool {
    is_specified(&a.time) && a.time == b.time
}

fn choose_alignment(primary: &[LessonRecord], secondary: &[LessonRecord]) -> Alignment {
    let any_shared = secondary
        .iter()
        .any(|s| primary.iter().any(|p| shares_time(p, s)));
    let all_timed = primary
        .iter()
        .chain(secondary)
        .all(|r| r.parsed_time.is_some());

    if any_shared || all_timed || primary.len() != secondary.len() {
        Alignment::ByTime
    } else {
        Alignment::Positional
    }
}

fn tag(records: Vec<LessonRecord>, origin: Origin) -> Vec<MergedLesson> {
    records
        .into_iter()
        .map(|record| MergedLesson { record, origin })
        .collect()
}

pub fn merge(
    primary: Vec<LessonRecord>,
    secondary: Vec<LessonRecord>,
    policy: &MergePolicy,
) -> Merged {
    if secondary.is_empty() || primary.is_empty() {
        let lessons = if secondary.is_empty() {
            tag(primary, Origin::PrimaryOnly)
        } else {
            tag(secondary, Origin::SecondaryOnly)
        };
        return Merged {
            alignment: Alignment::Passthrough,
            lessons,
        };
    }

    let alignment = choose_alignment(&primary, &secondary);
    let lessons = match alignment {
        Alignment::Positional => primary
            .iter()
            .zip(&secondary)
            .map(|(p, s)| MergedLesson {
                record: combine(p, s, policy),
                origin: Origin::Matched(MatchKind::Position),
            })
            .collect(),
        _ => {
            let mut lessons = tag(primary, Origin::PrimaryOnly);
            for record in secondary {
                let slot = lessons.iter().position(|l| {
                    l.origin == Origin::PrimaryOnly && shares_time(&l.record, &record)
                });
                match slot {
                    Some(i) => {
                        let combined = combine(&lessons[i].record, &record, policy);
                        lessons[i] = MergedLesson {
                            record: combined,
                            origin: Origin::Matched(MatchKind::Time),
                        };
                    }
                    None => lessons.push(MergedLesson {
                        record,
                        origin: Origin::SecondaryOnly,
                    }),
                }
            }
            lessons
        }
    };

    let merged = Merged { alignment, lessons };
    debug!(
        "Merged by {:?}: {} paired, {} primary-only, {} secondary-only",
        merged.alignment,
        merged.count(Origin::Matched(MatchKind::Time))
            + merged.count(Origin::Matched(MatchKind::Position)),
        merged.count(Origin::PrimaryOnly),
        merged.count(Origin::SecondaryOnly)
    );
    merged
}
