// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod adapter;
pub mod item;
pub mod parser;

pub use item::{LessonRecord, NOT_SPECIFIED, RawFragment, ScheduleDay, is_specified, sort_lessons};
pub use parser::extract;
