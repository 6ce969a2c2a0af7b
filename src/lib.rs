pub mod bot;
pub mod config;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod telegram;
pub mod typing;
