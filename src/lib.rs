//! Subburn - Subtitle Transfer Pipeline
//!
//! Finds a subtitled and a clean copy of the same video, extracts and
//! translates the subtitles of the first and burns them into the second.
//! Searching, OCR, translation, rendering and delivery are delegated to
//! external tools; this crate decides what to ask them for and in what order.

pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod language;
pub mod media;
pub mod pipeline;
pub mod query;
pub mod region;
pub mod resolver;
pub mod source;
pub mod translate;
