//! Terminal front end helpers for RuteKita
//!
//! Provides shared CLI functionality:
//! - Status and notification output
//! - Spinner for backend calls
//! - Text rendering of the control panel, result card and map scene

pub mod output;
pub mod progress;
pub mod render;
