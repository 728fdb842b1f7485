//! Input discovery and per-file jobs.
//!
//! This module provides:
//! - `discover_inputs`: wildcard scan of a directory for input files
//! - `ShiftJob`: one input with its derived output name

mod discovery;
mod types;

pub use discovery::{discover_inputs, wildcard_match};
pub use types::ShiftJob;
