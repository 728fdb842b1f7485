//! avshift core - backend logic for the avshift tool
//!
//! This crate contains all naming, discovery and FFmpeg invocation logic
//! with zero CLI dependencies. The actual audio/video realignment is done
//! by FFmpeg; this crate only decides what to run and what to call the
//! results.

pub mod batch;
pub mod config;
pub mod ffmpeg;
pub mod jobs;
pub mod logging;
pub mod naming;
pub mod split;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
