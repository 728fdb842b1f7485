//! FFmpeg and FFprobe invocation.
//!
//! Commands are built as plain argument vectors (`ToolCommand`) and run
//! through the `ToolRunner` trait, so the argument templates can be tested
//! without FFmpeg installed.

mod command;
mod probe;
mod runner;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use command::{SegmentCommand, ShiftCommand, ToolCommand};
pub use probe::{parse_duration, probe_duration};
pub use runner::{ProcessRunner, RunOutput, StdioMode, ToolRunner};

/// Errors from running external tools.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The process could not be started at all.
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and reported failure.
    #[error("{tool} failed with exit code {exit_code}{}", tail_suffix(.message))]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// The tool was killed by a signal.
    #[error("{tool} was terminated by a signal")]
    Terminated { tool: String },

    /// The tool succeeded but its output made no sense.
    #[error("Failed to parse {tool} output: {message}")]
    ParseOutput { tool: String, message: String },
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

fn tail_suffix(message: &str) -> String {
    let message = message.trim();
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_display() {
        let err = ToolError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: 1,
            message: "  File exists \n".to_string(),
        };
        assert_eq!(err.to_string(), "ffmpeg failed with exit code 1: File exists");

        let quiet = ToolError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: 183,
            message: String::new(),
        };
        assert_eq!(quiet.to_string(), "ffmpeg failed with exit code 183");
    }
}
