//! Error types for batch processing.
//!
//! Job errors never abort a batch by themselves; they are recorded in the
//! job's `JobResult`. Only failing to list the input directory stops a run
//! before it starts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ffmpeg::ToolError;
use crate::naming::NamingError;

/// Why a single job failed.
#[derive(Error, Debug)]
pub enum JobError {
    /// Input file missing before anything was run.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Output name could not be derived.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// FFmpeg failed to start or reported failure.
    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl JobError {
    /// Exit code of the external tool, if it ran and failed.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            JobError::Tool(ToolError::CommandFailed { exit_code, .. }) => Some(*exit_code),
            _ => None,
        }
    }
}

/// Why a whole batch could not run.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The input directory could not be read.
    #[error("Failed to list inputs in {dir}: {source}")]
    Discovery {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_only_for_command_failures() {
        let failed = JobError::Tool(ToolError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: 234,
            message: String::new(),
        });
        assert_eq!(failed.exit_code(), Some(234));

        let missing = JobError::InputNotFound(PathBuf::from("A.mp4"));
        assert_eq!(missing.exit_code(), None);
        assert_eq!(missing.to_string(), "Input file not found: A.mp4");
    }
}
