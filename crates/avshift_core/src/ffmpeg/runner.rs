//! Synchronous process execution.

use std::process::Stdio;

use super::command::ToolCommand;
use super::{ToolError, ToolResult};

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Child writes straight to our stdout/stderr.
    Inherit,
    /// Stdout passes through, stderr is captured.
    CaptureStderr,
    /// Both streams are captured.
    CaptureAll,
}

/// Outcome of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code, `None` if killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout (empty unless captured).
    pub stdout: String,
    /// Captured stderr (empty unless captured).
    pub stderr: String,
}

impl RunOutput {
    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into a `ToolError`.
    pub fn into_result(self, tool: &str) -> ToolResult<RunOutput> {
        match self.exit_code {
            Some(0) => Ok(self),
            Some(exit_code) => Err(ToolError::CommandFailed {
                tool: tool.to_string(),
                exit_code,
                message: last_line(&self.stderr),
            }),
            None => Err(ToolError::Terminated {
                tool: tool.to_string(),
            }),
        }
    }

    /// Captured stderr split into lines.
    pub fn stderr_lines(&self) -> impl Iterator<Item = &str> {
        self.stderr.lines().filter(|l| !l.trim().is_empty())
    }
}

fn last_line(text: &str) -> String {
    text.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Something that can run a `ToolCommand` to completion.
///
/// Implementations block until the process exits. A non-zero exit is
/// returned as `Ok` with the code; only failing to start is an `Err`.
pub trait ToolRunner {
    fn run(&self, command: &ToolCommand, mode: StdioMode) -> ToolResult<RunOutput>;
}

impl<R: ToolRunner + ?Sized> ToolRunner for &R {
    fn run(&self, command: &ToolCommand, mode: StdioMode) -> ToolResult<RunOutput> {
        (**self).run(command, mode)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, command: &ToolCommand, mode: StdioMode) -> ToolResult<RunOutput> {
        let mut cmd = command.to_command();
        // FFmpeg reads stdin for interactive keys; never let it block on us
        cmd.stdin(Stdio::null());

        tracing::debug!("Running: {}", command.display());

        let spawn_error = |source| ToolError::Spawn {
            tool: command.tool_name(),
            source,
        };

        match mode {
            StdioMode::Inherit => {
                let status = cmd
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(spawn_error)?;

                Ok(RunOutput {
                    exit_code: status.code(),
                    ..RunOutput::default()
                })
            }
            StdioMode::CaptureStderr | StdioMode::CaptureAll => {
                let stdout = if mode == StdioMode::CaptureAll {
                    Stdio::piped()
                } else {
                    Stdio::inherit()
                };

                let output = cmd
                    .stdout(stdout)
                    .stderr(Stdio::piped())
                    .output()
                    .map_err(spawn_error)?;

                Ok(RunOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_result_maps_exit_codes() {
        let ok = RunOutput {
            exit_code: Some(0),
            ..Default::default()
        };
        assert!(ok.success());
        assert!(ok.into_result("ffmpeg").is_ok());

        let failed = RunOutput {
            exit_code: Some(1),
            stderr: "Input #0...\nA.mp4: Invalid data found when processing input\n\n".to_string(),
            ..Default::default()
        };
        match failed.into_result("ffmpeg") {
            Err(ToolError::CommandFailed {
                tool,
                exit_code,
                message,
            }) => {
                assert_eq!(tool, "ffmpeg");
                assert_eq!(exit_code, 1);
                assert_eq!(message, "A.mp4: Invalid data found when processing input");
            }
            other => panic!("unexpected: {:?}", other),
        }

        let killed = RunOutput::default();
        assert!(matches!(
            killed.into_result("ffmpeg"),
            Err(ToolError::Terminated { .. })
        ));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let cmd = ToolCommand::new("avshift-test-no-such-program").arg("-version");
        let result = ProcessRunner.run(&cmd, StdioMode::CaptureAll);
        assert!(matches!(result, Err(ToolError::Spawn { .. })));
    }

    #[test]
    fn stderr_lines_skip_blank() {
        let output = RunOutput {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: "one\n\n  \ntwo\n".to_string(),
        };
        assert_eq!(output.stderr_lines().collect::<Vec<_>>(), vec!["one", "two"]);
    }
}
