//! Media duration via FFprobe.

use std::path::Path;

use super::command::ToolCommand;
use super::runner::{StdioMode, ToolRunner};
use super::{ToolError, ToolResult};

/// Get the container duration of a media file in seconds.
///
/// Runs:
/// ```text
/// ffprobe -v error -show_entries format=duration -of default=noprint_wrappers=1:nokey=1 IN
/// ```
pub fn probe_duration<R: ToolRunner + ?Sized>(
    runner: &R,
    ffprobe: &str,
    input: &Path,
) -> ToolResult<f64> {
    let command = ToolCommand::new(ffprobe)
        .arg("-v")
        .arg("error")
        .arg("-show_entries")
        .arg("format=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(input);

    let tool = command.tool_name();
    let output = runner
        .run(&command, StdioMode::CaptureAll)?
        .into_result(&tool)?;

    let duration = parse_duration(&output.stdout).ok_or_else(|| ToolError::ParseOutput {
        tool: tool.clone(),
        message: if output.stdout.trim().is_empty() {
            format!("no duration reported. stderr: {}", output.stderr.trim())
        } else {
            format!("unexpected duration '{}'", output.stdout.trim())
        },
    })?;

    tracing::debug!("{} lasts {:.3}s", input.display(), duration);

    Ok(duration)
}

/// Parse FFprobe's bare duration output.
///
/// Returns `None` for empty, `N/A`, non-finite or non-positive values.
pub fn parse_duration(stdout: &str) -> Option<f64> {
    let value: f64 = stdout.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
