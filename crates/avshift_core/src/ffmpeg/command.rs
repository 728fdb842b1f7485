//! FFmpeg argument templates.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use crate::naming::Offset;

/// A program plus its arguments, ready to run or print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Start a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments as given.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments converted lossily to strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Tool name for messages (file name of the program path).
    pub fn tool_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.clone())
    }

    /// Shell-like rendering for logs. Not meant to be pasted blindly:
    /// only whitespace and quotes trigger quoting.
    pub fn display(&self) -> String {
        let mut parts = vec![quote(&self.program)];
        parts.extend(self.args_lossy().iter().map(|a| quote(a)));
        parts.join(" ")
    }

    /// Build a `std::process::Command` (stdio not yet configured).
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

fn overwrite_flag(overwrite: bool) -> &'static str {
    if overwrite {
        "-y"
    } else {
        "-n"
    }
}

/// Audio shift: video from an unshifted binding, audio from a shifted one,
/// both stream-copied.
///
/// ```text
/// ffmpeg -n -i IN -itsoffset OFFSET -i IN -map 0:v -map 1:a -c:v copy -c:a copy OUT
/// ```
#[derive(Debug, Clone)]
pub struct ShiftCommand<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub offset: &'a Offset,
    pub overwrite: bool,
}

impl ShiftCommand<'_> {
    /// Build the command line for the given FFmpeg executable.
    pub fn build(&self, ffmpeg: &str) -> ToolCommand {
        ToolCommand::new(ffmpeg)
            .arg(overwrite_flag(self.overwrite))
            // Binding 0: untouched, provides video
            .arg("-i")
            .arg(self.input)
            // Binding 1: same file with its timestamps offset, provides audio
            .arg("-itsoffset")
            .arg(self.offset.as_str())
            .arg("-i")
            .arg(self.input)
            .arg("-map")
            .arg("0:v")
            .arg("-map")
            .arg("1:a")
            .arg("-c:v")
            .arg("copy")
            .arg("-c:a")
            .arg("copy")
            .arg(self.output)
    }
}

/// One equal-duration segment, stream-copied.
///
/// ```text
/// ffmpeg -y -ss START -i IN -t DURATION -c copy OUT
/// ```
#[derive(Debug, Clone)]
pub struct SegmentCommand<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub overwrite: bool,
}

impl SegmentCommand<'_> {
    /// Build the command line for the given FFmpeg executable.
    pub fn build(&self, ffmpeg: &str) -> ToolCommand {
        ToolCommand::new(ffmpeg)
            .arg(overwrite_flag(self.overwrite))
            .arg("-ss")
            .arg(self.start_secs.to_string())
            .arg("-i")
            .arg(self.input)
            .arg("-t")
            .arg(self.duration_secs.to_string())
            .arg("-c")
            .arg("copy")
            .arg(self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_command_matches_template() {
        let offset = Offset::parse("+0.5").unwrap();
        let cmd = ShiftCommand {
            input: Path::new("A.mp4"),
            output: Path::new("A_p0d5_1234.mp4"),
            offset: &offset,
            overwrite: false,
        }
        .build("ffmpeg");

        assert_eq!(cmd.program(), "ffmpeg");
        assert_eq!(
            cmd.args_lossy(),
            vec![
                "-n", "-i", "A.mp4", "-itsoffset", "+0.5", "-i", "A.mp4", "-map", "0:v", "-map",
                "1:a", "-c:v", "copy", "-c:a", "copy", "A_p0d5_1234.mp4"
            ]
        );
    }

    #[test]
    fn shift_command_passes_offset_text_verbatim() {
        let offset = Offset::parse("-3.50").unwrap();
        let cmd = ShiftCommand {
            input: Path::new("A.mp4"),
            output: Path::new("out.mp4"),
            offset: &offset,
            overwrite: true,
        }
        .build("/opt/ffmpeg/bin/ffmpeg");

        let args = cmd.args_lossy();
        assert_eq!(args[0], "-y");
        assert_eq!(args[4], "-3.50");
        assert_eq!(cmd.tool_name(), "ffmpeg");
    }

    #[test]
    fn segment_command_matches_template() {
        let cmd = SegmentCommand {
            input: Path::new("talk.mp4"),
            output: Path::new("talk_4821_2.mp4"),
            start_secs: 60.0,
            duration_secs: 60.0,
            overwrite: true,
        }
        .build("ffmpeg");

        assert_eq!(
            cmd.args_lossy(),
            vec![
                "-y", "-ss", "60", "-i", "talk.mp4", "-t", "60", "-c", "copy",
                "talk_4821_2.mp4"
            ]
        );
    }

    #[test]
    fn display_quotes_whitespace() {
        let cmd = ToolCommand::new("ffmpeg").arg("-i").arg("my clip.mp4").arg("it's.mp4");
        assert_eq!(cmd.display(), r"ffmpeg -i 'my clip.mp4' 'it'\''s.mp4'");
    }
}
