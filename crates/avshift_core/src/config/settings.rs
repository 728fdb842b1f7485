//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::naming::{Offset, OutputTemplate, SuffixStrategy, TemplateField};
use crate::split::MAX_SEGMENTS;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Audio shift parameters.
    #[serde(default)]
    pub shift: ShiftSettings,

    /// Segment splitting parameters.
    #[serde(default)]
    pub split: SplitSettings,

    /// External tool locations and flags.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Batch iteration policy.
    #[serde(default)]
    pub batch: BatchSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Check every run parameter, returning all problems found.
    ///
    /// An empty list means the settings can be used to start a run.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Err(e) = Offset::parse(&self.shift.offset_seconds) {
            problems.push(format!("shift.offset_seconds: {}", e));
        }

        if self.shift.input_pattern.trim().is_empty() {
            problems.push("shift.input_pattern: pattern is empty".to_string());
        }

        check_template(
            &mut problems,
            "shift.output_template",
            &self.shift.output_template,
            &[TemplateField::Index],
        );
        check_template(
            &mut problems,
            "shift.single_template",
            &self.shift.single_template,
            &[TemplateField::Index],
        );
        check_template(
            &mut problems,
            "split.output_template",
            &self.split.output_template,
            &[TemplateField::Tag],
        );

        if self.split.split_count == 0 {
            problems.push("split.split_count: must be at least 1".to_string());
        } else if self.split.split_count > MAX_SEGMENTS {
            problems.push(format!(
                "split.split_count: {} exceeds the limit of {}",
                self.split.split_count, MAX_SEGMENTS
            ));
        }

        if self.tools.ffmpeg_path.trim().is_empty() {
            problems.push("tools.ffmpeg_path: path is empty".to_string());
        }
        if self.tools.ffprobe_path.trim().is_empty() {
            problems.push("tools.ffprobe_path: path is empty".to_string());
        }

        problems
    }
}

fn check_template(
    problems: &mut Vec<String>,
    key: &str,
    template: &str,
    forbidden: &[TemplateField],
) {
    match OutputTemplate::parse(template) {
        Ok(parsed) => {
            for field in forbidden {
                if parsed.uses(*field) {
                    problems.push(format!("{}: {} is not available here", key, field));
                }
            }
        }
        Err(e) => problems.push(format!("{}: {}", key, e)),
    }
}

/// Audio shift configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftSettings {
    /// Seconds to shift audio by, kept as text so the name tag follows
    /// exactly what the user typed.
    #[serde(default = "default_offset")]
    pub offset_seconds: String,

    /// Wildcard pattern for batch input discovery.
    #[serde(default = "default_input_pattern")]
    pub input_pattern: String,

    /// Output file name template for batch runs.
    #[serde(default = "default_output_template")]
    pub output_template: String,

    /// Output file name template for single-file runs.
    #[serde(default = "default_single_template")]
    pub single_template: String,

    /// How the numeric output suffix is chosen.
    #[serde(default)]
    pub suffix_strategy: SuffixStrategy,
}

fn default_offset() -> String {
    "+0.5".to_string()
}

fn default_input_pattern() -> String {
    "*.mp4".to_string()
}

fn default_output_template() -> String {
    "{basename}_{tag}_{suffix}.{ext}".to_string()
}

fn default_single_template() -> String {
    "{basename}_out_{suffix}.{ext}".to_string()
}

impl Default for ShiftSettings {
    fn default() -> Self {
        Self {
            offset_seconds: default_offset(),
            input_pattern: default_input_pattern(),
            output_template: default_output_template(),
            single_template: default_single_template(),
            suffix_strategy: SuffixStrategy::default(),
        }
    }
}

/// Segment splitting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitSettings {
    /// Number of equal-duration segments.
    #[serde(default = "default_split_count")]
    pub split_count: u32,

    /// Segment file name template.
    #[serde(default = "default_split_template")]
    pub output_template: String,
}

fn default_split_count() -> u32 {
    2
}

fn default_split_template() -> String {
    "{basename}_{suffix}_{index}.{ext}".to_string()
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            split_count: default_split_count(),
            output_template: default_split_template(),
        }
    }
}

/// External tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// FFmpeg executable.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: String,

    /// FFprobe executable.
    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: String,

    /// Let FFmpeg overwrite an existing output file (`-y`) instead of
    /// refusing (`-n`).
    #[serde(default)]
    pub overwrite: bool,

    /// Capture FFmpeg stderr into the job log instead of passing it through.
    #[serde(default)]
    pub capture_output: bool,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            ffprobe_path: default_ffprobe(),
            overwrite: false,
            capture_output: false,
        }
    }
}

/// Batch iteration policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Stop at the first failed job instead of continuing.
    #[serde(default)]
    pub stop_on_error: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact log format (tool output only shown on failure).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of captured tool output lines to show on failure.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Write one log file per job into `logs_folder`.
    #[serde(default)]
    pub job_logs: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            logs_folder: default_logs_folder(),
            job_logs: false,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Shift,
    Split,
    Tools,
    Batch,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Shift,
        ConfigSection::Split,
        ConfigSection::Tools,
        ConfigSection::Batch,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Shift => "shift",
            ConfigSection::Split => "split",
            ConfigSection::Tools => "tools",
            ConfigSection::Batch => "batch",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in generated files.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Shift => "Audio shift parameters",
            ConfigSection::Split => "Equal-duration segment splitting",
            ConfigSection::Tools => "External tools",
            ConfigSection::Batch => "Batch policy",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[shift]"));
        assert!(toml.contains("[tools]"));
        assert!(toml.contains("offset_seconds"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[shift]\noffset_seconds = \"-3.5\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        // Custom value preserved
        assert_eq!(parsed.shift.offset_seconds, "-3.5");
        // Defaults applied for missing
        assert_eq!(parsed.shift.input_pattern, "*.mp4");
        assert_eq!(parsed.split.split_count, 2);
        assert_eq!(parsed.shift.suffix_strategy, SuffixStrategy::Random);
        assert!(!parsed.tools.overwrite);
    }

    #[test]
    fn suffix_strategy_parses_lowercase() {
        let parsed: Settings = toml::from_str("[shift]\nsuffix_strategy = \"counter\"").unwrap();
        assert_eq!(parsed.shift.suffix_strategy, SuffixStrategy::Counter);
    }

    #[test]
    fn defaults_have_no_problems() {
        assert!(Settings::default().problems().is_empty());
    }

    #[test]
    fn problems_lists_every_bad_value() {
        let mut settings = Settings::default();
        settings.shift.offset_seconds = "half a second".to_string();
        settings.shift.input_pattern = " ".to_string();
        settings.split.split_count = 0;

        let problems = settings.problems();
        assert_eq!(problems.len(), 3);
        assert!(problems[0].starts_with("shift.offset_seconds"));
    }

    #[test]
    fn split_count_is_capped() {
        let mut settings = Settings::default();
        settings.split.split_count = MAX_SEGMENTS;
        assert!(settings.problems().is_empty());

        settings.split.split_count = u32::MAX;
        let problems = settings.problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("split.split_count"));
    }

    #[test]
    fn problems_rejects_misplaced_fields() {
        let mut settings = Settings::default();
        settings.shift.output_template = "{basename}_{index}.{ext}".to_string();
        settings.split.output_template = "{basename}_{tag}.{ext}".to_string();

        let problems = settings.problems();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("{index}"));
        assert!(problems[1].contains("{tag}"));
    }
}
