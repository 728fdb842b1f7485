//! Run parameters resolved from settings.

use crate::config::Settings;
use crate::naming::{NamingResult, Offset, OutputTemplate, SuffixStrategy};

/// Everything a shift run needs, parsed and checked up front.
#[derive(Debug, Clone)]
pub struct ShiftOptions {
    /// Audio offset.
    pub offset: Offset,
    /// Wildcard used for batch discovery.
    pub input_pattern: String,
    /// Output name template.
    pub template: OutputTemplate,
    /// Suffix generator choice.
    pub suffix_strategy: SuffixStrategy,
    /// FFmpeg executable.
    pub ffmpeg_path: String,
    /// Pass `-y` instead of `-n`.
    pub overwrite: bool,
    /// Capture FFmpeg stderr into the job log.
    pub capture_output: bool,
    /// Stop the batch at the first failed job.
    pub stop_on_error: bool,
    /// Plan and print commands without running them.
    pub dry_run: bool,
}

impl ShiftOptions {
    /// Options for a batch run (`shift.output_template`).
    pub fn batch(settings: &Settings) -> NamingResult<Self> {
        Self::with_template(settings, &settings.shift.output_template)
    }

    /// Options for a single-file run (`shift.single_template`).
    pub fn single(settings: &Settings) -> NamingResult<Self> {
        Self::with_template(settings, &settings.shift.single_template)
    }

    fn with_template(settings: &Settings, template: &str) -> NamingResult<Self> {
        Ok(Self {
            offset: Offset::parse(&settings.shift.offset_seconds)?,
            input_pattern: settings.shift.input_pattern.clone(),
            template: OutputTemplate::parse(template)?,
            suffix_strategy: settings.shift.suffix_strategy,
            ffmpeg_path: settings.tools.ffmpeg_path.clone(),
            overwrite: settings.tools.overwrite,
            capture_output: settings.tools.capture_output,
            stop_on_error: settings.batch.stop_on_error,
            dry_run: false,
        })
    }

    /// Enable or disable dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
