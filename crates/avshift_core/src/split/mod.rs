//! Equal-duration splitting.
//!
//! Cuts one input into `count` segments of equal length with stream copy.
//! All segments of one run share a random id so repeated splits of the
//! same file do not collide:
//!
//! ```text
//! talk.mp4 (180s), count 3 -> talk_4821_1.mp4  [  0s, 60s)
//!                             talk_4821_2.mp4  [ 60s,120s)
//!                             talk_4821_3.mp4  [120s,180s)
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::batch::{execute, BatchReport, JobError, JobLogging, JobResult};
use crate::config::Settings;
use crate::ffmpeg::{probe_duration, SegmentCommand, ToolError, ToolRunner};
use crate::naming::{split_name, NameParts, NamingError, OutputTemplate, SuffixGenerator};

/// Upper bound on segments per split.
pub const MAX_SEGMENTS: u32 = 10_000;

/// Errors that prevent a split from starting.
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Segment count must be at least 1")]
    NoSegments,

    #[error("Segment count {0} exceeds the limit of {max}", max = MAX_SEGMENTS)]
    TooManySegments(u32),

    #[error("Could not determine duration: {0}")]
    Probe(#[from] ToolError),

    #[error(transparent)]
    Naming(#[from] NamingError),
}

/// Split run parameters.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Number of segments.
    pub count: u32,
    /// Segment name template.
    pub template: OutputTemplate,
    /// FFmpeg executable.
    pub ffmpeg_path: String,
    /// FFprobe executable.
    pub ffprobe_path: String,
    /// Pass `-y` instead of `-n`.
    pub overwrite: bool,
    /// Capture FFmpeg stderr into the job log.
    pub capture_output: bool,
    /// Plan and print commands without running FFmpeg.
    pub dry_run: bool,
}

impl SplitOptions {
    /// Options from the `[split]` and `[tools]` sections.
    pub fn from_settings(settings: &Settings) -> Result<Self, NamingError> {
        Ok(Self {
            count: settings.split.split_count,
            template: OutputTemplate::parse(&settings.split.output_template)?,
            ffmpeg_path: settings.tools.ffmpeg_path.clone(),
            ffprobe_path: settings.tools.ffprobe_path.clone(),
            overwrite: settings.tools.overwrite,
            capture_output: settings.tools.capture_output,
            dry_run: false,
        })
    }

    /// Enable or disable dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// One planned segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// 1-based position.
    pub index: u32,
    /// Start offset in seconds.
    pub start_secs: f64,
    /// Length in seconds.
    pub duration_secs: f64,
    /// Output path.
    pub output: PathBuf,
}

/// All segments for one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitPlan {
    pub input: PathBuf,
    /// Shared suffix for every segment of this run.
    pub run_id: u32,
    pub segments: Vec<Segment>,
}

impl SplitPlan {
    /// Divide `duration_secs` into `count` equal segments.
    ///
    /// Every segment starts exactly where the previous one ends and the
    /// last one ends at `duration_secs`. Pure: does not look at the input
    /// file.
    pub fn new(
        input: &Path,
        duration_secs: f64,
        count: u32,
        run_id: u32,
        template: &OutputTemplate,
    ) -> Result<Self, SplitError> {
        check_count(count)?;

        let (dir, basename, extension) = split_name(input)?;
        let boundary = |k: u32| {
            if k == count {
                duration_secs
            } else {
                duration_secs * f64::from(k) / f64::from(count)
            }
        };

        let segments = (1..=count)
            .map(|index| {
                let parts = NameParts {
                    basename: &basename,
                    tag: None,
                    suffix: run_id,
                    extension: &extension,
                    index: Some(index),
                };
                let start = boundary(index - 1);
                Ok(Segment {
                    index,
                    start_secs: start,
                    duration_secs: boundary(index) - start,
                    output: dir.join(template.render(&parts)?),
                })
            })
            .collect::<Result<Vec<_>, NamingError>>()?;

        Ok(Self {
            input: input.to_path_buf(),
            run_id,
            segments,
        })
    }
}

/// Splits files into equal segments, one segment at a time.
pub struct Splitter<R: ToolRunner> {
    options: SplitOptions,
    runner: R,
    suffixes: Box<dyn SuffixGenerator>,
    logging: JobLogging,
}

impl<R: ToolRunner> Splitter<R> {
    /// Create a splitter with random run ids.
    pub fn new(options: SplitOptions, runner: R) -> Self {
        Self {
            options,
            runner,
            suffixes: crate::naming::SuffixStrategy::Random.generator(),
            logging: JobLogging::default(),
        }
    }

    /// Replace the run id generator.
    pub fn with_suffixes(mut self, suffixes: Box<dyn SuffixGenerator>) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Set logging.
    pub fn with_logging(mut self, logging: JobLogging) -> Self {
        self.logging = logging;
        self
    }

    /// The runner used for FFmpeg and FFprobe.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Probe the input and plan its segments.
    pub fn plan(&mut self, input: &Path) -> Result<SplitPlan, SplitError> {
        check_count(self.options.count)?;
        if !input.is_file() {
            return Err(SplitError::InputNotFound(input.to_path_buf()));
        }

        let duration = probe_duration(&self.runner, &self.options.ffprobe_path, input)?;
        let run_id = self.suffixes.next_suffix();

        SplitPlan::new(input, duration, self.options.count, run_id, &self.options.template)
    }

    /// Plan and cut every segment.
    ///
    /// A failed segment is recorded and the remaining segments still run.
    pub fn run(&mut self, input: &Path) -> Result<BatchReport, SplitError> {
        let plan = self.plan(input)?;
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        let logger = self.logging.logger_for(&format!("split_{}", name));

        let total = plan.segments.len();
        logger.phase(&format!(
            "Split {} into {} segment(s), id {}",
            input.display(),
            total,
            plan.run_id
        ));

        let mut report = BatchReport::default();

        for segment in &plan.segments {
            logger.info(&format!(
                "Creating segment {}/{}: {}",
                segment.index,
                total,
                segment.output.display()
            ));
            logger.debug(&format!(
                "Segment {} starts at {}s and lasts {}s",
                segment.index, segment.start_secs, segment.duration_secs
            ));

            let command = SegmentCommand {
                input,
                output: &segment.output,
                start_secs: segment.start_secs,
                duration_secs: segment.duration_secs,
                overwrite: self.options.overwrite,
            }
            .build(&self.options.ffmpeg_path);

            let result = if self.options.dry_run {
                logger.dry_run(&command.display());
                JobResult::dry_run(input.to_path_buf(), segment.output.clone())
            } else {
                match execute(&self.runner, &command, self.options.capture_output, &logger) {
                    Ok(()) => JobResult::success(input.to_path_buf(), segment.output.clone()),
                    Err(error) => {
                        logger.error(&error.to_string());
                        failure(input, &segment.output, error)
                    }
                }
            };

            report.results.push(result);
            let percent = u64::from(segment.index) * 100 / total as u64;
            logger.progress(percent as u32);
        }

        logger.success(&format!(
            "Done. {} of {} segment(s) created with id {}",
            report.succeeded() + report.dry_runs(),
            total,
            plan.run_id
        ));

        Ok(report)
    }
}

fn check_count(count: u32) -> Result<(), SplitError> {
    match count {
        0 => Err(SplitError::NoSegments),
        n if n > MAX_SEGMENTS => Err(SplitError::TooManySegments(n)),
        _ => Ok(()),
    }
}

fn failure(input: &Path, output: &Path, error: JobError) -> JobResult {
    JobResult::failure(input.to_path_buf(), Some(output.to_path_buf()), &error)
}
