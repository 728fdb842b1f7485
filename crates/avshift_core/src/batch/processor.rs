//! Batch processor for shifting audio across many inputs.
//!
//! Jobs run strictly one after another: plan the output name, run FFmpeg,
//! wait for it, record the result, move on.

use std::path::{Path, PathBuf};

use crate::config::LoggingSettings;
use crate::ffmpeg::{ShiftCommand, StdioMode, ToolCommand, ToolRunner};
use crate::jobs::{discover_inputs, ShiftJob};
use crate::logging::{JobLogger, LogConfig, LogSink};
use crate::naming::{NamingError, SuffixGenerator};

use super::errors::{BatchError, JobError};
use super::options::ShiftOptions;
use super::types::{BatchReport, JobResult};

/// Where per-job log output goes.
#[derive(Clone, Default)]
pub struct JobLogging {
    /// Per-job logger configuration.
    pub config: LogConfig,
    /// Folder for one log file per job, if enabled.
    pub log_dir: Option<PathBuf>,
    /// Callback receiving every log line.
    pub sink: Option<LogSink>,
}

impl JobLogging {
    /// Build from the `[logging]` config section.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            config: LogConfig::from_settings(settings),
            log_dir: settings
                .job_logs
                .then(|| PathBuf::from(&settings.logs_folder)),
            sink: None,
        }
    }

    /// Set the line callback.
    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Create the logger for one job.
    ///
    /// Falls back to sink-only logging if the log file cannot be created.
    pub fn logger_for(&self, job_name: &str) -> JobLogger {
        match JobLogger::new(
            job_name,
            self.log_dir.as_deref(),
            self.config.clone(),
            self.sink.clone(),
        ) {
            Ok(logger) => logger,
            Err(e) => {
                let logger = JobLogger::detached(self.config.clone(), self.sink.clone());
                logger.warn(&format!(
                    "Could not create log file for {}: {}. Logging to console only.",
                    job_name, e
                ));
                logger
            }
        }
    }
}

/// Run one prepared command, feeding captured stderr to the job logger.
///
/// A non-zero exit becomes `JobError::Tool`; the captured tail is shown
/// before returning it.
pub(crate) fn execute<R: ToolRunner + ?Sized>(
    runner: &R,
    command: &ToolCommand,
    capture_output: bool,
    logger: &JobLogger,
) -> Result<(), JobError> {
    logger.command(&command.display());

    let mode = if capture_output {
        StdioMode::CaptureStderr
    } else {
        StdioMode::Inherit
    };

    let tool = command.tool_name();
    let output = runner.run(command, mode)?;

    for line in output.stderr_lines() {
        logger.output_line(line, true);
    }

    if !output.success() {
        logger.show_tail(&tool);
    }
    output.into_result(&tool)?;

    Ok(())
}

/// Processor that shifts audio for each input in turn.
///
/// # Example
///
/// ```no_run
/// use avshift_core::batch::{BatchProcessor, ShiftOptions};
/// use avshift_core::config::Settings;
/// use avshift_core::ffmpeg::ProcessRunner;
///
/// let options = ShiftOptions::batch(&Settings::default()).unwrap();
/// let mut processor = BatchProcessor::new(options, ProcessRunner);
/// let report = processor.run_directory(".".as_ref()).unwrap();
/// println!("{}", report.summary());
/// ```
pub struct BatchProcessor<R: ToolRunner> {
    options: ShiftOptions,
    runner: R,
    suffixes: Box<dyn SuffixGenerator>,
    logging: JobLogging,
}

impl<R: ToolRunner> BatchProcessor<R> {
    /// Create a processor using the suffix strategy from `options`.
    pub fn new(options: ShiftOptions, runner: R) -> Self {
        let suffixes = options.suffix_strategy.generator();
        Self {
            options,
            runner,
            suffixes,
            logging: JobLogging::default(),
        }
    }

    /// Replace the suffix generator.
    pub fn with_suffixes(mut self, suffixes: Box<dyn SuffixGenerator>) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Set per-job logging.
    pub fn with_logging(mut self, logging: JobLogging) -> Self {
        self.logging = logging;
        self
    }

    /// Run parameters.
    pub fn options(&self) -> &ShiftOptions {
        &self.options
    }

    /// The runner used for FFmpeg.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Derive the output for one input, drawing a fresh suffix.
    pub fn plan_job(&mut self, input: &Path) -> Result<ShiftJob, NamingError> {
        let tag = self.options.offset.tag();
        let suffix = self.suffixes.next_suffix();
        ShiftJob::plan(input, Some(&tag), suffix, &self.options.template)
    }

    /// Run FFmpeg for a planned job and wait for it.
    pub fn process_job(&self, job: &ShiftJob) -> JobResult {
        let logger = self.logging.logger_for(&job.name());

        logger.phase(&format!("Shift {}", job.input.display()));
        logger.info(&format!(
            "Audio offset {}s -> {}",
            self.options.offset,
            job.output.display()
        ));

        if !job.input.is_file() {
            let error = JobError::InputNotFound(job.input.clone());
            logger.error(&error.to_string());
            return JobResult::failure(job.input.clone(), Some(job.output.clone()), &error);
        }

        let command = ShiftCommand {
            input: &job.input,
            output: &job.output,
            offset: &self.options.offset,
            overwrite: self.options.overwrite,
        }
        .build(&self.options.ffmpeg_path);

        if self.options.dry_run {
            logger.dry_run(&command.display());
            return JobResult::dry_run(job.input.clone(), job.output.clone());
        }

        match execute(&self.runner, &command, self.options.capture_output, &logger) {
            Ok(()) => {
                logger.success(&format!("Wrote {}", job.output.display()));
                JobResult::success(job.input.clone(), job.output.clone())
            }
            Err(error) => {
                logger.error(&error.to_string());
                JobResult::failure(job.input.clone(), Some(job.output.clone()), &error)
            }
        }
    }

    /// Plan and process a single input.
    pub fn process_file(&mut self, input: &Path) -> JobResult {
        match self.plan_job(input) {
            Ok(job) => self.process_job(&job),
            Err(e) => {
                let error = JobError::from(e);
                tracing::error!("{}: {}", input.display(), error);
                JobResult::failure(input.to_path_buf(), None, &error)
            }
        }
    }

    /// Process inputs sequentially, collecting results.
    ///
    /// Failed jobs are recorded and the batch moves on, unless
    /// `stop_on_error` is set.
    pub fn run_inputs(&mut self, inputs: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::default();

        for (i, input) in inputs.iter().enumerate() {
            tracing::info!("Processing {}/{}: {}", i + 1, inputs.len(), input.display());

            let result = self.process_file(input);
            let failed = !result.is_ok();
            report.results.push(result);

            if failed && self.options.stop_on_error {
                if i + 1 < inputs.len() {
                    report.stopped_early = true;
                    tracing::warn!(
                        "Stopping after failure; {} input(s) not processed",
                        inputs.len() - i - 1
                    );
                }
                break;
            }
        }

        report
    }

    /// Discover inputs in `dir` with the configured pattern and process them.
    ///
    /// No matches is not an error: the report is simply empty and FFmpeg
    /// is never started.
    pub fn run_directory(&mut self, dir: &Path) -> Result<BatchReport, BatchError> {
        let inputs =
            discover_inputs(dir, &self.options.input_pattern).map_err(|source| {
                BatchError::Discovery {
                    dir: dir.to_path_buf(),
                    source,
                }
            })?;

        if inputs.is_empty() {
            tracing::info!(
                "No files matching '{}' in {}",
                self.options.input_pattern,
                dir.display()
            );
            return Ok(BatchReport::default());
        }

        Ok(self.run_inputs(&inputs))
    }
}
