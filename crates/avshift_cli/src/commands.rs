//! Command dispatch.
//!
//! Every command returns `Ok(true)` when all jobs succeeded, `Ok(false)`
//! when at least one failed, and `Err` when it could not start at all.

use std::sync::Arc;

use anyhow::{Context, Result};

use avshift_core::batch::{BatchProcessor, BatchReport, JobLogging, ShiftOptions};
use avshift_core::config::{ConfigManager, Settings};
use avshift_core::ffmpeg::ProcessRunner;
use avshift_core::logging::{init_tracing, init_tracing_with_file, LogSink, WorkerGuard};
use avshift_core::split::{SplitOptions, Splitter};

use crate::cli::{Cli, Command, ConfigCommand, RunArgs, ShiftArgs, SingleArgs, SplitArgs};

/// Validated settings plus the logging they imply.
struct Session {
    settings: Settings,
    logging: JobLogging,
    _log_guard: Option<WorkerGuard>,
}

/// Run the parsed command line.
pub fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Command::Shift(args) => shift(cli, args),
        Command::Single(args) => single(cli, args),
        Command::Split(args) => split(cli, args),
        Command::Config(command) => config(cli, command),
    }
}

/// Load config, layer CLI flags on top, validate, then start tracing.
fn start(cli: &Cli, apply: impl FnOnce(&mut Settings)) -> Result<Session> {
    let mut config = ConfigManager::new(&cli.config);
    config
        .load_or_default()
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    let settings = config.settings_mut();
    apply(settings);
    for _ in 0..cli.verbose {
        settings.logging.level = settings.logging.level.more_verbose();
    }

    config.validate()?;

    let settings = config.settings().clone();
    let level = settings.logging.level;
    let log_guard = if settings.logging.job_logs {
        init_tracing_with_file(level, &config.logs_folder())
    } else {
        init_tracing(level);
        None
    };

    tracing::debug!("Config: {}", cli.config.display());
    tracing::debug!("Core version: {}", avshift_core::version());

    let sink: LogSink = Arc::new(|line: &str| eprintln!("{}", line));
    let logging = JobLogging::from_settings(&settings.logging).with_sink(sink);

    Ok(Session {
        settings,
        logging,
        _log_guard: log_guard,
    })
}

fn shift(cli: &Cli, args: &ShiftArgs) -> Result<bool> {
    let session = start(cli, |settings| args.apply(settings))?;
    let options = ShiftOptions::batch(&session.settings)?.dry_run(args.run.dry_run);

    tracing::info!(
        "Shifting audio by {}s for '{}' in {}",
        options.offset,
        options.input_pattern,
        args.dir.display()
    );

    let mut processor = BatchProcessor::new(options, ProcessRunner).with_logging(session.logging);
    let report = processor.run_directory(&args.dir)?;

    finish(&report, &args.run)
}

fn single(cli: &Cli, args: &SingleArgs) -> Result<bool> {
    let session = start(cli, |settings| args.apply(settings))?;
    let options = ShiftOptions::single(&session.settings)?.dry_run(args.run.dry_run);

    let mut processor = BatchProcessor::new(options, ProcessRunner).with_logging(session.logging);
    let report = BatchReport {
        results: vec![processor.process_file(&args.input)],
        stopped_early: false,
    };

    finish(&report, &args.run)
}

fn split(cli: &Cli, args: &SplitArgs) -> Result<bool> {
    let session = start(cli, |settings| args.apply(settings))?;
    let options = SplitOptions::from_settings(&session.settings)?.dry_run(args.run.dry_run);

    let mut splitter = Splitter::new(options, ProcessRunner).with_logging(session.logging);
    match splitter.run(&args.input) {
        Ok(report) => finish(&report, &args.run),
        Err(e) => {
            tracing::error!("{}: {}", args.input.display(), e);
            Ok(false)
        }
    }
}

fn config(cli: &Cli, command: &ConfigCommand) -> Result<bool> {
    let mut config = ConfigManager::new(&cli.config);

    match command {
        ConfigCommand::Init { force } => {
            if *force || !config.path().exists() {
                config.save()?;
            } else {
                config.load_or_create()?;
            }
            config.validate()?;
            println!("Config written to {}", config.path().display());
        }
        ConfigCommand::Show => {
            config
                .load_or_default()
                .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
            print!("{}", config.render()?);
        }
    }

    Ok(true)
}

fn finish(report: &BatchReport, run: &RunArgs) -> Result<bool> {
    if run.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for failed in report.results.iter().filter(|r| !r.is_ok()) {
            eprintln!(
                "Failed: {}: {}",
                failed.input.display(),
                failed.error.as_deref().unwrap_or("unknown error")
            );
        }
        println!("{}", report.summary());
    }

    Ok(report.is_success())
}
