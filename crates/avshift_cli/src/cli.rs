//! Command line surface.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use avshift_core::config::Settings;
use avshift_core::naming::SuffixStrategy;

/// Default config path: .config/avshift.toml (relative to current working directory)
pub const DEFAULT_CONFIG: &str = ".config/avshift.toml";

#[derive(Parser, Debug)]
#[command(name = "avshift", version)]
#[command(about = "Shift the audio track of video files relative to their video with FFmpeg", long_about = None)]
pub struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shift audio for every matching file in a directory
    Shift(ShiftArgs),
    /// Shift audio for one file
    Single(SingleArgs),
    /// Cut one file into equal-length segments
    Split(SplitArgs),
    /// Manage the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Write the config file, filling in missing keys
    Init {
        /// Replace an existing file with defaults
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
}

/// Flags shared by every command that runs FFmpeg.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Let FFmpeg overwrite existing outputs (-y instead of -n)
    #[arg(long)]
    pub overwrite: bool,

    /// Capture FFmpeg stderr and show its tail on failure
    #[arg(long)]
    pub capture: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    fn apply(&self, settings: &mut Settings) {
        if self.overwrite {
            settings.tools.overwrite = true;
        }
        if self.capture {
            settings.tools.capture_output = true;
        }
    }
}

#[derive(Args, Debug)]
pub struct ShiftArgs {
    /// Audio offset in seconds, e.g. +0.5 or -3.5
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<String>,

    /// Directory to scan
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Wildcard for input names
    #[arg(long)]
    pub pattern: Option<String>,

    /// Output name template
    #[arg(long)]
    pub template: Option<String>,

    /// Use sequential suffixes instead of random ones
    #[arg(long)]
    pub counter: bool,

    /// Stop at the first failed file
    #[arg(long)]
    pub stop_on_error: bool,

    #[command(flatten)]
    pub run: RunArgs,
}

impl ShiftArgs {
    /// Layer the flags over the loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(offset) = &self.offset {
            settings.shift.offset_seconds = offset.clone();
        }
        if let Some(pattern) = &self.pattern {
            settings.shift.input_pattern = pattern.clone();
        }
        if let Some(template) = &self.template {
            settings.shift.output_template = template.clone();
        }
        if self.counter {
            settings.shift.suffix_strategy = SuffixStrategy::Counter;
        }
        if self.stop_on_error {
            settings.batch.stop_on_error = true;
        }
        self.run.apply(settings);
    }
}

#[derive(Args, Debug)]
pub struct SingleArgs {
    /// File to process
    pub input: PathBuf,

    /// Audio offset in seconds
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<String>,

    /// Output name template
    #[arg(long)]
    pub template: Option<String>,

    #[command(flatten)]
    pub run: RunArgs,
}

impl SingleArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(offset) = &self.offset {
            settings.shift.offset_seconds = offset.clone();
        }
        if let Some(template) = &self.template {
            settings.shift.single_template = template.clone();
        }
        self.run.apply(settings);
    }
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// File to split
    pub input: PathBuf,

    /// Number of segments
    #[arg(long)]
    pub count: Option<u32>,

    #[command(flatten)]
    pub run: RunArgs,
}

impl SplitArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(count) = self.count {
            settings.split.split_count = count;
        }
        self.run.apply(settings);
    }
}
