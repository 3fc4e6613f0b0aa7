//! Configuration management

mod placement;

pub use placement::{resolve_targets, SyncPair, TargetPlan};

use super::types::SmartCopyError;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Examples:
  smartcopy source dest              # Basic copy
  smartcopy -d source dest           # Copy and detect extra files
  smartcopy -D source dest           # Copy and delete extra files
  smartcopy src1 src2 dest           # Copy both sources into dest/";

/// Copy files and directories, skipping those already up to date
#[derive(Debug, Parser)]
#[command(name = "smartcopy", version, after_help = AFTER_HELP)]
pub struct Cli {
    /// Detect extra files in destination not present in source
    #[arg(short = 'd', long = "detect-extra")]
    pub detect_extra: bool,

    /// Detect and delete extra files in destination not present in source
    #[arg(short = 'D', long = "delete-extra")]
    pub delete_extra: bool,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print the final statistics as JSON instead of progress text
    #[arg(long)]
    pub json: bool,

    /// One or more sources followed by the destination
    #[arg(value_name = "PATH", required = true, num_args = 2..)]
    pub paths: Vec<PathBuf>,
}

/// Extra-entry handling for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Report destination-only entries
    pub detect_extra: bool,

    /// Also remove them (implies `detect_extra`)
    pub delete_extra: bool,
}

impl SyncOptions {
    pub fn new(detect_extra: bool, delete_extra: bool) -> Self {
        Self {
            detect_extra: detect_extra || delete_extra,
            delete_extra,
        }
    }
}

/// How the run reports to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Per-file progress lines and the summary line
    #[default]
    Text,

    /// Only a JSON statistics report
    Json,
}

/// Global configuration for smartcopy
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Source paths, in command-line order
    pub sources: Vec<PathBuf>,

    /// Destination path
    pub destination: PathBuf,

    pub options: SyncOptions,

    pub output: OutputMode,

    /// `-v` count
    pub verbosity: u8,
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SmartCopyError> {
        if self.sources.is_empty() {
            return Err(SmartCopyError::InvalidArguments(
                "at least one source and a destination are required".to_string(),
            ));
        }

        if self.destination.as_os_str().is_empty() {
            return Err(SmartCopyError::InvalidArguments(
                "destination path is empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Default tracing filter directive for the configured verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = SmartCopyError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut paths = cli.paths;
        let destination = match paths.pop() {
            Some(d) if !paths.is_empty() => d,
            _ => {
                return Err(SmartCopyError::InvalidArguments(
                    "insufficient arguments: expected <source>... <destination>".to_string(),
                ))
            }
        };

        let config = Config {
            sources: paths,
            destination,
            options: SyncOptions::new(cli.detect_extra, cli.delete_extra),
            output: if cli.json {
                OutputMode::Json
            } else {
                OutputMode::Text
            },
            verbosity: cli.verbose,
        };
        config.validate()?;
        Ok(config)
    }
}
