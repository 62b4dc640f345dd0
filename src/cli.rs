//! Command-line parsing.
//!
//! `Args` is the raw `clap` view of the command line. `Args::into_config`
//! is the boundary where every value is parsed, defaulted and validated; it
//! produces the [`Config`] consumed by the walker and the output layer.

#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{self, PathBuf};

use clap::{ArgAction, Parser};
use tracing::{info, warn};

use crate::config::{
    Config, ConfigError, ConfigResult, DEFAULT_EXCLUDES, OutputOptions, SizeUnit, TraversalConfig,
};
use crate::error::DirtreeResult;
use crate::gitignore::load_gitignore_names;
use crate::scan::resolve_root;

/// Render a directory as a tree diagram.
#[derive(Parser, Debug, Clone)]
#[command(name = "dirtree", version, about = "Render a directory as a tree diagram")]
pub struct Args {
    /// Directory to display
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Descend only DEPTH levels in the directory tree
    #[arg(short = 'L', long = "level", value_name = "DEPTH", allow_hyphen_values = true)]
    pub level: Option<String>,

    /// Write the tree to FILE (Markdown-fenced for .md) instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Comma-separated entry names to exclude [default: node_modules,.git]
    #[arg(short = 'e', long = "exclude", value_name = "NAMES")]
    pub exclude: Option<String>,

    /// Display icons for files and directories
    #[arg(short = 'i', long = "icons")]
    pub icons: bool,

    /// Display size and last modification time
    #[arg(short = 'm', long = "metadata")]
    pub metadata: bool,

    /// Display only the size in metadata
    #[arg(long = "size-only")]
    pub size_only: bool,

    /// Size unit: B, KB, MB or GB
    #[arg(long = "size-unit", value_name = "UNIT", default_value = "B")]
    pub size_unit: String,

    /// Also exclude names listed in the root's .gitignore
    #[arg(long = "use-gitignore")]
    pub use_gitignore: bool,

    /// Sort each directory listing by name
    #[arg(short = 's', long = "sort")]
    pub sort: bool,

    /// List symbolically linked directories without descending into them
    #[arg(long = "no-follow-symlinks")]
    pub no_follow_symlinks: bool,

    /// Worker threads used to render sibling subtrees
    #[arg(short = 't', long = "threads", value_name = "N", default_value = "1")]
    pub threads: NonZeroUsize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Default log filter for the requested verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Validates the arguments and builds the run configuration.
    ///
    /// Steps, in order: depth and size unit are parsed, the root is resolved,
    /// exclusions are assembled (merging `.gitignore` names when requested),
    /// and the output target is made absolute.
    ///
    /// # Errors
    ///
    /// - `ConfigError` for an invalid depth or size unit
    /// - `ScanError` when the root is missing or not a directory
    ///
    /// An unreadable `.gitignore` is logged and otherwise ignored.
    pub fn into_config(self) -> DirtreeResult<Config> {
        let max_depth = parse_level(self.level.as_deref())?;
        let size_unit = parse_size_unit(&self.size_unit)?;
        let root_path = resolve_root(&self.path)?;

        let mut excluded_names = exclusion_names(self.exclude.as_deref());
        if self.use_gitignore {
            match load_gitignore_names(&root_path) {
                Ok(names) => {
                    info!(count = names.len(), "merging .gitignore names into exclusions");
                    excluded_names.extend(names);
                }
                Err(e) => warn!("{e}"),
            }
        }

        let output = match self.output {
            Some(path) => OutputOptions::to_file(path::absolute(&path).unwrap_or(path)),
            None => OutputOptions::default(),
        };

        Ok(Config {
            root_path,
            traversal: TraversalConfig {
                max_depth,
                excluded_names,
                show_icons: self.icons,
                show_metadata: self.metadata,
                show_size_only: self.size_only,
                size_unit,
                sort_by_name: self.sort,
                follow_symlinks: !self.no_follow_symlinks,
                thread_count: self.threads,
            },
            output,
        })
    }
}

/// Parses `--level`; absent means unbounded.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for negative or non-numeric input.
fn parse_level(raw: Option<&str>) -> ConfigResult<Option<usize>> {
    raw.map(|value| {
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue {
                option: "--level".to_string(),
                value: value.to_string(),
                reason: "Level must be a non-negative integer.".to_string(),
            })
    })
    .transpose()
}

/// Parses `--size-unit`, case-insensitively.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for anything but B, KB, MB, GB.
fn parse_size_unit(raw: &str) -> ConfigResult<SizeUnit> {
    SizeUnit::from_str_loose(raw).ok_or_else(|| ConfigError::InvalidValue {
        option: "--size-unit".to_string(),
        value: raw.to_string(),
        reason: format!("Choose from {}.", SizeUnit::valid_units().join(", ")),
    })
}

/// Builds the exclusion set from `--exclude`, or the defaults when absent.
fn exclusion_names(raw: Option<&str>) -> HashSet<String> {
    match raw {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect(),
        None => DEFAULT_EXCLUDES.iter().map(|name| (*name).to_string()).collect(),
    }
}
