//! Configuration module: the validated `Config` and its sub-records.
//!
//! This module is the single source of truth for user intent. The CLI layer
//! parses arguments, fills in defaults and validates values, then hands a
//! `Config` to the walker and the output layer. Neither of those re-parses
//! or defaults anything.

#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Configuration validation error.
///
/// Raised when a user-supplied value cannot be turned into a valid setting.
///
/// # Examples
///
/// ```
/// use dirtree::config::ConfigError;
///
/// let err = ConfigError::InvalidValue {
///     option: "--size-unit".to_string(),
///     value: "TB".to_string(),
///     reason: "Choose from B, KB, MB, GB.".to_string(),
/// };
/// assert!(err.to_string().contains("TB"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value is out of range or malformed.
    #[error("Invalid value '{value}' for {option}. {reason}")]
    InvalidValue {
        /// Option name.
        option: String,
        /// The provided value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ============================================================================
// Constants
// ============================================================================

/// Names excluded when the user gives no `--exclude` list.
pub const DEFAULT_EXCLUDES: &[&str] = &["node_modules", ".git"];

// ============================================================================
// Enums
// ============================================================================

/// Unit used to display entry sizes.
///
/// The unit is authoritative: sizes are converted to it directly and never
/// rescaled to a "better" unit.
///
/// # Examples
///
/// ```
/// use dirtree::config::SizeUnit;
///
/// assert_eq!(SizeUnit::from_str_loose("kb"), Some(SizeUnit::Kb));
/// assert_eq!(SizeUnit::from_str_loose("TB"), None);
/// assert_eq!(SizeUnit::Mb.exponent(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeUnit {
    /// Raw bytes (default).
    #[default]
    B,
    /// 1024 bytes.
    Kb,
    /// 1024² bytes.
    Mb,
    /// 1024³ bytes.
    Gb,
}

impl SizeUnit {
    /// Parses a unit name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" => Some(Self::B),
            "KB" => Some(Self::Kb),
            "MB" => Some(Self::Mb),
            "GB" => Some(Self::Gb),
            _ => None,
        }
    }

    /// Power of 1024 this unit represents.
    #[must_use]
    pub const fn exponent(self) -> i32 {
        match self {
            Self::B => 0,
            Self::Kb => 1,
            Self::Mb => 2,
            Self::Gb => 3,
        }
    }

    /// Display label used after the number.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::Kb => "KB",
            Self::Mb => "MB",
            Self::Gb => "GB",
        }
    }

    /// All accepted unit names.
    #[must_use]
    pub const fn valid_units() -> &'static [&'static str] {
        &["B", "KB", "MB", "GB"]
    }
}

/// Output file format, derived from the output path's extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dirtree::config::OutputFormat;
///
/// assert_eq!(OutputFormat::from_extension(Path::new("tree.MD")), OutputFormat::Markdown);
/// assert_eq!(OutputFormat::from_extension(Path::new("tree.txt")), OutputFormat::Txt);
/// assert_eq!(OutputFormat::from_extension(Path::new("tree")), OutputFormat::Txt);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The rendered block, verbatim.
    #[default]
    Txt,
    /// The rendered block inside a fenced code block.
    Markdown,
}

impl OutputFormat {
    /// Picks the output format from a file extension (case-insensitive).
    ///
    /// `.md` and `.markdown` select Markdown; anything else is plain text.
    #[must_use]
    pub fn from_extension(path: &Path) -> Self {
        let is_markdown = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown")
            });
        if is_markdown { Self::Markdown } else { Self::Txt }
    }
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// Traversal and rendering settings consumed by the walker.
///
/// # Examples
///
/// ```
/// use dirtree::config::{SizeUnit, TraversalConfig};
///
/// let cfg = TraversalConfig::default();
/// assert_eq!(cfg.max_depth, None);
/// assert!(cfg.excluded_names.is_empty());
/// assert_eq!(cfg.size_unit, SizeUnit::B);
/// assert_eq!(cfg.thread_count.get(), 1);
/// assert!(cfg.follow_symlinks);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalConfig {
    /// Maximum depth; `None` is unbounded, `Some(0)` renders the header only.
    pub max_depth: Option<usize>,
    /// Base names skipped along with their subtrees.
    pub excluded_names: HashSet<String>,
    /// Prefix each entry with a file-type icon.
    pub show_icons: bool,
    /// Append size and modification time.
    pub show_metadata: bool,
    /// Append size only; takes precedence over `show_metadata`.
    pub show_size_only: bool,
    /// Unit for displayed sizes.
    pub size_unit: SizeUnit,
    /// Sort each listing by name instead of keeping filesystem order.
    pub sort_by_name: bool,
    /// Descend into directories reached through symbolic links. Link cycles
    /// are detected and rendered inline.
    pub follow_symlinks: bool,
    /// Worker threads; 1 renders sequentially.
    pub thread_count: NonZeroUsize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            excluded_names: HashSet::new(),
            show_icons: false,
            show_metadata: false,
            show_size_only: false,
            size_unit: SizeUnit::B,
            sort_by_name: false,
            follow_symlinks: true,
            thread_count: NonZeroUsize::MIN,
        }
    }
}

impl TraversalConfig {
    /// Whether any metadata suffix is rendered.
    #[must_use]
    pub const fn wants_metadata(&self) -> bool {
        self.show_metadata || self.show_size_only
    }

    /// Whether a directory at `depth` may list its children.
    #[must_use]
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }

    /// Whether `name` is in the exclusion set.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.contains(name)
    }
}

/// Where and how the rendered block is written.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dirtree::config::{OutputFormat, OutputOptions};
///
/// let opts = OutputOptions::to_file(PathBuf::from("tree.md"));
/// assert_eq!(opts.format, OutputFormat::Markdown);
/// assert!(OutputOptions::default().output_path.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputOptions {
    /// Output file; `None` prints to stdout.
    pub output_path: Option<PathBuf>,
    /// Output format; always `Txt` for stdout.
    pub format: OutputFormat,
}

impl OutputOptions {
    /// Targets a file, deriving the format from its extension.
    #[must_use]
    pub fn to_file(path: PathBuf) -> Self {
        let format = OutputFormat::from_extension(&path);
        Self {
            output_path: Some(path),
            format,
        }
    }
}

// ============================================================================
// Main configuration
// ============================================================================

/// Full configuration for a single run, built by [`crate::cli::Args::into_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Resolved root directory.
    pub root_path: PathBuf,
    /// Walker settings.
    pub traversal: TraversalConfig,
    /// Output destination.
    pub output: OutputOptions,
}
