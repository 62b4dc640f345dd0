//! Error handling module: defines unified error types for dirtree.
//!
//! This module provides a hierarchical error type system covering:
//!
//! - **CLI parsing errors**: malformed arguments reported by `clap`
//! - **Configuration errors**: re-exported from `config` module for API consistency
//! - **Scan errors**: root validation, plus the per-entry list/stat failures
//!   that the walker renders inline
//! - **Match errors**: `.gitignore` loading
//! - **Output errors**: file writing, stdout failures
//!
//! All error types implement `std::error::Error` with proper error chain support.

#![forbid(unsafe_code)]

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::config::ConfigError;

/// Top-level error type for dirtree.
///
/// Aggregates the errors that can abort a run. Per-entry traversal failures
/// never reach this type: the walker renders them as tree lines instead.
///
/// # Examples
///
/// ```
/// use dirtree::error::{DirtreeError, ScanError};
/// use std::path::PathBuf;
///
/// let scan_err = ScanError::PathNotFound {
///     path: PathBuf::from("/missing"),
/// };
/// let err: DirtreeError = scan_err.into();
/// assert!(matches!(err, DirtreeError::Scan(_)));
/// ```
#[derive(Debug, Error)]
pub enum DirtreeError {
    /// CLI parsing error.
    #[error(transparent)]
    Cli(#[from] CliError),

    /// Configuration validation error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Root path validation error.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Output error.
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Result type alias for dirtree operations.
pub type DirtreeResult<T> = Result<T, DirtreeError>;

/// CLI argument parsing errors.
///
/// # Examples
///
/// ```
/// use dirtree::error::CliError;
///
/// let err = CliError::ParseError {
///     message: "unexpected argument '--bogus' found".to_string(),
/// };
/// assert!(err.to_string().contains("--bogus"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CliError {
    /// The argument parser rejected the command line.
    #[error("{message}")]
    ParseError {
        /// Parser message, without the leading `error: ` tag.
        message: String,
    },
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.to_string();
        let message = rendered
            .trim()
            .strip_prefix("error: ")
            .unwrap_or(rendered.trim())
            .to_string();
        Self::ParseError { message }
    }
}

/// Directory scanning errors.
///
/// The first three variants describe an unusable root and abort the run. The
/// last two are produced by [`crate::scan::FileSystem`] implementations for a
/// single entry; the walker turns them into inline error lines.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dirtree::error::ScanError;
///
/// let err = ScanError::NotADirectory {
///     path: PathBuf::from("/etc/hosts"),
/// };
/// assert_eq!(err.to_string(), "/etc/hosts is not a directory.");
/// ```
#[derive(Debug, Error)]
pub enum ScanError {
    /// The specified root does not exist.
    #[error("Directory {} not found.", .path.display())]
    PathNotFound {
        /// The non-existent path.
        path: PathBuf,
    },

    /// The specified root is not a directory.
    #[error("{} is not a directory.", .path.display())]
    NotADirectory {
        /// The non-directory path.
        path: PathBuf,
    },

    /// Failed to canonicalize the root.
    #[error("Failed to resolve path {}: {source}", .path.display())]
    CanonicalizeFailed {
        /// The original path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Failed to list a directory's children.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirFailed {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Failed to retrieve an entry's metadata.
    #[error("Failed to retrieve metadata {}: {source}", .path.display())]
    MetadataFailed {
        /// The entry path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Returns the OS-level message behind this error.
    ///
    /// For the IO-backed variants this is the source error's text alone, which
    /// is what the walker embeds in its inline error lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    /// use std::path::PathBuf;
    /// use dirtree::error::ScanError;
    ///
    /// let err = ScanError::ReadDirFailed {
    ///     path: PathBuf::from("/locked"),
    ///     source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
    /// };
    /// assert_eq!(err.detail(), "access denied");
    /// ```
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::CanonicalizeFailed { source, .. }
            | Self::ReadDirFailed { source, .. }
            | Self::MetadataFailed { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}

/// `.gitignore` loading errors.
///
/// These never abort a run; the CLI layer logs them as warnings.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The `.gitignore` file exists but could not be read.
    #[error("Could not read or parse .gitignore file at {}: {source}", .path.display())]
    GitignoreReadFailed {
        /// The `.gitignore` path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Output errors.
///
/// # Examples
///
/// ```
/// use std::io;
/// use std::path::PathBuf;
/// use dirtree::error::OutputError;
///
/// let err = OutputError::WriteFailed {
///     path: PathBuf::from("out.txt"),
///     source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
/// };
/// assert!(err.to_string().contains("out.txt"));
/// ```
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to write the output file.
    #[error("Error writing to file {}: {source}", .path.display())]
    WriteFailed {
        /// Target file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Failed to write to stdout.
    #[error("Failed to write to stdout: {source}")]
    StdoutFailed {
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl From<io::Error> for OutputError {
    fn from(err: io::Error) -> Self {
        Self::StdoutFailed { source: err }
    }
}
