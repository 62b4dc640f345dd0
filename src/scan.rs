//! Filesystem access for the walker.
//!
//! This module provides:
//!
//! - **Entry model**: `EntryKind` and `EntryMetadata` describe one stat result
//! - **`FileSystem` trait**: the capabilities the walker needs (list a
//!   directory, stat a path, resolve a link), so tests can inject failures
//! - **`StdFileSystem`**: the `std::fs` implementation used by the binary
//! - **Root resolution**: `resolve_root` validates and canonicalizes the root

#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::ScanError;

// ============================================================================
// Types
// ============================================================================

/// Filesystem entry type.
///
/// # Examples
///
/// ```
/// use dirtree::scan::EntryKind;
///
/// assert!(EntryKind::Directory.is_dir());
/// assert!(!EntryKind::File.is_dir());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Directory.
    Directory,
    /// Anything else (regular file, device, socket...).
    File,
}

impl EntryKind {
    /// Determines the entry kind from filesystem metadata.
    #[must_use]
    pub fn from_metadata(meta: &Metadata) -> Self {
        if meta.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }

    /// Whether this is a directory.
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// Result of statting a single entry.
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
/// use dirtree::scan::{EntryKind, EntryMetadata};
///
/// let meta = EntryMetadata::file(42, SystemTime::UNIX_EPOCH);
/// assert_eq!(meta.kind, EntryKind::File);
/// assert_eq!(meta.size, 42);
/// assert!(!meta.is_symlink);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Entry type, after following symbolic links.
    pub kind: EntryKind,
    /// Size in bytes as reported by the filesystem.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Whether the entry itself is a symbolic link.
    pub is_symlink: bool,
}

impl EntryMetadata {
    /// Metadata for a plain file.
    #[must_use]
    pub const fn file(size: u64, modified: SystemTime) -> Self {
        Self {
            kind: EntryKind::File,
            size,
            modified,
            is_symlink: false,
        }
    }

    /// Metadata for a plain directory.
    #[must_use]
    pub const fn directory(size: u64, modified: SystemTime) -> Self {
        Self {
            kind: EntryKind::Directory,
            size,
            modified,
            is_symlink: false,
        }
    }
}

// ============================================================================
// FileSystem trait
// ============================================================================

/// The filesystem capabilities the walker depends on.
///
/// Implementations must be `Sync`: parallel rendering calls them from several
/// worker threads at once.
pub trait FileSystem: Sync {
    /// Lists the base names of a directory's direct children, in the order
    /// the underlying source yields them.
    ///
    /// Names are returned as the platform gives them, so names that are not
    /// valid UTF-8 still join back into a path that exists.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::ReadDirFailed` when the directory cannot be listed.
    fn read_dir_names(&self, path: &Path) -> Result<Vec<OsString>, ScanError>;

    /// Retrieves type, size and modification time of an entry.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::MetadataFailed` when the entry cannot be statted.
    fn metadata(&self, path: &Path) -> Result<EntryMetadata, ScanError>;

    /// Resolves a directory reached through a symbolic link to its real
    /// location, used to detect link cycles.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::CanonicalizeFailed` when the link cannot be resolved.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, ScanError>;
}

/// `FileSystem` backed by `std::fs`.
///
/// `metadata` follows symbolic links, like `stat(2)`; `is_symlink` is taken
/// from the link itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_dir_names(&self, path: &Path) -> Result<Vec<OsString>, ScanError> {
        let read_failed = |source: io::Error| ScanError::ReadDirFailed {
            path: path.to_path_buf(),
            source,
        };

        fs::read_dir(path)
            .map_err(read_failed)?
            .map(|entry| {
                entry
                    .map(|e| e.file_name())
                    .map_err(read_failed)
            })
            .collect()
    }

    fn metadata(&self, path: &Path) -> Result<EntryMetadata, ScanError> {
        let stat_failed = |source: io::Error| ScanError::MetadataFailed {
            path: path.to_path_buf(),
            source,
        };

        let meta = fs::metadata(path).map_err(stat_failed)?;
        let modified = meta.modified().map_err(stat_failed)?;
        let is_symlink = fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);

        Ok(EntryMetadata {
            kind: EntryKind::from_metadata(&meta),
            size: meta.len(),
            modified,
            is_symlink,
        })
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, ScanError> {
        dunce::canonicalize(path).map_err(|source| ScanError::CanonicalizeFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ============================================================================
// Root resolution
// ============================================================================

/// Validates that `path` is an existing directory and canonicalizes it.
///
/// Uses `dunce` so Windows paths do not gain a `\\?\` prefix.
///
/// # Errors
///
/// - `ScanError::PathNotFound` if nothing exists at `path`
/// - `ScanError::NotADirectory` if it is not a directory
/// - `ScanError::CanonicalizeFailed` if it cannot be resolved
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dirtree::error::ScanError;
/// use dirtree::scan::resolve_root;
///
/// let err = resolve_root(Path::new("/definitely/not/here")).unwrap_err();
/// assert!(matches!(err, ScanError::PathNotFound { .. }));
/// ```
pub fn resolve_root(path: &Path) -> Result<PathBuf, ScanError> {
    let meta = fs::metadata(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ScanError::PathNotFound {
            path: path.to_path_buf(),
        },
        _ => ScanError::CanonicalizeFailed {
            path: path.to_path_buf(),
            source,
        },
    })?;

    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    dunce::canonicalize(path).map_err(|source| ScanError::CanonicalizeFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Display name of the root: its base name, or the whole path when it has
/// none (e.g. `/`).
#[must_use]
pub fn root_display_name(root: &Path) -> String {
    root.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().expect("create temp dir");
        let root = dir.path();

        fs::create_dir(root.join("src")).unwrap();
        File::create(root.join("Cargo.toml"))
            .unwrap()
            .write_all(b"[package]")
            .unwrap();
        File::create(root.join("src/main.rs"))
            .unwrap()
            .write_all(b"fn main() {}")
            .unwrap();

        dir
    }

    #[test]
    fn read_dir_names_lists_direct_children_only() {
        let dir = setup_test_dir();
        let mut names = StdFileSystem.read_dir_names(dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec![OsString::from("Cargo.toml"), OsString::from("src")]);
    }

    #[cfg(unix)]
    #[test]
    fn read_dir_names_keeps_non_utf8_names_statable() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = setup_test_dir();
        let raw = OsStr::from_bytes(b"bad\xffname.txt");
        if File::create(dir.path().join(raw)).is_err() {
            // Some filesystems reject non-UTF-8 names outright.
            return;
        }

        let names = StdFileSystem.read_dir_names(dir.path()).unwrap();
        assert!(names.iter().any(|n| n.as_os_str() == raw));
        for name in names {
            assert!(StdFileSystem.metadata(&dir.path().join(name)).is_ok());
        }
    }

    #[test]
    fn read_dir_names_fails_for_missing_directory() {
        let dir = setup_test_dir();
        let err = StdFileSystem
            .read_dir_names(&dir.path().join("gone"))
            .unwrap_err();
        assert!(matches!(err, ScanError::ReadDirFailed { .. }));
    }

    #[test]
    fn read_dir_names_fails_for_file() {
        let dir = setup_test_dir();
        let err = StdFileSystem
            .read_dir_names(&dir.path().join("Cargo.toml"))
            .unwrap_err();
        assert!(matches!(err, ScanError::ReadDirFailed { .. }));
    }

    #[test]
    fn metadata_reports_kind_and_size() {
        let dir = setup_test_dir();

        let file = StdFileSystem.metadata(&dir.path().join("Cargo.toml")).unwrap();
        assert_eq!(file.kind, EntryKind::File);
        assert_eq!(file.size, 9);
        assert!(!file.is_symlink);

        let sub = StdFileSystem.metadata(&dir.path().join("src")).unwrap();
        assert_eq!(sub.kind, EntryKind::Directory);
    }

    #[test]
    fn metadata_fails_for_missing_entry() {
        let dir = setup_test_dir();
        let err = StdFileSystem
            .metadata(&dir.path().join("ghost.txt"))
            .unwrap_err();
        assert!(matches!(err, ScanError::MetadataFailed { .. }));
        assert!(!err.detail().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn metadata_marks_symlinked_directories() {
        let dir = setup_test_dir();
        std::os::unix::fs::symlink(dir.path().join("src"), dir.path().join("link")).unwrap();

        let meta = StdFileSystem.metadata(&dir.path().join("link")).unwrap();
        assert_eq!(meta.kind, EntryKind::Directory);
        assert!(meta.is_symlink);
    }

    #[cfg(unix)]
    #[test]
    fn canonicalize_resolves_symlink_target() {
        let dir = setup_test_dir();
        std::os::unix::fs::symlink(dir.path().join("src"), dir.path().join("link")).unwrap();

        let resolved = StdFileSystem.canonicalize(&dir.path().join("link")).unwrap();
        assert_eq!(resolved, dunce::canonicalize(dir.path().join("src")).unwrap());
    }

    #[test]
    fn resolve_root_returns_absolute_path() {
        let dir = setup_test_dir();
        let resolved = resolve_root(dir.path()).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.is_dir());
    }

    #[test]
    fn resolve_root_rejects_file() {
        let dir = setup_test_dir();
        let err = resolve_root(&dir.path().join("Cargo.toml")).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn resolve_root_rejects_missing_path() {
        let dir = setup_test_dir();
        let err = resolve_root(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ScanError::PathNotFound { .. }));
    }

    #[test]
    fn root_display_name_uses_base_name() {
        assert_eq!(root_display_name(Path::new("/home/user/project")), "project");
        assert_eq!(root_display_name(Path::new("/")), "/");
    }
}
