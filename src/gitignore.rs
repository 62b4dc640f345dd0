//! `.gitignore` support: derives literal exclusion names from a root's
//! `.gitignore` file.
//!
//! Patterns are not interpreted as globs. Each usable line becomes one base
//! name in the exclusion set, so `target/` excludes entries named `target`
//! and `*.log` only excludes an entry literally named `*.log`.

#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::Path;

use crate::error::MatchError;

/// File name looked up in the root directory.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Extracts exclusion names from `.gitignore` content.
///
/// Blank lines and lines starting with `#` are skipped; one trailing `/` is
/// removed. Both `\n` and `\r\n` line endings are accepted.
///
/// # Examples
///
/// ```
/// use dirtree::gitignore::parse_gitignore_names;
///
/// let names = parse_gitignore_names("# build output\ntarget/\n\n.env\r\n");
/// assert_eq!(names, vec!["target", ".env"]);
/// ```
#[must_use]
pub fn parse_gitignore_names(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.strip_suffix('/').unwrap_or(line).to_string())
        .collect()
}

/// Reads `<root>/.gitignore` and returns its exclusion names.
///
/// A missing file is not an error and yields an empty list.
///
/// # Errors
///
/// Returns `MatchError::GitignoreReadFailed` if the file exists but cannot be
/// read (permissions, invalid UTF-8, a directory named `.gitignore`).
pub fn load_gitignore_names(root: &Path) -> Result<Vec<String>, MatchError> {
    let path = root.join(GITIGNORE_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(parse_gitignore_names(&content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(MatchError::GitignoreReadFailed { path, source }),
    }
}
