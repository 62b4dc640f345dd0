//! Rendering module: walks a directory and renders it as a text tree.
//!
//! The walker visits entries depth-first in listing order and produces one
//! line per entry:
//!
//! - **Connectors**: `├── ` for a sibling with followers, `└── ` for the last
//! - **Continuation**: `│   ` under open ancestors, `    ` once closed
//! - **Decorations**: optional icon prefix and size/date suffix
//! - **Inline errors**: listing and stat failures become tree lines, so a
//!   broken subtree never aborts the render
//! - **Symlinks**: linked directories are followed; a link back to a
//!   directory already open on the current branch is shown as a cycle line
//! - **Parallel mode**: with more than one thread, sibling subtrees render on a
//!   `rayon` pool; each subtree returns its own lines and the parent joins
//!   them in listing order, so output matches the sequential walk exactly

#![forbid(unsafe_code)]

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::config::TraversalConfig;
use crate::format::{format_datetime, format_size, icon_for};
use crate::scan::{EntryMetadata, FileSystem, root_display_name};

// ============================================================================
// Tree Characters
// ============================================================================

/// Box-drawing pieces used to build line prefixes.
///
/// # Examples
///
/// ```
/// use dirtree::render::TREE_CHARS;
///
/// assert_eq!(TREE_CHARS.branch, "├── ");
/// assert_eq!(TREE_CHARS.last_branch, "└── ");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TreeChars {
    /// Connector for an entry that has later siblings.
    pub branch: &'static str,
    /// Connector for the last entry of a listing.
    pub last_branch: &'static str,
    /// Indent segment under an open ancestor.
    pub vertical: &'static str,
    /// Indent segment under a closed ancestor.
    pub space: &'static str,
}

/// The Unicode character set.
pub const TREE_CHARS: TreeChars = TreeChars {
    branch: "├── ",
    last_branch: "└── ",
    vertical: "│   ",
    space: "    ",
};

// ============================================================================
// Render Result
// ============================================================================

/// Result of rendering a tree.
///
/// # Examples
///
/// ```
/// use dirtree::render::RenderResult;
///
/// let result = RenderResult {
///     content: "root\n└── a.txt\n".to_string(),
///     directory_count: 0,
///     file_count: 1,
///     error_count: 0,
/// };
/// assert_eq!(result.lines().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// Header line plus tree lines, each terminated by `\n`.
    pub content: String,
    /// Directories rendered.
    pub directory_count: usize,
    /// Files rendered.
    pub file_count: usize,
    /// Inline error lines emitted.
    pub error_count: usize,
}

impl RenderResult {
    /// Iterates over the rendered lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }
}

/// Lines produced by one subtree, with running counts.
#[derive(Debug, Default)]
struct RenderedLines {
    lines: Vec<String>,
    directories: usize,
    files: usize,
    errors: usize,
}

impl RenderedLines {
    fn entry(line: String, is_dir: bool) -> Self {
        Self {
            lines: vec![line],
            directories: usize::from(is_dir),
            files: usize::from(!is_dir),
            errors: 0,
        }
    }

    fn error(line: String) -> Self {
        Self {
            lines: vec![line],
            errors: 1,
            ..Self::default()
        }
    }

    fn append(&mut self, other: Self) {
        self.lines.extend(other.lines);
        self.directories += other.directories;
        self.files += other.files;
        self.errors += other.errors;
    }
}

// ============================================================================
// Render Context
// ============================================================================

/// Per-directory state threaded through the recursion.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderContext {
    /// Accumulated indent for lines in this directory.
    indent: String,
    /// Whether the directory being listed was itself a last sibling.
    is_parent_last: bool,
    /// Depth of this directory's children (root's children are 0).
    depth: usize,
    /// Real locations of the directories open on this branch, root first.
    open_dirs: Vec<PathBuf>,
}

impl RenderContext {
    fn root(real_root: PathBuf) -> Self {
        Self {
            indent: String::new(),
            is_parent_last: true,
            depth: 0,
            open_dirs: vec![real_root],
        }
    }

    /// Context for the children of an entry rendered in this context.
    ///
    /// The continuation bar is dropped only when both this directory and the
    /// entry are last siblings.
    fn child(&self, is_last: bool, real_dir: PathBuf) -> Self {
        let segment = if self.is_parent_last && is_last {
            TREE_CHARS.space
        } else {
            TREE_CHARS.vertical
        };
        let mut open_dirs = self.open_dirs.clone();
        open_dirs.push(real_dir);
        Self {
            indent: format!("{}{}", self.indent, segment),
            is_parent_last: is_last,
            depth: self.depth + 1,
            open_dirs,
        }
    }

    /// Whether `real_dir` is already open on this branch.
    fn is_open(&self, real_dir: &Path) -> bool {
        self.open_dirs.iter().any(|dir| dir == real_dir)
    }

    /// Real location of the directory whose children this context lists.
    fn current_dir(&self) -> Option<&PathBuf> {
        self.open_dirs.last()
    }
}

// ============================================================================
// Walker
// ============================================================================

struct Walker<'a, F: FileSystem + ?Sized> {
    config: &'a TraversalConfig,
    fs: &'a F,
    parallel: bool,
}

impl<F: FileSystem + ?Sized> Walker<'_, F> {
    /// Renders the children of `dir`.
    fn render_dir(&self, dir: &Path, ctx: &RenderContext) -> RenderedLines {
        if !self.config.allows_depth(ctx.depth) {
            return RenderedLines::default();
        }

        let names = match self.fs.read_dir_names(dir) {
            Ok(names) => names,
            Err(err) => {
                debug!(path = %dir.display(), error = %err, "cannot list directory");
                return RenderedLines::error(format!(
                    "{}{}[Error reading directory: {} - {}]",
                    ctx.indent,
                    TREE_CHARS.last_branch,
                    root_display_name(dir),
                    err.detail()
                ));
            }
        };

        let mut names: Vec<_> = names
            .into_iter()
            .filter(|name| !self.config.is_excluded(&name.to_string_lossy()))
            .collect();
        if self.config.sort_by_name {
            names.sort();
        }

        let count = names.len();
        let render_child = |(index, name): (usize, &OsString)| {
            self.render_entry(dir, name, index + 1 == count, ctx)
        };

        let children: Vec<RenderedLines> = if self.parallel {
            names.par_iter().enumerate().map(render_child).collect()
        } else {
            names.iter().enumerate().map(render_child).collect()
        };

        children
            .into_iter()
            .fold(RenderedLines::default(), |mut acc, child| {
                acc.append(child);
                acc
            })
    }

    /// Renders one entry and, for directories, its subtree.
    fn render_entry(
        &self,
        parent: &Path,
        os_name: &OsStr,
        is_last: bool,
        ctx: &RenderContext,
    ) -> RenderedLines {
        let connector = if is_last {
            TREE_CHARS.last_branch
        } else {
            TREE_CHARS.branch
        };
        let prefix = format!("{}{}", ctx.indent, connector);
        let path = parent.join(os_name);
        let name = os_name.to_string_lossy();

        let meta = match self.fs.metadata(&path) {
            Ok(meta) => meta,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cannot stat entry");
                return RenderedLines::error(format!(
                    "{prefix}[Error stating: {name} - {}]",
                    err.detail()
                ));
            }
        };

        let is_dir = meta.kind.is_dir();
        let icon = icon_for(&name, is_dir, self.config.show_icons);
        let suffix = metadata_suffix(&meta, self.config);
        let mut rendered = RenderedLines::entry(format!("{prefix}{icon}{name}{suffix}"), is_dir);

        if is_dir && self.config.allows_depth(ctx.depth + 1) {
            if meta.is_symlink && !self.config.follow_symlinks {
                trace!(path = %path.display(), "not following symlinked directory");
            } else {
                let real_dir = self.real_location(&path, os_name, &meta, ctx);
                let is_cycle = meta.is_symlink && ctx.is_open(&real_dir);
                let child_ctx = ctx.child(is_last, real_dir);
                if is_cycle {
                    debug!(path = %path.display(), "symlink cycle");
                    rendered.append(RenderedLines::error(format!(
                        "{}{}[Symlink cycle: {name}]",
                        child_ctx.indent, TREE_CHARS.last_branch
                    )));
                } else {
                    rendered.append(self.render_dir(&path, &child_ctx));
                }
            }
        }

        rendered
    }

    /// Where a directory entry really lives.
    ///
    /// Plain directories sit under the current directory's real location;
    /// linked ones are resolved through the filesystem.
    fn real_location(
        &self,
        path: &Path,
        name: &OsStr,
        meta: &EntryMetadata,
        ctx: &RenderContext,
    ) -> PathBuf {
        if meta.is_symlink {
            return self.fs.canonicalize(path).unwrap_or_else(|err| {
                debug!(path = %path.display(), error = %err, "cannot resolve link");
                path.to_path_buf()
            });
        }
        ctx.current_dir()
            .map_or_else(|| path.to_path_buf(), |dir| dir.join(name))
    }
}

/// Builds the ` (Size: ...)` / ` (Size: ..., Modified: ...)` suffix.
///
/// Size-only wins over full metadata; neither flag yields an empty suffix.
fn metadata_suffix(meta: &EntryMetadata, config: &TraversalConfig) -> String {
    if !config.wants_metadata() {
        return String::new();
    }
    if config.show_size_only {
        format!(" (Size: {})", format_size(meta.size, config.size_unit))
    } else {
        format!(
            " (Size: {}, Modified: {})",
            format_size(meta.size, config.size_unit),
            format_datetime(&meta.modified)
        )
    }
}

// ============================================================================
// Main Render Function
// ============================================================================

/// Renders the tree rooted at `root`.
///
/// The first line is the root's base name. Filesystem failures below the root
/// are rendered inline and never returned as errors; validating the root is
/// the caller's job (see [`crate::scan::resolve_root`]).
///
/// # Examples
///
/// ```
/// use std::fs;
/// use dirtree::config::TraversalConfig;
/// use dirtree::render::render;
/// use dirtree::scan::StdFileSystem;
///
/// let dir = tempfile::TempDir::new().unwrap();
/// fs::write(dir.path().join("a.txt"), "hi").unwrap();
///
/// let result = render(dir.path(), &TraversalConfig::default(), &StdFileSystem);
/// assert!(result.content.ends_with("└── a.txt\n"));
/// assert_eq!(result.file_count, 1);
/// ```
#[must_use]
pub fn render<F: FileSystem + ?Sized>(
    root: &Path,
    config: &TraversalConfig,
    fs: &F,
) -> RenderResult {
    let start = Instant::now();
    let real_root = fs.canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let ctx = RenderContext::root(real_root);
    let threads = config.thread_count.get();

    let sequential = Walker {
        config,
        fs,
        parallel: false,
    };

    let body = if threads > 1 {
        match ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => {
                let walker = Walker {
                    config,
                    fs,
                    parallel: true,
                };
                pool.install(|| walker.render_dir(root, &ctx))
            }
            Err(e) => {
                warn!(threads, error = %e, "thread pool unavailable, rendering sequentially");
                sequential.render_dir(root, &ctx)
            }
        }
    } else {
        sequential.render_dir(root, &ctx)
    };

    let mut content = root_display_name(root);
    content.push('\n');
    for line in &body.lines {
        content.push_str(line);
        content.push('\n');
    }

    debug!(
        root = %root.display(),
        directories = body.directories,
        files = body.files,
        errors = body.errors,
        elapsed = ?start.elapsed(),
        "render finished"
    );

    RenderResult {
        content,
        directory_count: body.directories,
        file_count: body.files,
        error_count: body.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizeUnit;
    use crate::scan::{EntryKind, StdFileSystem};
    use chrono::{Local, TimeZone};
    use std::fs;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn fixed_time() -> SystemTime {
        SystemTime::from(
            Local
                .with_ymd_and_hms(2024, 3, 21, 1, 2, 3)
                .earliest()
                .expect("valid local time"),
        )
    }

    // ------------------------------------------------------------------------
    // RenderContext
    // ------------------------------------------------------------------------

    fn root_ctx() -> RenderContext {
        RenderContext::root(PathBuf::from("/r"))
    }

    #[test]
    fn child_of_last_entry_under_last_parent_gets_spaces() {
        let ctx = root_ctx().child(true, PathBuf::from("/r/a"));
        assert_eq!(ctx.indent, "    ");
        assert!(ctx.is_parent_last);
        assert_eq!(ctx.depth, 1);
    }

    #[test]
    fn child_of_non_last_entry_gets_bar() {
        let ctx = root_ctx().child(false, PathBuf::from("/r/a"));
        assert_eq!(ctx.indent, "│   ");
        assert!(!ctx.is_parent_last);
    }

    #[test]
    fn last_entry_under_open_parent_keeps_bar() {
        let ctx = root_ctx()
            .child(false, PathBuf::from("/r/a"))
            .child(true, PathBuf::from("/r/a/b"));
        assert_eq!(ctx.indent, "│   │   ");
        assert!(ctx.is_parent_last);
        assert_eq!(ctx.depth, 2);
    }

    #[test]
    fn child_context_tracks_open_directories() {
        let ctx = root_ctx().child(true, PathBuf::from("/r/a"));
        assert!(ctx.is_open(Path::new("/r")));
        assert!(ctx.is_open(Path::new("/r/a")));
        assert!(!ctx.is_open(Path::new("/r/b")));
        assert_eq!(ctx.current_dir(), Some(&PathBuf::from("/r/a")));
    }

    // ------------------------------------------------------------------------
    // Metadata suffix
    // ------------------------------------------------------------------------

    #[test]
    fn metadata_suffix_is_empty_without_flags() {
        let meta = EntryMetadata::file(1500, fixed_time());
        assert_eq!(metadata_suffix(&meta, &TraversalConfig::default()), "");
    }

    #[test]
    fn metadata_suffix_size_only() {
        let meta = EntryMetadata::file(1500, fixed_time());
        let config = TraversalConfig {
            show_size_only: true,
            size_unit: SizeUnit::Kb,
            ..TraversalConfig::default()
        };
        assert_eq!(metadata_suffix(&meta, &config), " (Size: 1.46 KB)");
    }

    #[test]
    fn metadata_suffix_full() {
        let meta = EntryMetadata::file(5, fixed_time());
        let config = TraversalConfig {
            show_metadata: true,
            ..TraversalConfig::default()
        };
        assert_eq!(
            metadata_suffix(&meta, &config),
            " (Size: 5 B, Modified: 2024-03-21 01:02:03)"
        );
    }

    #[test]
    fn metadata_suffix_size_only_wins_over_metadata() {
        let meta = EntryMetadata {
            kind: EntryKind::Directory,
            ..EntryMetadata::file(2048, fixed_time())
        };
        let config = TraversalConfig {
            show_metadata: true,
            show_size_only: true,
            size_unit: SizeUnit::Kb,
            ..TraversalConfig::default()
        };
        assert_eq!(metadata_suffix(&meta, &config), " (Size: 2 KB)");
    }

    // ------------------------------------------------------------------------
    // render on a real directory
    // ------------------------------------------------------------------------

    fn setup_nested_dir() -> TempDir {
        let dir = TempDir::new().expect("create temp dir");
        let root = dir.path();
        fs::create_dir_all(root.join("src/bin")).unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn lib() {}").unwrap();
        fs::write(root.join("src/bin/tool.rs"), "fn main() {}").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();
        dir
    }

    #[test]
    fn render_header_is_root_base_name() {
        let dir = setup_nested_dir();
        let result = render(dir.path(), &TraversalConfig::default(), &StdFileSystem);
        let expected = dir.path().file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(result.lines().next(), Some(expected.as_str()));
    }

    #[test]
    fn render_sorted_nested_tree() {
        let dir = setup_nested_dir();
        let config = TraversalConfig {
            sort_by_name: true,
            ..TraversalConfig::default()
        };
        let result = render(dir.path(), &config, &StdFileSystem);
        let body: Vec<&str> = result.lines().skip(1).collect();

        assert_eq!(
            body,
            vec![
                "├── README.md",
                "└── src",
                "    ├── bin",
                "    │   └── tool.rs",
                "    └── lib.rs",
            ]
        );
        assert_eq!(result.directory_count, 2);
        assert_eq!(result.file_count, 3);
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn render_depth_zero_is_header_only() {
        let dir = setup_nested_dir();
        let config = TraversalConfig {
            max_depth: Some(0),
            ..TraversalConfig::default()
        };
        let result = render(dir.path(), &config, &StdFileSystem);
        assert_eq!(result.lines().count(), 1);
    }

    #[test]
    fn render_parallel_matches_sequential() {
        let dir = setup_nested_dir();
        let sequential = TraversalConfig {
            sort_by_name: true,
            ..TraversalConfig::default()
        };
        let parallel = TraversalConfig {
            thread_count: std::num::NonZeroUsize::new(4).unwrap(),
            ..sequential.clone()
        };
        assert_eq!(
            render(dir.path(), &sequential, &StdFileSystem),
            render(dir.path(), &parallel, &StdFileSystem)
        );
    }

    #[cfg(unix)]
    #[test]
    fn render_stats_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        if fs::write(dir.path().join(OsStr::from_bytes(b"bad\xffname.txt")), "x").is_err() {
            return;
        }
        fs::write(dir.path().join("ok.txt"), "y").unwrap();

        let config = TraversalConfig {
            sort_by_name: true,
            ..TraversalConfig::default()
        };
        let result = render(dir.path(), &config, &StdFileSystem);
        assert_eq!(result.error_count, 0);
        assert_eq!(result.file_count, 2);
        assert!(result.content.contains("├── bad\u{FFFD}name.txt\n"));
        assert!(result.content.ends_with("└── ok.txt\n"));
    }

    #[cfg(unix)]
    #[test]
    fn render_stops_at_symlink_cycles() {
        let dir = setup_nested_dir();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("src/loop")).unwrap();

        let config = TraversalConfig {
            sort_by_name: true,
            ..TraversalConfig::default()
        };
        let result = render(dir.path(), &config, &StdFileSystem);
        let body: Vec<&str> = result.lines().skip(1).collect();

        assert_eq!(
            body,
            vec![
                "├── README.md",
                "└── src",
                "    ├── bin",
                "    │   └── tool.rs",
                "    ├── lib.rs",
                "    └── loop",
                "        └── [Symlink cycle: loop]",
            ]
        );
        assert_eq!(result.error_count, 1);
    }

    #[cfg(unix)]
    #[test]
    fn render_follows_symlinked_directories_by_default() {
        let dir = setup_nested_dir();
        std::os::unix::fs::symlink(dir.path().join("src/bin"), dir.path().join("alias")).unwrap();

        let config = TraversalConfig {
            sort_by_name: true,
            ..TraversalConfig::default()
        };
        let result = render(dir.path(), &config, &StdFileSystem);
        assert!(result.content.contains("├── alias\n│   └── tool.rs\n"));
        assert_eq!(result.content.matches("tool.rs").count(), 2);
        assert_eq!(result.error_count, 0);
    }

    #[cfg(unix)]
    #[test]
    fn render_lists_but_skips_symlinks_when_disabled() {
        let dir = setup_nested_dir();
        std::os::unix::fs::symlink(dir.path().join("src/bin"), dir.path().join("alias")).unwrap();

        let config = TraversalConfig {
            sort_by_name: true,
            follow_symlinks: false,
            ..TraversalConfig::default()
        };
        let result = render(dir.path(), &config, &StdFileSystem);
        assert!(result.content.contains("├── alias\n"));
        assert_eq!(result.content.matches("tool.rs").count(), 1);
    }
}
