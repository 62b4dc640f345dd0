//! Output module: delivers the rendered block to stdout or a file.
//!
//! - Without an output path the block is printed to stdout as-is
//! - With an output path the block is written to the file (fenced for
//!   Markdown targets) and a confirmation line is printed

#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, Write};

use tracing::info;

use crate::config::{OutputFormat, OutputOptions};
use crate::error::OutputError;

/// Fence used for Markdown output.
const MARKDOWN_FENCE: &str = "```";

/// Wraps the rendered block for the given format.
///
/// # Examples
///
/// ```
/// use dirtree::config::OutputFormat;
/// use dirtree::output::format_content;
///
/// assert_eq!(format_content("root\n", OutputFormat::Txt), "root\n");
/// assert_eq!(format_content("root\n", OutputFormat::Markdown), "```\nroot\n```\n");
/// ```
#[must_use]
pub fn format_content(content: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Txt => content.to_string(),
        OutputFormat::Markdown => {
            let mut fenced = String::with_capacity(content.len() + 8);
            fenced.push_str(MARKDOWN_FENCE);
            fenced.push('\n');
            fenced.push_str(content);
            if !content.ends_with('\n') {
                fenced.push('\n');
            }
            fenced.push_str(MARKDOWN_FENCE);
            fenced.push('\n');
            fenced
        }
    }
}

/// Writes the rendered block to `writer`, or to the configured file.
///
/// When a file is written, `Tree structure saved to <path>` goes to `writer`.
///
/// # Errors
///
/// - `OutputError::WriteFailed` if the output file cannot be written
/// - `OutputError::StdoutFailed` if `writer` fails
pub fn write_output<W: Write>(
    content: &str,
    options: &OutputOptions,
    writer: &mut W,
) -> Result<(), OutputError> {
    match &options.output_path {
        Some(path) => {
            let body = format_content(content, options.format);
            fs::write(path, body).map_err(|source| OutputError::WriteFailed {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), format = ?options.format, "tree written");
            writeln!(writer, "Tree structure saved to {}", path.display())?;
        }
        None => {
            writer.write_all(content.as_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Writes the rendered block to stdout, or to the configured file.
///
/// # Errors
///
/// See [`write_output`].
pub fn execute_output(content: &str, options: &OutputOptions) -> Result<(), OutputError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_output(content, options, &mut handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const TREE: &str = "root\n├── a.txt\n└── sub\n    └── b.txt\n";

    #[test]
    fn markdown_adds_missing_trailing_newline_before_fence() {
        assert_eq!(
            format_content("root", OutputFormat::Markdown),
            "```\nroot\n```\n"
        );
    }

    #[test]
    fn stdout_receives_content_verbatim() {
        let mut buf = Vec::new();
        write_output(TREE, &OutputOptions::default(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), TREE);
    }

    #[test]
    fn file_output_writes_txt_and_confirms() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.txt");
        let mut buf = Vec::new();

        write_output(TREE, &OutputOptions::to_file(path.clone()), &mut buf).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), TREE);
        let console = String::from_utf8(buf).unwrap();
        assert!(console.starts_with("Tree structure saved to "));
        assert!(console.contains("tree.txt"));
    }

    #[test]
    fn file_output_fences_markdown() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.md");

        write_output(TREE, &OutputOptions::to_file(path.clone()), &mut Vec::new()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("```\nroot\n"));
        assert!(written.ends_with("b.txt\n```\n"));
    }

    #[test]
    fn file_output_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.txt");
        fs::write(&path, "stale content that is longer than the tree").unwrap();

        write_output(TREE, &OutputOptions::to_file(path.clone()), &mut Vec::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), TREE);
    }

    #[test]
    fn file_output_reports_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing/dir/tree.txt");
        let options = OutputOptions {
            output_path: Some(PathBuf::from(&path)),
            format: OutputFormat::Txt,
        };

        let err = write_output(TREE, &options, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, OutputError::WriteFailed { .. }));
        assert!(err.to_string().contains("tree.txt"));
    }
}
