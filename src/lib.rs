//! dirtree: render a directory as a tree diagram.
//!
//! The binary wires these modules together in order:
//!
//! 1. **CLI parsing** (`cli`): arguments become a validated `Config`
//! 2. **Rendering** (`render`): the walker lists and stats entries through a
//!    `scan::FileSystem` and produces the tree text
//! 3. **Output** (`output`): the text goes to stdout or to a file
//!
//! `format` holds the pure helpers (sizes, dates, icons) and `gitignore`
//! derives extra exclusions from the root's `.gitignore`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod gitignore;
pub mod output;
pub mod render;
pub mod scan;

pub use config::{Config, OutputFormat, OutputOptions, SizeUnit, TraversalConfig};
pub use error::{DirtreeError, DirtreeResult};
pub use render::{RenderResult, render};
pub use scan::{FileSystem, StdFileSystem};
