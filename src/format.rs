//! Formatting helpers: sizes, timestamps and file-type icons.
//!
//! Everything here is a pure function over its arguments. The icon table is a
//! static slice that is never mutated.

#![forbid(unsafe_code)]

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::config::SizeUnit;

// ============================================================================
// Icons
// ============================================================================

/// Icon shown for directories.
pub const DIRECTORY_ICON: &str = "📁 ";

/// Icon shown for files whose extension is not in [`EXTENSION_ICONS`].
pub const DEFAULT_FILE_ICON: &str = "📄 ";

/// Lowercase extension to icon. Every icon carries its trailing space.
pub const EXTENSION_ICONS: &[(&str, &str)] = &[
    // images
    ("jpeg", "🖼️ "),
    ("jpg", "🖼️ "),
    ("png", "🖼️ "),
    ("gif", "🖼️ "),
    ("bmp", "🖼️ "),
    ("webp", "🖼️ "),
    ("svg", "🖼️ "),
    // video
    ("mp4", "🎬 "),
    ("mov", "🎬 "),
    ("avi", "🎬 "),
    ("mkv", "🎬 "),
    ("webm", "🎬 "),
    // audio
    ("mp3", "🎵 "),
    ("wav", "🎵 "),
    ("ogg", "🎵 "),
    ("flac", "🎵 "),
    ("aac", "🎵 "),
    // documents
    ("pdf", "📝 "),
    ("doc", "📝 "),
    ("docx", "📝 "),
    ("txt", "📄 "),
    ("md", "📄 "),
    // archives
    ("zip", "📦 "),
    ("rar", "📦 "),
    ("tar", "📦 "),
    ("gz", "📦 "),
    // source code
    ("js", "📜 "),
    ("ts", "📜 "),
    ("py", "📜 "),
    ("java", "📜 "),
    ("html", "📜 "),
    ("css", "📜 "),
];

/// Returns the display icon for an entry.
///
/// Empty when icons are disabled. Files are matched on their lowercased
/// extension; dotfiles such as `.gitignore` have no extension and get the
/// default icon.
///
/// # Examples
///
/// ```
/// use dirtree::format::icon_for;
///
/// assert_eq!(icon_for("photo.PNG", false, true), "🖼️ ");
/// assert_eq!(icon_for("src", true, true), "📁 ");
/// assert_eq!(icon_for("Makefile", false, true), "📄 ");
/// assert_eq!(icon_for("photo.png", false, false), "");
/// ```
#[must_use]
pub fn icon_for(name: &str, is_dir: bool, show_icons: bool) -> &'static str {
    if !show_icons {
        return "";
    }
    if is_dir {
        return DIRECTORY_ICON;
    }

    let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
        return DEFAULT_FILE_ICON;
    };
    let ext = ext.to_lowercase();

    EXTENSION_ICONS
        .iter()
        .find(|(known, _)| *known == ext.as_str())
        .map_or(DEFAULT_FILE_ICON, |&(_, icon)| icon)
}

// ============================================================================
// Sizes
// ============================================================================

/// Formats a byte count in the requested unit.
///
/// `B` prints the raw count. Larger units divide by the matching power of
/// 1024 and keep two decimals, dropping them when they are `.00`.
///
/// # Examples
///
/// ```
/// use dirtree::config::SizeUnit;
/// use dirtree::format::format_size;
///
/// assert_eq!(format_size(5, SizeUnit::B), "5 B");
/// assert_eq!(format_size(1024, SizeUnit::Kb), "1 KB");
/// assert_eq!(format_size(1500, SizeUnit::Kb), "1.46 KB");
/// assert_eq!(format_size(0, SizeUnit::Gb), "0 GB");
/// ```
#[must_use]
pub fn format_size(bytes: u64, unit: SizeUnit) -> String {
    if unit == SizeUnit::B {
        return format!("{bytes} B");
    }

    let scaled = bytes as f64 / 1024_f64.powi(unit.exponent());
    format!("{} {}", trim_decimals(scaled), unit.label())
}

/// Two-decimal rendering with a `.00` tail removed.
fn trim_decimals(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let fixed = format!("{value:.2}");
    if fixed.ends_with(".00") {
        fixed[..fixed.len() - 3].to_string()
    } else {
        fixed
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// Formats a `SystemTime` as a local timezone datetime string.
///
/// Converts to local time and formats as "YYYY-MM-DD HH:MM:SS".
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
/// use dirtree::format::format_datetime;
///
/// let formatted = format_datetime(&SystemTime::now());
/// assert_eq!(formatted.len(), 19);
/// ```
#[must_use]
pub fn format_datetime(time: &SystemTime) -> String {
    let datetime: DateTime<Local> = (*time).into();
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}
