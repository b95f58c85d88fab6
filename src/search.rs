//! Plain-text search over the notes of a vault.
//!
//! Search reads every note below the vault root, keeps those whose title or
//! text contains the query (case-insensitive), and ranks title matches ahead
//! of content-only matches, newest first within each group.
//!
//! # Usage
//!
//! ```rust,no_run
//! use obsidian_launcher::config::Settings;
//! use obsidian_launcher::search::search_notes;
//! use std::path::Path;
//!
//! let settings = Settings::default();
//! for hit in search_notes(Path::new("/home/me/Notes"), "rust", 10, &settings) {
//!     println!("{} ({}) {}", hit.title, hit.modified_date, hit.preview);
//! }
//! ```

pub mod query;

use std::path::PathBuf;
use std::time::SystemTime;

pub use query::search_notes;

/// Shown instead of a preview when a note is empty.
pub const NO_PREVIEW: &str = "No preview available";

/// Appended to a preview that was cut short.
pub const ELLIPSIS: &str = "...";

/// A single note that matched a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// File name including the extension.
    pub file_name: String,
    pub absolute_path: PathBuf,
    pub vault_relative_path: PathBuf,
    /// File name without the extension.
    pub title: String,
    /// First line of the note, truncated.
    pub preview: String,
    pub modified: SystemTime,
    /// Local calendar date of `modified`, formatted `YYYY-MM-DD`.
    pub modified_date: String,
    /// Whether the query matched the title (as opposed to only the text).
    pub title_match: bool,
}

/// Builds the preview for a note: its first line, cut to `max_chars`
/// characters with [`ELLIPSIS`] appended when longer.
pub fn preview(content: &str, max_chars: usize) -> String {
    if content.is_empty() {
        return NO_PREVIEW.to_string();
    }

    let first_line = content.split('\n').next().unwrap_or_default();
    let first_line = first_line.strip_suffix('\r').unwrap_or(first_line);

    match first_line.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &first_line[..cut]),
        None => first_line.to_string(),
    }
}
