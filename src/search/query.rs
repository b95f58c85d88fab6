use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use walkdir::WalkDir;

use crate::config::Settings;
use crate::search::{SearchHit, preview};
use crate::vault::is_hidden_or_marker;

/// Searches the notes of the vault at `root` for `query`.
///
/// A note matches when its title (file name without extension) or its text
/// contains `query`, ignoring case. Title matches come first, then content
/// matches; within each group newer notes come first. At most `limit` hits
/// are returned, chosen after ranking the full set.
///
/// Notes that cannot be read as UTF-8 text are skipped.
pub fn search_notes(
    root: &Path,
    query: &str,
    limit: usize,
    settings: &Settings,
) -> Vec<SearchHit> {
    let needle = query.to_lowercase();
    let mut hits = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !is_hidden_or_marker(e.file_name(), settings)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("search skipping entry under {}: {e}", root.display());
                continue;
            }
        };

        if !entry.file_type().is_file() || !settings.is_note(entry.path()) {
            continue;
        }

        match match_note(root, entry.path(), &needle, settings) {
            Ok(Some(hit)) => hits.push(hit),
            Ok(None) => {}
            Err(e) => tracing::debug!("search skipping {}: {e}", entry.path().display()),
        }
    }

    rank(&mut hits);
    hits.truncate(limit);
    hits
}

/// Orders hits: title matches before content matches, newest first.
///
/// The sort is stable so ties keep traversal order.
pub fn rank(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| {
        b.title_match
            .cmp(&a.title_match)
            .then_with(|| b.modified.cmp(&a.modified))
    });
}

fn match_note(
    root: &Path,
    path: &Path,
    needle: &str,
    settings: &Settings,
) -> std::io::Result<Option<SearchHit>> {
    let content = fs::read_to_string(path)?;

    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let title_match = title.to_lowercase().contains(needle);
    if !title_match && !content.to_lowercase().contains(needle) {
        return Ok(None);
    }

    let modified = fs::metadata(path)?.modified()?;
    let modified_date = DateTime::<Local>::from(modified)
        .format("%Y-%m-%d")
        .to_string();

    Ok(Some(SearchHit {
        file_name: path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        absolute_path: path.to_path_buf(),
        vault_relative_path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
        title,
        preview: preview(&content, settings.preview_chars),
        modified,
        modified_date,
        title_match,
    }))
}
