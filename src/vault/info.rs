use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::config::Settings;
use crate::vault::is_hidden_or_marker;

/// A note and its last modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentNote {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Summary of a vault's notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultInfo {
    pub note_count: usize,
    /// Newest first, at most `Settings::recent_limit` entries.
    pub recent_notes: Vec<RecentNote>,
}

/// Counts the notes below `root` and picks the most recently modified ones.
///
/// Hidden directories and the marker directory are skipped. A note whose
/// metadata cannot be read still counts but is left out of the recent list.
/// Traversal is sorted by file name and the recency sort is stable, so notes
/// with equal modification times keep file-name order.
pub fn vault_info(root: &Path, settings: &Settings) -> VaultInfo {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !is_hidden_or_marker(e.file_name(), settings)
        });

    let notes = walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("skipping unreadable entry under {}: {e}", root.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && settings.is_note(entry.path()))
        .map(|entry| {
            let modified = entry
                .metadata()
                .map_err(io::Error::from)
                .and_then(|m| m.modified());
            (entry.into_path(), modified)
        });

    summarize(notes, settings.recent_limit)
}

/// Folds `(note, mtime)` pairs into a [`VaultInfo`].
///
/// Every note counts. Notes without a readable mtime are logged and left out
/// of the recent list; the rest keep their order on equal times.
fn summarize<I>(notes: I, recent_limit: usize) -> VaultInfo
where
    I: IntoIterator<Item = (PathBuf, io::Result<SystemTime>)>,
{
    let mut info = VaultInfo::default();
    let mut recent = Vec::new();

    for (path, modified) in notes {
        info.note_count += 1;
        match modified {
            Ok(modified) => recent.push(RecentNote { path, modified }),
            Err(e) => tracing::debug!("no mtime for {}: {e}", path.display()),
        }
    }

    recent.sort_by(|a, b| b.modified.cmp(&a.modified));
    recent.truncate(recent_limit);
    info.recent_notes = recent;

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> io::Result<SystemTime> {
        Ok(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }

    #[test]
    fn unreadable_mtime_counts_but_is_not_recent() {
        let notes = vec![
            (PathBuf::from("a.md"), at(10)),
            (
                PathBuf::from("broken.md"),
                Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            ),
            (PathBuf::from("c.md"), at(30)),
        ];

        let info = summarize(notes, 5);
        assert_eq!(info.note_count, 3);

        let paths: Vec<_> = info.recent_notes.iter().map(|n| n.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("c.md"), PathBuf::from("a.md")]);
    }

    #[test]
    fn recent_list_is_capped_and_stable() {
        let notes = (0..4).map(|i| (PathBuf::from(format!("{i}.md")), at(7)));

        let info = summarize(notes, 2);
        assert_eq!(info.note_count, 4);

        let paths: Vec<_> = info.recent_notes.iter().map(|n| n.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("0.md"), PathBuf::from("1.md")]);
    }
}
