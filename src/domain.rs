use chrono::{DateTime, Local};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Characters Windows and macOS refuse in file names.
const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("invalid path")]
    InvalidPath,
    #[error(transparent)]
    FileError(std::io::Error),
}

/// A note stored in a vault as a Markdown file (`.md`).
#[derive(Debug, Clone)]
pub struct LocalNote {
    pub title: String,
    pub content: String,
    pub path: PathBuf,
}

impl LocalNote {
    /// Creates a new note under `dir`, stamped with the current local time.
    ///
    /// See [`LocalNote::create_at`].
    pub fn create(title: &str, dir: &Path) -> Result<LocalNote, NoteError> {
        Self::create_at(title, dir, Local::now())
    }

    /// Creates a new note file under `dir`.
    ///
    /// The title is sanitized into a file name; if `{name}.md` is taken the
    /// note becomes `{name} 1.md`, `{name} 2.md` and so on. Existing files are
    /// never overwritten. The body is a heading, a creation timestamp and an
    /// empty content section.
    pub fn create_at(
        title: &str,
        dir: &Path,
        now: DateTime<Local>,
    ) -> Result<LocalNote, NoteError> {
        let note_title = Self::sanitize_title(title);
        let content = format!(
            "# {}\n\nCreated: {}\n\n## Content\n\n- \n\n",
            title.trim(),
            now.format("%Y-%m-%d %H:%M:%S")
        );

        let mut counter = 0u32;
        loop {
            let file_name = if counter == 0 {
                format!("{note_title}.md")
            } else {
                format!("{note_title} {counter}.md")
            };
            let note_path = dir.join(file_name);

            if !note_path.exists() {
                match Self::write_new(&note_path, content.as_bytes()) {
                    Ok(()) => {
                        return Ok(LocalNote {
                            title: note_title,
                            content,
                            path: note_path,
                        });
                    }
                    // Lost a race with another writer; try the next name.
                    Err(NoteError::FileError(e))
                        if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                    Err(e) => return Err(e),
                }
            }

            counter += 1;
        }
    }

    /// Reads a note from disk. The title is the file stem.
    pub fn open(path: &Path) -> Result<LocalNote, NoteError> {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or(NoteError::InvalidPath)?;
        let content = fs::read_to_string(path).map_err(NoteError::FileError)?;

        Ok(LocalNote {
            title,
            content,
            path: path.to_path_buf(),
        })
    }

    /// Reloads this note from disk, returning a new `LocalNote`.
    ///
    /// Does **not** mutate `self`. Returns `FileError` if reading fails.
    pub fn reload(&self) -> Result<LocalNote, NoteError> {
        let data = fs::read_to_string(&self.path).map_err(NoteError::FileError)?;

        Ok(LocalNote {
            title: self.title.clone(),
            content: data,
            path: self.path.clone(),
        })
    }

    /// Path of this note relative to `vault_root`.
    pub fn relative_to(&self, vault_root: &Path) -> Option<PathBuf> {
        self.path.strip_prefix(vault_root).ok().map(Path::to_path_buf)
    }

    /// Turns a free-form title into a file-name-safe one.
    ///
    /// Trims whitespace, replaces OS-invalid characters
    /// (`<`, `>`, `:`, `"`, `/`, `\`, `|`, `?`, `*`) with `_`, and falls back to
    /// `Untitled` when nothing is left.
    pub fn sanitize_title(title: &str) -> String {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return "Untitled".to_string();
        }

        trimmed
            .chars()
            .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
            .collect()
    }

    /// Atomically writes `data` to a file that must not exist yet.
    ///
    /// Writes a temporary file in the target directory and links it into
    /// place without clobbering, so readers never see a half-written note and
    /// an existing note is never replaced. Fails with an `AlreadyExists`
    /// `FileError` if `path` exists.
    pub(crate) fn write_new(path: &Path, data: &[u8]) -> Result<(), NoteError> {
        let dir = path.parent().ok_or(NoteError::InvalidPath)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(NoteError::FileError)?;
        tmp.write_all(data).map_err(NoteError::FileError)?;
        tmp.persist_noclobber(path)
            .map_err(|e| NoteError::FileError(e.error))?;
        Ok(())
    }
}
