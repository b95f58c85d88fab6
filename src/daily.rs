//! Daily notes.
//!
//! Obsidian's Daily Notes plugin stores its settings in
//! `<vault>/.obsidian/daily-notes.json`: a folder, a Moment.js style date
//! format and an optional template. [`resolve_daily_note`] honours those
//! settings to find (or create) today's note.

pub mod format;
pub mod template;

use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::domain::{LocalNote, NoteError};
use crate::vault::VaultRecord;

pub const CONFIG_FILE: &str = "daily-notes.json";

/// Per-vault daily notes settings. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DailyNotesConfig {
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
}

impl DailyNotesConfig {
    /// Reads `daily-notes.json` from a vault's marker directory.
    ///
    /// Returns `None` when the file is missing or cannot be parsed.
    pub fn load(marker_path: &Path) -> Option<Self> {
        let path = marker_path.join(CONFIG_FILE);
        let text = fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&text) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("ignoring malformed {}: {e}", path.display());
                None
            }
        }
    }

    /// Folder relative to the vault root. An empty folder means the root.
    pub fn folder<'a>(&'a self, default: &'a str) -> &'a str {
        self.folder.as_deref().map(str::trim).unwrap_or(default)
    }

    pub fn date_format(&self) -> Option<&str> {
        non_empty(self.format.as_deref())
    }

    pub fn template(&self) -> Option<&str> {
        non_empty(self.template.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Outcome of resolving a daily note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyNote {
    pub absolute_path: PathBuf,
    pub vault_relative_path: PathBuf,
    pub content: String,
    /// False when the note already existed and was left alone.
    pub created: bool,
}

/// Finds or creates today's daily note in `vault`.
///
/// See [`resolve_daily_note_at`].
pub fn resolve_daily_note(
    vault: &VaultRecord,
    explicit_title: Option<&str>,
    settings: &Settings,
) -> Result<DailyNote, NoteError> {
    resolve_daily_note_at(vault, explicit_title, settings, Local::now())
}

/// Finds or creates the daily note for `now` in `vault`.
///
/// The note lives at `<root>/<folder>/<title>.md`. The title is
/// `explicit_title` when given, otherwise `now` formatted with the vault's
/// date format. An existing note is returned untouched. A new note is filled
/// from the configured template, or a small default body if there is none.
///
/// # Errors
/// Returns [`NoteError::InvalidPath`] for a title that would leave the daily
/// notes folder (`..`, an absolute path), and [`NoteError::FileError`] if the
/// folder or the note cannot be written.
pub fn resolve_daily_note_at(
    vault: &VaultRecord,
    explicit_title: Option<&str>,
    settings: &Settings,
    now: DateTime<Local>,
) -> Result<DailyNote, NoteError> {
    let config = DailyNotesConfig::load(&vault.marker_path).unwrap_or_default();

    let title = match explicit_title.filter(|t| !t.trim().is_empty()) {
        Some(title) => title.to_string(),
        None => format::format_date(
            config.date_format().unwrap_or(format::DEFAULT_FORMAT),
            &now,
        ),
    };

    let folder = vault
        .root_path
        .join(config.folder(&settings.default_daily_folder));
    let target = note_target(&folder, &title)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(NoteError::FileError)?;
    }

    if target.exists() {
        return Ok(existing(vault, target));
    }

    let content = config
        .template()
        .and_then(|t| load_template(&vault.root_path, t))
        .map(|t| template::render(&t, &title, &now))
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| default_body(&title, &now));

    match LocalNote::write_new(&target, content.as_bytes()) {
        Ok(()) => {
            tracing::info!("created daily note {}", target.display());
            Ok(DailyNote {
                vault_relative_path: relative(vault, &target),
                absolute_path: target,
                content,
                created: true,
            })
        }
        Err(NoteError::FileError(e)) if e.kind() == ErrorKind::AlreadyExists => {
            Ok(existing(vault, target))
        }
        Err(e) => Err(e),
    }
}

/// `<folder>/<title>.md`. A title may add subfolders (`YYYY/MM/YYYY-MM-DD`)
/// but never climb out of `folder`.
fn note_target(folder: &Path, title: &str) -> Result<PathBuf, NoteError> {
    let escapes = Path::new(title)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        tracing::warn!("refusing daily note title {title:?} outside {}", folder.display());
        return Err(NoteError::InvalidPath);
    }

    Ok(folder.join(format!("{title}.md")))
}

fn existing(vault: &VaultRecord, target: PathBuf) -> DailyNote {
    let content = fs::read_to_string(&target).unwrap_or_else(|e| {
        tracing::debug!("could not read existing {}: {e}", target.display());
        String::new()
    });

    DailyNote {
        vault_relative_path: relative(vault, &target),
        absolute_path: target,
        content,
        created: false,
    }
}

fn relative(vault: &VaultRecord, path: &Path) -> PathBuf {
    path.strip_prefix(&vault.root_path)
        .unwrap_or(path)
        .to_path_buf()
}

/// Reads a template, trying `<root>/<name>.md` before `<root>/<name>`.
fn load_template(root: &Path, name: &str) -> Option<String> {
    let candidates = [root.join(format!("{name}.md")), root.join(name)];

    let found = candidates
        .iter()
        .filter(|p| p.is_file())
        .find_map(|p| fs::read_to_string(p).ok());

    if found.is_none() {
        tracing::warn!("daily note template {name:?} not found in {}", root.display());
    }
    found
}

fn default_body(title: &str, now: &DateTime<Local>) -> String {
    format!(
        "# {title}\n\nDate: {}\n\n## Notes\n\n- \n\n",
        now.format("%Y-%m-%d %H:%M:%S")
    )
}
