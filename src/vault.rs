//! Vault discovery, metadata and caching.
//!
//! A vault is any directory that directly contains the marker subdirectory
//! (`.obsidian` unless configured otherwise). The [`scanner`] finds vaults
//! below a set of search roots, [`info`] summarises their notes, [`registry`]
//! reads Obsidian's own list of known vaults and [`cache`] keeps the last scan
//! around for the configured TTL.

pub mod cache;
pub mod info;
pub mod registry;
pub mod scanner;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::Settings;
pub use info::RecentNote;

/// Directory names never descended into while looking for vaults.
pub const DENY_LIST: &[&str] = &[
    "node_modules",
    "venv",
    ".git",
    "__pycache__",
    "AppData",
    "Program Files",
    "Program Files (x86)",
    "Windows",
    "System32",
    "temp",
    "tmp",
    "$Recycle.Bin",
];

/// One discovered vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultRecord {
    /// Directory base name, shown to the user.
    pub name: String,
    /// Absolute path of the vault root. Unique within a scan result.
    pub root_path: PathBuf,
    /// Path of the marker subdirectory.
    pub marker_path: PathBuf,
    pub note_count: usize,
    /// Most recently modified notes, newest first.
    pub recent_notes: Vec<RecentNote>,
    /// Id from Obsidian's global registry when the root is registered there.
    pub registered_id: Option<String>,
}

impl VaultRecord {
    /// A record for `root` with no metadata and no registry id.
    pub fn new(root: &Path, marker_dir: &str) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        Self {
            name,
            root_path: root.to_path_buf(),
            marker_path: root.join(marker_dir),
            note_count: 0,
            recent_notes: Vec::new(),
            registered_id: None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered_id.is_some()
    }

    /// Value for the `vault=` parameter of an `obsidian://` URI.
    ///
    /// Obsidian accepts either the registry id or the vault name; the id is
    /// unambiguous so it wins when known.
    pub fn uri_target(&self) -> &str {
        self.registered_id.as_deref().unwrap_or(&self.name)
    }

    /// Returns true if `path` lies inside this vault.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root_path)
    }
}

/// Whether a directory should be skipped by every walk: hidden directories
/// and the marker directory itself.
pub(crate) fn is_hidden_or_marker(name: &OsStr, settings: &Settings) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || name == settings.marker_dir
}

/// Whether a directory should be skipped while discovering vaults.
pub(crate) fn is_pruned_for_discovery(name: &OsStr, settings: &Settings) -> bool {
    is_hidden_or_marker(name, settings) || DENY_LIST.iter().any(|d| name == OsStr::new(d))
}
