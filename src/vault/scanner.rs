use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Settings;
use crate::vault::cache::VaultSource;
use crate::vault::info::vault_info;
use crate::vault::registry::RegisteredVaults;
use crate::vault::{VaultRecord, is_pruned_for_discovery};

/// Folders below the home directory where vaults usually live.
const HOME_FOLDERS: &[&str] = &[
    "Documents",
    "OneDrive/Documents",
    "Desktop",
    "Notes",
    "Obsidian",
    "Dropbox",
    "Google Drive",
    "iCloudDrive",
];

/// Folders below each drive root checked on Windows.
const DRIVE_FOLDERS: &[&str] = &["Users", "Documents", "Notes", "Obsidian"];

/// Builds the set of directories to scan for vaults.
///
/// Combines well-known folders under the home directory, every drive root on
/// Windows, registered vault paths and configured extra roots. Paths that do
/// not exist are dropped; the set removes duplicates.
pub fn candidate_search_roots(
    settings: &Settings,
    registered: &RegisteredVaults,
) -> BTreeSet<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(home) = &settings.home_dir {
        candidates.extend(HOME_FOLDERS.iter().map(|f| home.join(f)));
        candidates.push(home.clone());
    }

    for drive in drive_roots() {
        candidates.extend(DRIVE_FOLDERS.iter().map(|f| drive.join(f)));
        candidates.push(drive);
    }

    candidates.extend(registered.paths().map(Path::to_path_buf));
    candidates.extend(settings.extra_search_roots.iter().cloned());

    candidates.into_iter().filter(|p| p.exists()).collect()
}

#[cfg(windows)]
fn drive_roots() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|p| p.exists())
        .collect()
}

#[cfg(not(windows))]
fn drive_roots() -> Vec<PathBuf> {
    Vec::new()
}

/// Walks every search root and returns the vaults found, each once.
///
/// Hidden directories, the marker directory and the [`DENY_LIST`](crate::vault::DENY_LIST)
/// are never descended into. Unreadable subtrees are skipped. Every vault is
/// cross-referenced with `registered` and summarised with
/// [`vault_info`].
pub fn discover_vaults(
    search_roots: &BTreeSet<PathBuf>,
    registered: &RegisteredVaults,
    settings: &Settings,
) -> Vec<VaultRecord> {
    let mut vaults = Vec::new();
    let mut seen = HashSet::new();

    for root in search_roots {
        let mut walker = WalkDir::new(root).sort_by_file_name();
        if let Some(depth) = settings.max_scan_depth {
            walker = walker.max_depth(depth);
        }

        let dirs = walker.into_iter().filter_entry(|e| {
            e.file_type().is_dir()
                && (e.depth() == 0 || !is_pruned_for_discovery(e.file_name(), settings))
        });

        for entry in dirs {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("skipping subtree under {}: {e}", root.display());
                    continue;
                }
            };

            if !entry.path().join(&settings.marker_dir).is_dir() {
                continue;
            }

            if !seen.insert(entry.path().to_path_buf()) {
                continue;
            }

            let mut vault = VaultRecord::new(entry.path(), &settings.marker_dir);
            vault.registered_id = registered.id_for(&vault.root_path).map(str::to_owned);

            let info = vault_info(&vault.root_path, settings);
            vault.note_count = info.note_count;
            vault.recent_notes = info.recent_notes;

            tracing::debug!(
                "found vault {} at {} ({} notes)",
                vault.name,
                vault.root_path.display(),
                vault.note_count
            );
            vaults.push(vault);
        }
    }

    vaults
}

/// Discovers vaults on the real filesystem.
///
/// Every call rereads Obsidian's registry and rebuilds the candidate roots, so
/// a fresh scan sees newly registered vaults.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    settings: Settings,
}

impl FilesystemSource {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl VaultSource for FilesystemSource {
    fn discover(&self) -> Vec<VaultRecord> {
        let registered = RegisteredVaults::load(self.settings.app_config_path.as_deref());
        let roots = candidate_search_roots(&self.settings, &registered);
        tracing::debug!(
            "scanning {} search roots ({} registered vaults)",
            roots.len(),
            registered.len()
        );
        discover_vaults(&roots, &registered, &self.settings)
    }
}
