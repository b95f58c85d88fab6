use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Vaults listed in Obsidian's global `obsidian.json`, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredVaults {
    by_id: BTreeMap<String, PathBuf>,
}

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    vaults: BTreeMap<String, serde_json::Value>,
}

impl RegisteredVaults {
    /// Loads the registry from `path`.
    ///
    /// A missing path, unreadable file or malformed JSON yields an empty
    /// registry; the registry only enriches discovery.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) => {
                tracing::debug!("no vault registry at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parses the contents of `obsidian.json`.
    ///
    /// Entries without a string `path` are skipped individually.
    pub fn from_json(text: &str) -> Self {
        let file: RegistryFile = match serde_json::from_str(text) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("ignoring malformed vault registry: {e}");
                return Self::default();
            }
        };

        let mut registered = Self::default();
        for (id, entry) in file.vaults {
            match entry.get("path").and_then(|p| p.as_str()) {
                Some(path) => registered.insert(id, PathBuf::from(path)),
                None => tracing::debug!("registry entry {id} has no path, skipping"),
            }
        }
        registered
    }

    pub fn insert(&mut self, id: impl Into<String>, path: impl Into<PathBuf>) {
        self.by_id.insert(id.into(), path.into());
    }

    /// Id of the registered vault whose path equals `root`.
    pub fn id_for(&self, root: &Path) -> Option<&str> {
        self.by_id
            .iter()
            .find(|(_, path)| path.as_path() == root)
            .map(|(id, _)| id.as_str())
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.by_id.values().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
