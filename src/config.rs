use std::path::PathBuf;
use std::time::Duration;

/// Environment variable pointing at Obsidian's global `obsidian.json`.
pub const ENV_CONFIG_PATH: &str = "OBSIDIAN_CONFIG_PATH";
/// Extra search roots, separated like `PATH`.
pub const ENV_VAULT_ROOTS: &str = "OBSIDIAN_VAULT_ROOTS";
pub const ENV_CACHE_TTL: &str = "OBSIDIAN_CACHE_TTL_SECS";
pub const ENV_MAX_SCAN_DEPTH: &str = "OBSIDIAN_MAX_SCAN_DEPTH";

/// Runtime settings for discovery, search and note creation.
///
/// [`Settings::default`] resolves platform paths with `dirs`; the
/// environment can override a handful of them through [`Settings::from_env`].
#[derive(Debug, Clone)]
pub struct Settings {
    /// Name of the subdirectory that marks a vault root.
    pub marker_dir: String,
    /// Extension (without the dot) of note files.
    pub note_extension: String,
    /// Maximum age of the vault cache before a rescan.
    pub cache_ttl: Duration,
    /// How many recent notes a vault record keeps.
    pub recent_limit: usize,
    /// Preview length in characters before truncation.
    pub preview_chars: usize,
    /// Daily notes folder used when the vault has no configuration.
    pub default_daily_folder: String,
    /// Location of Obsidian's global registry, if it can be resolved.
    pub app_config_path: Option<PathBuf>,
    /// Home directory used to derive well-known search roots.
    pub home_dir: Option<PathBuf>,
    /// Additional roots scanned for vaults.
    pub extra_search_roots: Vec<PathBuf>,
    /// Optional bound on scan depth below each search root.
    pub max_scan_depth: Option<usize>,
    /// Icon reported with every result.
    pub icon_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marker_dir: ".obsidian".to_string(),
            note_extension: "md".to_string(),
            cache_ttl: Duration::from_secs(300),
            recent_limit: 5,
            preview_chars: 100,
            default_daily_folder: "Daily".to_string(),
            app_config_path: dirs::config_dir().map(|d| d.join("obsidian").join("obsidian.json")),
            home_dir: dirs::home_dir(),
            extra_search_roots: Vec::new(),
            max_scan_depth: None,
            icon_path: "obsidian_icon.png".to_string(),
        }
    }
}

impl Settings {
    /// Defaults with overrides read from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Values that fail to parse are ignored and the default is kept.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_CONFIG_PATH).filter(|v| !v.trim().is_empty()) {
            self.app_config_path = Some(PathBuf::from(path.trim()));
        }

        if let Some(roots) = lookup(ENV_VAULT_ROOTS) {
            self.extra_search_roots
                .extend(std::env::split_paths(&roots).filter(|p| !p.as_os_str().is_empty()));
        }

        if let Some(raw) = lookup(ENV_CACHE_TTL) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.cache_ttl = Duration::from_secs(secs),
                Err(e) => tracing::warn!("ignoring {ENV_CACHE_TTL}={raw:?}: {e}"),
            }
        }

        if let Some(raw) = lookup(ENV_MAX_SCAN_DEPTH) {
            match raw.trim().parse::<usize>() {
                Ok(depth) => self.max_scan_depth = Some(depth),
                Err(e) => tracing::warn!("ignoring {ENV_MAX_SCAN_DEPTH}={raw:?}: {e}"),
            }
        }

        self
    }

    /// Returns true if `path` has the note extension.
    pub fn is_note(&self, path: &std::path::Path) -> bool {
        path.extension().and_then(|s| s.to_str()) == Some(self.note_extension.as_str())
    }
}
