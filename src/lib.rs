//! # obsidian_launcher
//!
//! Finds Obsidian vaults on the local machine, searches their notes, creates
//! notes and daily notes, and hands vaults and notes over to Obsidian. Built to
//! back a launcher plugin (Flow Launcher / Wox style JSON-RPC), but every
//! piece is usable on its own.
//!
//! ## Features
//!
//! - **Vault Discovery**: Walks well-known folders, drive roots and Obsidian's
//!   own registry, pruning hidden and system directories
//! - **Vault Cache**: Keeps the last scan for a configurable TTL
//! - **Note Search**: Case-insensitive title and full-text matching, title hits first
//! - **Daily Notes**: Honours the vault's Daily Notes settings and templates, never
//!   overwrites an existing note
//! - **Obsidian Handoff**: `obsidian://` URIs with a direct-launch fallback
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use obsidian_launcher::config::Settings;
//! use obsidian_launcher::search::search_notes;
//! use obsidian_launcher::vault::cache::RegistryCache;
//! use obsidian_launcher::vault::scanner::FilesystemSource;
//!
//! let settings = Settings::from_env();
//! let mut cache = RegistryCache::new(FilesystemSource::new(settings.clone()), settings.cache_ttl);
//!
//! for vault in cache.get_vaults() {
//!     println!("{} ({} notes)", vault.name, vault.note_count);
//!     for hit in search_notes(&vault.root_path, "meeting", 5, &settings) {
//!         println!("  {} - {}", hit.title, hit.preview);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - **[`vault`]**: Discovery, registry, metadata and the TTL cache
//! - **[`search`]**: Note search and previews
//! - **[`daily`]**: Daily note configuration, date patterns and templates
//! - **[`domain`]**: Creating notes on disk
//! - **[`launcher`]**: Opening vaults and notes in Obsidian
//! - **[`plugin`]**: JSON-RPC request handling for the launcher
//! - **[`config`]**: Settings and environment overrides
//! - **[`error`]**: Unified error handling
//!
//! ## Daily Notes
//!
//! ```rust,no_run
//! use obsidian_launcher::config::Settings;
//! use obsidian_launcher::daily::resolve_daily_note;
//! use obsidian_launcher::vault::VaultRecord;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default();
//! let vault = VaultRecord::new(Path::new("/home/me/Notes"), &settings.marker_dir);
//!
//! // Creates Daily/2024-03-05.md (or whatever the vault configures) once;
//! // later calls return the same note untouched.
//! let note = resolve_daily_note(&vault, None, &settings)?;
//! println!("{}", note.vault_relative_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Scanning and searching never fail: unreadable directories and files are
//! skipped. Writing notes returns [`domain::NoteError`], which converts into
//! the crate-wide [`ObsError`] so `?` works throughout.

pub mod config;
pub mod daily;
pub mod domain;
pub mod error;
pub mod launcher;
pub mod plugin;
pub mod search;
pub mod vault;

/// Re-exports the most commonly used types for convenience.
pub use error::{ObsError, ObsResult};
