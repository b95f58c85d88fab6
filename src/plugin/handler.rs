use std::path::Path;

use chrono::{DateTime, Local};

use crate::config::Settings;
use crate::daily::resolve_daily_note;
use crate::domain::LocalNote;
use crate::error::ObsError;
use crate::launcher::{self, APP_URI, Launcher, SystemLauncher};
use crate::plugin::command::{Action, Command};
use crate::plugin::response::{DisplayResult, Response};
use crate::search::search_notes;
use crate::vault::VaultRecord;
use crate::vault::cache::{RegistryCache, VaultSource};
use crate::vault::info::vault_info;
use crate::vault::scanner::FilesystemSource;

/// Vaults listed on the home screen.
const HOME_VAULTS: usize = 5;
/// Hits per vault for `search <query>`.
const SEARCH_PER_VAULT: usize = 5;
/// Hits per vault and overall for a bare query.
const QUICK_PER_VAULT: usize = 3;
const QUICK_TOTAL: usize = 10;

/// Handles launcher requests against a vault cache and a [`Launcher`].
pub struct Plugin<L: Launcher, S: VaultSource> {
    settings: Settings,
    cache: RegistryCache<S>,
    launcher: L,
}

impl Plugin<SystemLauncher, FilesystemSource> {
    /// A plugin wired to the real filesystem and operating system.
    pub fn from_settings(settings: Settings) -> Self {
        let source = FilesystemSource::new(settings.clone());
        Self::new(settings, source, SystemLauncher::new())
    }
}

impl<L: Launcher, S: VaultSource> Plugin<L, S> {
    pub fn new(settings: Settings, source: S, launcher: L) -> Self {
        let cache = RegistryCache::new(source, settings.cache_ttl);
        Self {
            settings,
            cache,
            launcher,
        }
    }

    /// Handles the raw command-line argument, if any.
    ///
    /// Never fails: errors become a single error row.
    pub fn handle_raw(&mut self, raw: Option<&str>) -> Response {
        let action = match raw {
            Some(raw) => Action::parse(raw),
            None => Ok(Action::Query(String::new())),
        };

        let result = match action {
            Ok(action) => self.handle(action),
            Err(e) => {
                tracing::warn!("rejected request: {e}");
                vec![self.error_row(&e)]
            }
        };

        Response { result }
    }

    pub fn handle(&mut self, action: Action) -> Vec<DisplayResult> {
        match action {
            Action::Query(text) => self.query(&text),
            Action::ShowCommands => self.show_commands(),
            Action::ShowVaults => self.show_vaults(),
            Action::ExecuteCommand(name) => self.execute_command(&name),
            Action::OpenVault(path) => self.open_vault(&path),
            Action::OpenNote(path) => self.open_note(&path),
            Action::CreateDailyNote { vault_path, title } => {
                self.create_daily_note_in_vault(&vault_path, title.as_deref())
            }
            Action::LaunchApp => self.launch_app(),
        }
    }

    pub fn query(&mut self, text: &str) -> Vec<DisplayResult> {
        match Command::parse(text) {
            Command::Home => self.home(),
            Command::Vaults => self.show_vaults(),
            Command::Search { query } => self.search(&query),
            Command::New { title } => self.new_note(&title),
            Command::Daily { title } => self.daily(title.as_deref()),
            Command::Vault { name } => self.vault(&name),
            Command::Open => vec![
                self.row("🚀 Launch Obsidian", "Open Obsidian application")
                    .with_action("launch_obsidian", Vec::new()),
            ],
            Command::Recent => self.recent(),
            Command::Help => self.show_commands(),
            Command::FreeText { query } => self.quick_search(&query),
        }
    }

    fn vaults(&mut self) -> Vec<VaultRecord> {
        self.cache.get_vaults().to_vec()
    }

    fn home(&mut self) -> Vec<DisplayResult> {
        let vaults = self.vaults();
        let status = if self.launcher.is_app_running() {
            "🟢 Running"
        } else {
            "🔴 Not Running"
        };

        let mut rows = vec![
            self.row(
                format!("📔 Obsidian Notes ({status})"),
                format!("{} found • Click to see commands", plural_vaults(vaults.len())),
            )
            .with_action("show_commands", Vec::new()),
        ];

        if vaults.is_empty() {
            return rows;
        }

        rows.push(
            self.row(
                "📁 Open Vaults",
                format!("Show all {} available", plural_vaults(vaults.len())),
            )
            .with_action("show_vaults", Vec::new()),
        );
        rows.extend(vaults.iter().take(HOME_VAULTS).map(|v| self.vault_row(v, v.note_count)));

        rows
    }

    pub fn show_vaults(&mut self) -> Vec<DisplayResult> {
        let vaults = self.vaults();
        if vaults.is_empty() {
            return vec![self.no_vaults_row()];
        }

        vaults
            .iter()
            .map(|v| {
                let count = vault_info(&v.root_path, &self.settings).note_count;
                self.vault_row(v, count)
            })
            .collect()
    }

    pub fn show_commands(&self) -> Vec<DisplayResult> {
        Command::NAMES
            .iter()
            .map(|name| {
                let (emoji, description) = describe(name);
                self.row(format!("{emoji} obs {name}"), description)
                    .with_action("execute_command", vec![name.to_string()])
            })
            .collect()
    }

    fn search(&mut self, query: &str) -> Vec<DisplayResult> {
        let vaults = self.vaults();
        if query.is_empty() || vaults.is_empty() {
            return vec![self.row("🔍 Search Notes", "Usage: obs search [query]")];
        }

        let mut rows = Vec::new();
        for vault in &vaults {
            for hit in search_notes(&vault.root_path, query, SEARCH_PER_VAULT, &self.settings) {
                rows.push(
                    self.row(
                        format!("📝 {}", hit.title),
                        format!(
                            "📁 {} • {} • {}",
                            vault.name, hit.modified_date, hit.preview
                        ),
                    )
                    .with_path_action("open_note", &hit.absolute_path),
                );
            }
        }

        if rows.is_empty() {
            rows.push(self.row(format!("🔍 No results for '{query}'"), "Try different keywords"));
        }
        rows
    }

    fn quick_search(&mut self, query: &str) -> Vec<DisplayResult> {
        let vaults = self.vaults();
        if vaults.is_empty() {
            return vec![self.no_vaults_row()];
        }

        let mut rows: Vec<DisplayResult> = vaults
            .iter()
            .flat_map(|vault| {
                search_notes(&vault.root_path, query, QUICK_PER_VAULT, &self.settings)
                    .into_iter()
                    .map(move |hit| (vault, hit))
            })
            .map(|(vault, hit)| {
                self.row(
                    format!("📝 {}", hit.title),
                    format!("📁 {} • {}", vault.name, hit.modified_date),
                )
                .with_path_action("open_note", &hit.absolute_path)
            })
            .collect();

        if rows.is_empty() {
            return vec![self.row(
                format!("🔍 No notes found for '{query}'"),
                "Try different keywords or create a new note",
            )];
        }

        rows.truncate(QUICK_TOTAL);
        rows
    }

    fn new_note(&mut self, title: &str) -> Vec<DisplayResult> {
        let vaults = self.vaults();
        let Some(vault) = vaults.first().filter(|_| !title.is_empty()) else {
            return vec![self.row("📝 Create New Note", "Usage: obs new [title]")];
        };

        match LocalNote::create(title, &vault.root_path) {
            Ok(note) => {
                let relative = note.relative_to(&vault.root_path).unwrap_or_default();
                vec![
                    self.row(
                        format!("✅ Note Created: {title}"),
                        format!("📁 {}/{}", vault.name, relative.display()),
                    )
                    .with_path_action("open_note", &note.path),
                ]
            }
            Err(e) => {
                tracing::warn!("could not create note {title:?} in {}: {e}", vault.name);
                vec![self.row("❌ Failed to create note", "Check vault permissions")]
            }
        }
    }

    fn daily(&mut self, title: Option<&str>) -> Vec<DisplayResult> {
        let vaults = self.vaults();

        match vaults.as_slice() {
            [] => vec![self.no_vaults_row()],
            [vault] => match resolve_daily_note(vault, title, &self.settings) {
                Ok(note) => {
                    let heading = if note.created {
                        "✅ Daily Note Created"
                    } else {
                        "📅 Daily Note"
                    };
                    vec![
                        self.row(
                            heading,
                            format!("📁 {}/{}", vault.name, note.vault_relative_path.display()),
                        )
                        .with_path_action("open_note", &note.absolute_path),
                    ]
                }
                Err(e) => {
                    tracing::warn!("daily note failed in {}: {e}", vault.name);
                    vec![self.row("❌ Failed to create daily note", "Check vault permissions")]
                }
            },
            many => {
                let mut rows = vec![self.row(
                    "📅 Create Daily Note In:",
                    "Choose which vault to create today's daily note in",
                )];
                rows.extend(many.iter().map(|vault| {
                    let rest = title.map(str::to_string).into_iter().collect();
                    self.row(
                        format!("📝 {}", vault.name),
                        format!("Create daily note in {} vault", vault.name),
                    )
                    .with_path_params("create_daily_note_in_vault", &vault.root_path, rest)
                }));
                rows
            }
        }
    }

    fn vault(&mut self, name: &str) -> Vec<DisplayResult> {
        if name.is_empty() {
            return self.show_vaults();
        }

        let needle = name.to_lowercase();
        let vaults = self.vaults();

        match vaults.iter().find(|v| v.name.to_lowercase().contains(&needle)) {
            Some(vault) => vec![
                self.row(
                    format!("📁 Open {}", vault.name),
                    format!("Open vault: {}", vault.root_path.display()),
                )
                .with_path_action("open_vault", &vault.root_path),
            ],
            None => vec![self.row(
                format!("❌ Vault not found: {name}"),
                "Use 'obs vaults' to see available vaults",
            )],
        }
    }

    fn recent(&mut self) -> Vec<DisplayResult> {
        let vaults = self.vaults();
        let Some(vault) = vaults.first() else {
            return vec![self.no_vaults_row()];
        };

        let info = vault_info(&vault.root_path, &self.settings);
        if info.recent_notes.is_empty() {
            return vec![self.row(
                "❌ No recent notes found",
                "Start creating notes in your vault",
            )];
        }

        info.recent_notes
            .iter()
            .map(|note| {
                let title = note
                    .path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let date = DateTime::<Local>::from(note.modified).format("%Y-%m-%d");

                self.row(format!("🕐 {title}"), format!("📁 {} • {date}", vault.name))
                    .with_path_action("open_note", &note.path)
            })
            .collect()
    }

    fn execute_command(&mut self, name: &str) -> Vec<DisplayResult> {
        if name == "launch_obsidian" {
            return self.launch_app();
        }

        if Command::NAMES.contains(&name) {
            return self.query(name);
        }

        vec![self.row(
            format!("✅ Command Executed: {name}"),
            format!("Executed {name} command"),
        )]
    }

    fn open_vault(&mut self, path: &Path) -> Vec<DisplayResult> {
        let vaults = self.vaults();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let opened = match vaults.iter().find(|v| v.root_path == path) {
            Some(vault) => launcher::open_vault(&self.launcher, vault)
                .inspect_err(|e| tracing::warn!("could not open vault {name}: {e}"))
                .is_ok(),
            None => {
                tracing::warn!("unknown vault {}", path.display());
                false
            }
        };

        if opened {
            vec![self.row(
                format!("✅ Opened Vault: {name}"),
                format!("Vault path: {}", path.display()),
            )]
        } else {
            vec![self.row(
                format!("❌ Failed to open vault: {name}"),
                "Check vault path and permissions",
            )]
        }
    }

    fn open_note(&mut self, path: &Path) -> Vec<DisplayResult> {
        let vaults = self.vaults();

        match launcher::open_note(&self.launcher, &vaults, path) {
            Ok(()) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                vec![self.row("✅ Note Opened", file_name)]
            }
            Err(e) => {
                tracing::warn!("could not open note {}: {e}", path.display());
                vec![self.row("❌ Failed to open note", "Check note path")]
            }
        }
    }

    fn create_daily_note_in_vault(
        &mut self,
        path: &Path,
        title: Option<&str>,
    ) -> Vec<DisplayResult> {
        let vaults = self.vaults();
        let vault = vaults
            .iter()
            .find(|v| v.root_path == path)
            .cloned()
            .unwrap_or_else(|| VaultRecord::new(path, &self.settings.marker_dir));

        let note = match resolve_daily_note(&vault, title, &self.settings) {
            Ok(note) => note,
            Err(e) => {
                tracing::warn!("daily note failed in {}: {e}", vault.name);
                return vec![self.row(
                    "❌ Failed to create daily note",
                    "Check vault permissions and template path",
                )];
            }
        };

        let owner = std::slice::from_ref(&vault);
        let opened = launcher::open_note(&self.launcher, owner, &note.absolute_path)
            .inspect_err(|e| tracing::warn!("could not open daily note: {e}"))
            .is_ok();
        let suffix = if opened { " - Opened in Obsidian" } else { "" };

        vec![self.row(
            format!("✅ Daily Note Created in {}", vault.name),
            format!("📁 {}/{}{suffix}", vault.name, note.vault_relative_path.display()),
        )]
    }

    fn launch_app(&self) -> Vec<DisplayResult> {
        match self.launcher.open_uri(APP_URI) {
            Ok(()) => vec![self.row("✅ Obsidian Launched", "Obsidian is now running")],
            Err(e) => {
                tracing::warn!("could not launch Obsidian: {e}");
                vec![self.row("❌ Failed to launch Obsidian", "Check if Obsidian is installed")]
            }
        }
    }

    fn vault_row(&self, vault: &VaultRecord, note_count: usize) -> DisplayResult {
        self.row(
            format!("📁 {}", vault.name),
            format!("{note_count} notes • {}", vault.root_path.display()),
        )
        .with_path_action("open_vault", &vault.root_path)
    }

    fn no_vaults_row(&self) -> DisplayResult {
        self.row("❌ No vaults found", "Create an Obsidian vault first")
    }

    fn error_row(&self, error: &ObsError) -> DisplayResult {
        self.row("Obsidian Plugin Error", format!("Error: {error}"))
    }

    fn row(&self, title: impl Into<String>, subtitle: impl Into<String>) -> DisplayResult {
        DisplayResult::new(title, subtitle, &self.settings.icon_path)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }
}

fn plural_vaults(count: usize) -> String {
    if count == 1 {
        "1 vault".to_string()
    } else {
        format!("{count} vaults")
    }
}

fn describe(name: &str) -> (&'static str, &'static str) {
    match name {
        "vaults" => ("📁", "Show all available vaults"),
        "search" => ("🔍", "Search notes (usage: obs search [query])"),
        "new" => ("📝", "Create new note (usage: obs new [title])"),
        "daily" => ("📅", "Create/open daily note (usage: obs daily [title])"),
        "recent" => ("🕐", "Show recent notes"),
        "vault" => ("📂", "Open specific vault (usage: obs vault [name])"),
        "open" => ("🚀", "Open Obsidian"),
        _ => ("❓", "Show available commands"),
    }
}
