use obsidian_launcher::config::Settings;
use obsidian_launcher::launcher::Launcher;
use obsidian_launcher::plugin::{Action, DisplayResult, Plugin};
use obsidian_launcher::vault::VaultRecord;
use obsidian_launcher::vault::cache::VaultSource;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingLauncher {
    opened: RefCell<Vec<String>>,
    running: bool,
}

impl Launcher for RecordingLauncher {
    fn open_uri(&self, uri: &str) -> io::Result<()> {
        self.opened.borrow_mut().push(uri.to_string());
        Ok(())
    }

    fn open_path(&self, path: &Path) -> io::Result<()> {
        self.opened.borrow_mut().push(format!("file:{}", path.display()));
        Ok(())
    }

    fn is_app_running(&self) -> bool {
        self.running
    }

    fn spawn_vault(&self, _vault_path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no executable in tests"))
    }
}

struct FixedVaults(Vec<VaultRecord>);

impl VaultSource for FixedVaults {
    fn discover(&self) -> Vec<VaultRecord> {
        self.0.clone()
    }
}

fn settings() -> Settings {
    Settings {
        home_dir: None,
        app_config_path: None,
        ..Settings::default()
    }
}

fn make_vault(dir: &Path, name: &str) -> VaultRecord {
    let root = dir.join(name);
    fs::create_dir_all(root.join(".obsidian")).unwrap();
    VaultRecord::new(&root, ".obsidian")
}

fn plugin(vaults: Vec<VaultRecord>) -> Plugin<RecordingLauncher, FixedVaults> {
    Plugin::new(settings(), FixedVaults(vaults), RecordingLauncher::default())
}

fn titles(rows: &[DisplayResult]) -> Vec<&str> {
    rows.iter().map(|r| r.title.as_str()).collect()
}

#[test]
fn unknown_method_becomes_error_row() {
    let mut plugin = plugin(Vec::new());
    let response = plugin.handle_raw(Some(r#"{"method": "find_vaults", "parameters": []}"#));

    assert_eq!(response.result.len(), 1);
    assert_eq!(response.result[0].title, "Obsidian Plugin Error");
    assert!(response.result[0].subtitle.contains("find_vaults"));

    let response = plugin.handle_raw(Some("{broken"));
    assert_eq!(response.result[0].title, "Obsidian Plugin Error");
}

#[test]
fn home_screen_lists_vaults() {
    let tmpdir = TempDir::new().unwrap();
    let mut work = make_vault(tmpdir.path(), "Work");
    work.note_count = 12;
    let mut plugin = plugin(vec![work.clone()]);

    let rows = plugin.handle_raw(None).result;

    assert_eq!(
        titles(&rows),
        vec!["📔 Obsidian Notes (🔴 Not Running)", "📁 Open Vaults", "📁 Work"]
    );
    assert_eq!(rows[0].subtitle, "1 vault found • Click to see commands");
    assert_eq!(rows[2].subtitle, format!("12 notes • {}", work.root_path.display()));
    let action = rows[2].action.as_ref().unwrap();
    assert_eq!(action.method, "open_vault");
    assert_eq!(action.parameters, vec![work.root_path.display().to_string()]);
}

#[test]
fn search_command_returns_hits_with_open_action() {
    let tmpdir = TempDir::new().unwrap();
    let vault = make_vault(tmpdir.path(), "Notes");
    fs::write(vault.root_path.join("rust.md"), "ownership and borrowing").unwrap();
    fs::write(vault.root_path.join("go.md"), "goroutines").unwrap();
    let mut plugin = plugin(vec![vault.clone()]);

    let rows = plugin.handle(Action::Query("search borrowing".into()));

    assert_eq!(titles(&rows), vec!["📝 rust"]);
    assert!(rows[0].subtitle.starts_with("📁 Notes • "));
    assert!(rows[0].subtitle.ends_with(" • ownership and borrowing"));
    let action = rows[0].action.as_ref().unwrap();
    assert_eq!(action.method, "open_note");
    assert_eq!(action.parameters, vec![vault.root_path.join("rust.md").display().to_string()]);

    let rows = plugin.handle(Action::Query("search nothing-matches".into()));
    assert_eq!(titles(&rows), vec!["🔍 No results for 'nothing-matches'"]);

    let rows = plugin.handle(Action::Query("search".into()));
    assert_eq!(titles(&rows), vec!["🔍 Search Notes"]);
}

#[test]
fn free_text_searches_every_vault() {
    let tmpdir = TempDir::new().unwrap();
    let first = make_vault(tmpdir.path(), "First");
    let second = make_vault(tmpdir.path(), "Second");
    for i in 0..4 {
        fs::write(first.root_path.join(format!("plan {i}.md")), "x").unwrap();
    }
    fs::write(second.root_path.join("other.md"), "the plan").unwrap();
    let mut plugin = plugin(vec![first, second]);

    let rows = plugin.handle(Action::Query("plan".into()));

    assert_eq!(rows.len(), 4);
    assert!(rows[..3].iter().all(|r| r.subtitle.starts_with("📁 First")));
    assert_eq!(rows[3].title, "📝 other");
}

#[test]
fn new_note_is_created_in_first_vault() {
    let tmpdir = TempDir::new().unwrap();
    let vault = make_vault(tmpdir.path(), "Inbox");
    let mut plugin = plugin(vec![vault.clone()]);

    let rows = plugin.handle(Action::Query("new Call: plumber".into()));

    assert_eq!(titles(&rows), vec!["✅ Note Created: Call: plumber"]);
    assert_eq!(rows[0].subtitle, "📁 Inbox/Call_ plumber.md");
    let created = vault.root_path.join("Call_ plumber.md");
    assert!(fs::read_to_string(created).unwrap().starts_with("# Call: plumber"));
}

#[test]
fn daily_with_one_vault_creates_note() {
    let tmpdir = TempDir::new().unwrap();
    let vault = make_vault(tmpdir.path(), "Journal");
    let mut plugin = plugin(vec![vault.clone()]);

    let rows = plugin.handle(Action::Query("daily Standup".into()));

    assert_eq!(titles(&rows), vec!["✅ Daily Note Created"]);
    assert!(vault.root_path.join("Daily").join("Standup.md").is_file());

    let rows = plugin.handle(Action::Query("daily Standup".into()));
    assert_eq!(titles(&rows), vec!["📅 Daily Note"]);
}

#[test]
fn daily_with_several_vaults_offers_a_choice() {
    let tmpdir = TempDir::new().unwrap();
    let a = make_vault(tmpdir.path(), "A");
    let b = make_vault(tmpdir.path(), "B");
    let mut plugin = plugin(vec![a.clone(), b]);

    let rows = plugin.handle(Action::Query("daily".into()));

    assert_eq!(titles(&rows), vec!["📅 Create Daily Note In:", "📝 A", "📝 B"]);
    let action = rows[1].action.clone().unwrap();
    assert_eq!(action.method, "create_daily_note_in_vault");

    let rows = plugin.handle(Action::CreateDailyNote {
        vault_path: PathBuf::from(&action.parameters[0]),
        title: Some("Kickoff".into()),
    });
    assert_eq!(titles(&rows), vec!["✅ Daily Note Created in A"]);
    assert!(rows[0].subtitle.ends_with(" - Opened in Obsidian"));
    assert!(a.root_path.join("Daily").join("Kickoff.md").is_file());
    assert_eq!(
        plugin.launcher().opened.borrow().as_slice(),
        ["obsidian://open?vault=A&file=Daily%2FKickoff.md"]
    );
}

#[test]
fn no_vaults_is_an_informational_row() {
    let mut plugin = plugin(Vec::new());

    assert_eq!(titles(&plugin.handle(Action::Query("daily".into()))), vec!["❌ No vaults found"]);
    assert_eq!(titles(&plugin.handle(Action::Query("recent".into()))), vec!["❌ No vaults found"]);
    assert_eq!(titles(&plugin.handle(Action::Query("anything".into()))), vec!["❌ No vaults found"]);
}

#[test]
fn vault_lookup_by_partial_name() {
    let tmpdir = TempDir::new().unwrap();
    let vault = make_vault(tmpdir.path(), "Personal Wiki");
    let mut plugin = plugin(vec![vault]);

    let rows = plugin.handle(Action::Query("vault wiki".into()));
    assert_eq!(titles(&rows), vec!["📁 Open Personal Wiki"]);

    let rows = plugin.handle(Action::Query("vault work".into()));
    assert_eq!(titles(&rows), vec!["❌ Vault not found: work"]);
}

#[test]
fn open_note_uses_vault_uri_or_falls_back_to_file() {
    let tmpdir = TempDir::new().unwrap();
    let vault = make_vault(tmpdir.path(), "v");
    let note = vault.root_path.join("notes").join("a.md");
    let stray = tmpdir.path().join("elsewhere.md");
    let mut plugin = plugin(vec![vault]);

    let rows = plugin.handle(Action::OpenNote(note));
    assert_eq!(titles(&rows), vec!["✅ Note Opened"]);
    assert_eq!(rows[0].subtitle, "a.md");

    plugin.handle(Action::OpenNote(stray.clone()));

    assert_eq!(
        plugin.launcher().opened.borrow().as_slice(),
        [
            "obsidian://open?vault=v&file=notes%2Fa.md".to_string(),
            format!("file:{}", stray.display()),
        ]
    );
}

#[test]
fn open_vault_prefers_registered_id() {
    let tmpdir = TempDir::new().unwrap();
    let mut vault = make_vault(tmpdir.path(), "Team Notes");
    vault.registered_id = Some("0a1b2c".to_string());
    let mut plugin = plugin(vec![vault.clone()]);

    let rows = plugin.handle(Action::OpenVault(vault.root_path.clone()));
    assert_eq!(titles(&rows), vec!["✅ Opened Vault: Team Notes"]);
    assert_eq!(
        plugin.launcher().opened.borrow().as_slice(),
        ["obsidian://open?vault=0a1b2c"]
    );

    let rows = plugin.handle(Action::OpenVault(tmpdir.path().join("unknown")));
    assert_eq!(titles(&rows), vec!["❌ Failed to open vault: unknown"]);
}

#[test]
fn unregistered_vault_starts_obsidian_first() {
    let tmpdir = TempDir::new().unwrap();
    let vault = make_vault(tmpdir.path(), "Local Vault");
    let mut plugin = plugin(vec![vault.clone()]);

    plugin.handle(Action::OpenVault(vault.root_path.clone()));

    assert_eq!(
        plugin.launcher().opened.borrow().as_slice(),
        ["obsidian://open", "obsidian://open?vault=Local%20Vault"]
    );
}

#[test]
fn help_and_execute_command() {
    let tmpdir = TempDir::new().unwrap();
    let vault = make_vault(tmpdir.path(), "Only");
    let mut plugin = plugin(vec![vault]);

    let rows = plugin.handle(Action::Query("help".into()));
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0].title, "📁 obs vaults");
    assert_eq!(rows[0].action.as_ref().unwrap().method, "execute_command");

    let rows = plugin.handle(Action::ExecuteCommand("vaults".into()));
    assert_eq!(titles(&rows), vec!["📁 Only"]);

    let rows = plugin.handle(Action::ExecuteCommand("launch_obsidian".into()));
    assert_eq!(titles(&rows), vec!["✅ Obsidian Launched"]);
}
