//! Handing vaults and notes over to the Obsidian application.
//!
//! Everything goes through `obsidian://` URIs when possible. The [`Launcher`]
//! trait is the seam to the operating system so dispatch logic can be tested
//! without starting anything.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use crate::vault::VaultRecord;

/// URI that just brings Obsidian to the front.
pub const APP_URI: &str = "obsidian://open";

/// How long to wait for a cold-started Obsidian before handing it a vault.
const STARTUP_GRACE: Duration = Duration::from_secs(2);

/// Operating-system primitives used to reach Obsidian.
pub trait Launcher {
    /// Opens a URI with the system handler.
    fn open_uri(&self, uri: &str) -> io::Result<()>;
    /// Opens a file with its default application.
    fn open_path(&self, path: &Path) -> io::Result<()>;
    fn is_app_running(&self) -> bool;
    /// Starts the Obsidian executable on a vault directory.
    fn spawn_vault(&self, vault_path: &Path) -> io::Result<()>;
    /// Waits for a freshly started Obsidian to accept URIs.
    fn wait_for_startup(&self) {}
}

/// [`Launcher`] backed by the real operating system.
#[derive(Debug, Clone, Default)]
pub struct SystemLauncher {
    executable: Option<PathBuf>,
}

impl SystemLauncher {
    pub fn new() -> Self {
        Self {
            executable: find_app_executable(),
        }
    }
}

impl Launcher for SystemLauncher {
    fn open_uri(&self, uri: &str) -> io::Result<()> {
        tracing::debug!("opening {uri}");
        open::that_detached(uri)
    }

    fn open_path(&self, path: &Path) -> io::Result<()> {
        tracing::debug!("opening {} with the default handler", path.display());
        open::that_detached(path)
    }

    fn is_app_running(&self) -> bool {
        let probe = if cfg!(windows) {
            Command::new("tasklist")
                .args(["/FI", "IMAGENAME eq Obsidian.exe", "/NH"])
                .output()
                .map(|out| String::from_utf8_lossy(&out.stdout).contains("Obsidian.exe"))
        } else if cfg!(target_os = "macos") {
            Command::new("pgrep")
                .args(["-x", "Obsidian"])
                .stdout(Stdio::null())
                .status()
                .map(|s| s.success())
        } else {
            Command::new("pidof")
                .arg("obsidian")
                .stdout(Stdio::null())
                .status()
                .map(|s| s.success())
        };

        probe.unwrap_or_else(|e| {
            tracing::debug!("could not check whether Obsidian is running: {e}");
            false
        })
    }

    fn spawn_vault(&self, vault_path: &Path) -> io::Result<()> {
        let exe = self
            .executable
            .as_ref()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Obsidian executable not found")
            })?;

        Command::new(exe)
            .arg("--path")
            .arg(vault_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }

    fn wait_for_startup(&self) {
        thread::sleep(STARTUP_GRACE);
    }
}

/// Locates the Obsidian executable for the current platform.
pub fn find_app_executable() -> Option<PathBuf> {
    let candidates: Vec<PathBuf> = if cfg!(windows) {
        let mut dirs: Vec<PathBuf> = ["LOCALAPPDATA", "PROGRAMFILES", "PROGRAMFILES(X86)"]
            .iter()
            .filter_map(|var| std::env::var_os(var).map(PathBuf::from))
            .collect();
        dirs.push(PathBuf::from(r"C:\Program Files"));
        dirs.push(PathBuf::from(r"C:\Program Files (x86)"));
        dirs.into_iter()
            .map(|d| d.join("Obsidian").join("Obsidian.exe"))
            .collect()
    } else if cfg!(target_os = "macos") {
        vec![PathBuf::from("/Applications/Obsidian.app/Contents/MacOS/Obsidian")]
    } else {
        vec![PathBuf::from("/usr/bin/obsidian")]
    };

    candidates.into_iter().find(|p| p.exists())
}

/// `obsidian://open?vault=...` for a vault.
pub fn vault_uri(vault: &VaultRecord) -> String {
    format!("{APP_URI}?vault={}", urlencoding::encode(vault.uri_target()))
}

/// `obsidian://open?vault=...&file=...` for a note inside `vault`.
pub fn note_uri(vault: &VaultRecord, relative_path: &Path) -> String {
    format!(
        "{}&file={}",
        vault_uri(vault),
        urlencoding::encode(&uri_path(relative_path))
    )
}

/// Joins path components with `/` whatever the platform separator is.
fn uri_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Opens `vault` in Obsidian.
///
/// Registered vaults are opened by id. Others need Obsidian running first;
/// on Windows the executable is asked to open the path directly, otherwise
/// (or if that fails) the vault is opened by name.
pub fn open_vault(launcher: &impl Launcher, vault: &VaultRecord) -> io::Result<()> {
    if vault.is_registered() {
        return launcher.open_uri(&vault_uri(vault));
    }

    if !launcher.is_app_running() {
        launcher.open_uri(APP_URI)?;
        launcher.wait_for_startup();
    }

    if cfg!(windows) {
        match launcher.spawn_vault(&vault.root_path) {
            Ok(()) => return Ok(()),
            Err(e) => tracing::debug!("direct launch failed, falling back to URI: {e}"),
        }
    }

    launcher.open_uri(&vault_uri(vault))
}

/// Opens the note at `note_path`.
///
/// Uses an `obsidian://` URI when the note belongs to one of `vaults`,
/// otherwise the system's default handler for the file.
pub fn open_note(
    launcher: &impl Launcher,
    vaults: &[VaultRecord],
    note_path: &Path,
) -> io::Result<()> {
    let owner = vaults.iter().find(|v| v.contains(note_path));

    match owner {
        Some(vault) => {
            let relative = note_path.strip_prefix(&vault.root_path).unwrap_or(note_path);
            launcher.open_uri(&note_uri(vault, relative))
        }
        None => launcher.open_path(note_path),
    }
}
