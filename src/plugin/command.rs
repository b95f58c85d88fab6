use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::error::{ObsError, ObsResult};

/// Raw request as sent by the launcher.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub parameters: Value,
}

/// Every method the launcher may call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Query(String),
    ShowCommands,
    ShowVaults,
    ExecuteCommand(String),
    OpenVault(PathBuf),
    OpenNote(PathBuf),
    CreateDailyNote {
        vault_path: PathBuf,
        title: Option<String>,
    },
    LaunchApp,
}

impl Action {
    /// Maps a request onto an action. Unknown methods are rejected.
    pub fn from_request(request: Request) -> ObsResult<Action> {
        let params = parameter_list(&request.parameters);
        let first = || params.first().cloned();

        let action = match request.method.as_str() {
            "query" => Action::Query(params.join(" ").trim().to_string()),
            "show_commands" => Action::ShowCommands,
            "show_vaults" => Action::ShowVaults,
            "execute_command" => Action::ExecuteCommand(first().unwrap_or_default()),
            "open_vault" => Action::OpenVault(
                first().map(PathBuf::from).ok_or(ObsError::MissingParameter("vault path"))?,
            ),
            "open_note" => Action::OpenNote(
                first().map(PathBuf::from).ok_or(ObsError::MissingParameter("note path"))?,
            ),
            "create_daily_note_in_vault" => Action::CreateDailyNote {
                vault_path: first()
                    .map(PathBuf::from)
                    .ok_or(ObsError::MissingParameter("vault path"))?,
                title: params.get(1).filter(|t| !t.trim().is_empty()).cloned(),
            },
            "launch_obsidian" => Action::LaunchApp,
            other => return Err(ObsError::UnknownMethod(other.to_string())),
        };

        Ok(action)
    }

    /// Parses the raw JSON request string.
    pub fn parse(raw: &str) -> ObsResult<Action> {
        let request: Request = serde_json::from_str(raw)?;
        Self::from_request(request)
    }
}

/// Flattens `parameters` (array, string or null) into strings.
fn parameter_list(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        other => vec![other.to_string()],
    }
}

/// A query typed into the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Nothing typed yet.
    Home,
    Vaults,
    Search { query: String },
    New { title: String },
    Daily { title: Option<String> },
    Vault { name: String },
    Open,
    Recent,
    Help,
    /// Anything not starting with a command word is searched across vaults.
    FreeText { query: String },
}

impl Command {
    /// Command words in the order they are listed by `help`.
    pub const NAMES: [&'static str; 8] =
        ["vaults", "search", "new", "daily", "recent", "vault", "open", "help"];

    pub fn parse(text: &str) -> Command {
        let mut words = text.split_whitespace();
        let Some(first) = words.next() else {
            return Command::Home;
        };
        let args = words.collect::<Vec<_>>().join(" ");

        match first.to_lowercase().as_str() {
            "vaults" => Command::Vaults,
            "search" => Command::Search { query: args },
            "new" => Command::New { title: args },
            "daily" => Command::Daily {
                title: (!args.is_empty()).then_some(args),
            },
            "vault" => Command::Vault { name: args },
            "open" => Command::Open,
            "recent" => Command::Recent,
            "help" => Command::Help,
            _ => Command::FreeText {
                query: text.split_whitespace().collect::<Vec<_>>().join(" "),
            },
        }
    }
}
