use serde::Serialize;
use std::path::Path;

/// Top-level JSON-RPC response printed for the launcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    pub result: Vec<DisplayResult>,
}

/// One row in the launcher's result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayResult {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "SubTitle")]
    pub subtitle: String,
    #[serde(rename = "IcoPath")]
    pub icon: String,
    /// Call the launcher makes back into the plugin when the row is chosen.
    #[serde(rename = "JsonRPCAction", skip_serializing_if = "Option::is_none")]
    pub action: Option<RpcAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcAction {
    pub method: String,
    pub parameters: Vec<String>,
}

impl DisplayResult {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, icon: &str) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            icon: icon.to_string(),
            action: None,
        }
    }

    pub fn with_action(mut self, method: &str, parameters: Vec<String>) -> Self {
        self.action = Some(RpcAction {
            method: method.to_string(),
            parameters,
        });
        self
    }

    /// Attaches `method` with `path` as its only parameter.
    pub fn with_path_action(self, method: &str, path: &Path) -> Self {
        self.with_path_params(method, path, Vec::new())
    }

    /// Attaches `method` with `path` followed by `rest`.
    ///
    /// The launcher hands parameters back as JSON strings, so a path that is
    /// not valid UTF-8 could not be matched again; such rows get no action.
    pub fn with_path_params(self, method: &str, path: &Path, rest: Vec<String>) -> Self {
        let Some(path) = path.to_str() else {
            tracing::warn!("{} is not valid UTF-8, leaving row without action", path.display());
            return self;
        };

        let mut parameters = vec![path.to_string()];
        parameters.extend(rest);
        self.with_action(method, parameters)
    }
}
