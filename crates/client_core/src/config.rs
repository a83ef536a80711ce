use std::{collections::HashMap, fs, path::Path};

use url::Url;

use crate::{error::ClientError, gateway::DEFAULT_API_BASE_URL};

pub const CONFIG_FILE: &str = "client.toml";
pub const API_URL_ENV: &str = "PITCH_REVIEW_API_URL";
pub const SESSION_DB_ENV: &str = "PITCH_REVIEW_SESSION_DB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_db_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            session_db_url: default_session_db_url(),
        }
    }
}

/// `sqlite://<data dir>/pitch-review/session.db`, or a relative path when
/// the platform has no data directory.
pub fn default_session_db_url() -> String {
    let path = dirs::data_dir()
        .map(|dir| dir.join("pitch-review").join("session.db"))
        .unwrap_or_else(|| Path::new("./data/session.db").to_path_buf());
    format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"))
}

/// Defaults, then `client.toml` in the working directory, then environment.
pub fn load_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    if let Ok(raw) = fs::read_to_string(CONFIG_FILE) {
        config.apply_file(&raw);
    }
    config.apply_env(|key| std::env::var(key).ok());
    config
}

impl ClientConfig {
    /// Unknown keys are ignored, as is a file that does not parse.
    pub fn apply_file(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
            return;
        };
        if let Some(v) = file_cfg.get("api_base_url") {
            self.api_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("session_db_url") {
            self.session_db_url = normalize_session_db_url(v);
        }
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup(API_URL_ENV) {
            self.api_base_url = v;
        }
        if let Some(v) = lookup(SESSION_DB_ENV) {
            self.session_db_url = normalize_session_db_url(&v);
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let parsed = Url::parse(&self.api_base_url).map_err(|e| {
            ClientError::Config(format!("invalid api base url '{}': {e}", self.api_base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "api base url must be http or https: '{}'",
                self.api_base_url
            )));
        }
        if self.session_db_url.trim().is_empty() {
            return Err(ClientError::Config("session database url is empty".into()));
        }
        Ok(())
    }
}

/// Accepts either a sqlite url or a plain file path.
pub fn normalize_session_db_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return default_session_db_url();
    }
    if raw.starts_with("sqlite:") {
        return raw.to_string();
    }
    format!("sqlite://{}", raw.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
