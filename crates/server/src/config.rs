use std::{collections::HashMap, fs, net::SocketAddr, path::PathBuf};

use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub dist_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            dist_dir: PathBuf::from("./dist"),
        }
    }
}

impl Settings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.bind_addr))
    }

    pub fn index_file(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string("server.toml").ok();
    settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then `server.toml` contents, then `APP__*` variables.
pub fn settings_from(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.bind_addr = v.clone();
            }
            if let Some(v) = file_cfg.get("dist_dir") {
                settings.dist_dir = PathBuf::from(v);
            }
        }
    }

    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__DIST_DIR") {
        settings.dist_dir = PathBuf::from(v);
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
