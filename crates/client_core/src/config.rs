use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::warn;
use url::Url;

pub const DEFAULT_GRAPHQL_URL: &str = "https://localhost:7174/graphql";
pub const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub graphql_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.into(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match raw.parse::<toml::Table>() {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("graphql_url").and_then(|v| v.as_str()) {
                    settings.graphql_url = v.to_string();
                }
                if let Some(v) = file_cfg
                    .get("request_timeout_secs")
                    .and_then(|v| v.as_integer())
                {
                    if let Ok(secs) = u64::try_from(v) {
                        settings.request_timeout_secs = secs;
                    }
                }
            }
            Err(err) => warn!(path = %path.display(), "ignoring unreadable settings file: {err}"),
        }
    }

    if let Some(v) = env("GRAPHQL_URL") {
        settings.graphql_url = v;
    }
    if let Some(v) = env("APP__GRAPHQL_URL") {
        settings.graphql_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

pub fn normalize_graphql_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_GRAPHQL_URL.to_string());
    }

    let url = Url::parse(raw).with_context(|| format!("invalid graphql url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("graphql url '{raw}' must use http or https");
    }
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
