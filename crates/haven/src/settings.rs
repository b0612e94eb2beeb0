use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use haven_platform::AppPaths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,

    #[serde(default = "default_phrase_word_count")]
    pub phrase_word_count: usize,

    #[serde(default = "default_challenge_size")]
    pub challenge_size: usize,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

impl ClientSettings {
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            debug_logging: false,
            fetch_timeout_secs: default_fetch_timeout(),
            upload_timeout_secs: default_upload_timeout(),
            phrase_word_count: default_phrase_word_count(),
            challenge_size: default_challenge_size(),
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.haven.app".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_upload_timeout() -> u64 {
    120
}

fn default_phrase_word_count() -> usize {
    12
}

fn default_challenge_size() -> usize {
    3
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

/// Read settings from disk; a missing or malformed file yields defaults.
#[must_use]
pub fn load(paths: &AppPaths) -> ClientSettings {
    load_from(&paths.settings_file())
}

fn load_from(path: &Path) -> ClientSettings {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(error) => {
                log::warn!("Ignoring malformed settings file: {error}");
                ClientSettings::default()
            }
        },
        Err(_) => ClientSettings::default(),
    }
}

/// Persist settings as pretty-printed JSON.
///
/// # Errors
/// Returns an error when the settings directory cannot be created or the
/// file cannot be written.
pub fn save(paths: &AppPaths, settings: &ClientSettings) -> io::Result<()> {
    paths.ensure_dirs()?;
    save_to(&paths.settings_file(), settings)
}

fn save_to(path: &Path, settings: &ClientSettings) -> io::Result<()> {
    let json = serde_json::to_string_pretty(settings).map_err(io::Error::other)?;
    std::fs::write(path, json)
}
