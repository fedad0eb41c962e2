// SPDX-License-Identifier: MPL-2.0

use crate::config::APP_ID;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to access settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How sibling replies are ordered in a thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThreadSort {
    Oldest,
    #[default]
    Newest,
    MostLikes,
    /// Shuffled on every sort. Never stable.
    Random,
    /// A value this client doesn't know; ordered newest first.
    Other,
}

impl ThreadSort {
    pub fn as_str(self) -> &'static str {
        match self {
            ThreadSort::Oldest => "oldest",
            ThreadSort::Newest => "newest",
            ThreadSort::MostLikes => "most-likes",
            ThreadSort::Random => "random",
            ThreadSort::Other => "other",
        }
    }
}

impl From<String> for ThreadSort {
    fn from(value: String) -> Self {
        match value.as_str() {
            "oldest" => ThreadSort::Oldest,
            "newest" => ThreadSort::Newest,
            "most-likes" => ThreadSort::MostLikes,
            "random" => ThreadSort::Random,
            _ => ThreadSort::Other,
        }
    }
}

impl From<ThreadSort> for String {
    fn from(sort: ThreadSort) -> Self {
        sort.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadViewPrefs {
    #[serde(default)]
    pub sort: ThreadSort,
    #[serde(default = "default_prioritize_followed_users")]
    pub prioritize_followed_users: bool,
}

fn default_prioritize_followed_users() -> bool {
    true
}

impl Default for ThreadViewPrefs {
    fn default() -> Self {
        Self {
            sort: ThreadSort::default(),
            prioritize_followed_users: default_prioritize_followed_users(),
        }
    }
}

/// Persistent application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub thread_view: ThreadViewPrefs,
}

impl AppSettings {
    /// ~/.config/io.github.sethcottle.Hangar/settings.json
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_ID);
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        Ok(())
    }
}
