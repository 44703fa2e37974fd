// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::pagination::{DEFAULT_PAGE_SIZE, PageRequest};

const APP_DIR: &str = "sora-tv";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub player: PlayerConfig,
    /// Keyword overrides, `id = ["keyword", ...]`.
    pub categories: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub catalog: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub page_size: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Added before the URL when the stream is a YouTube page.
    pub youtube_args: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            catalog: PathBuf::from("channels.json"),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn page_size(&self) -> usize {
        PageRequest::new(0, self.page_size).page_size
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: "mpv".to_string(),
            args: vec!["--force-window=yes".to_string(), "--quiet".to_string()],
            youtube_args: vec!["--ytdl=yes".to_string(), "--ytdl-format=best".to_string()],
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Missing file means defaults; a broken one is reported and ignored.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Config {
        if !path.as_ref().exists() {
            return Self::default();
        }

        Self::load(&path).unwrap_or_else(|e| {
            warn!("Could not load config file, using defaults: {:#}", e);
            Self::default()
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Writes a default config to `path`. An existing file is left alone
    /// unless `overwrite` is set, in which case it is first copied to
    /// `<path>.backup`. Returns whether a file was written.
    pub fn write_default<P: AsRef<Path>>(path: P, overwrite: bool) -> Result<bool> {
        let path = path.as_ref();

        if path.exists() {
            if !overwrite {
                return Ok(false);
            }
            let backup = path.with_extension("toml.backup");
            fs::copy(path, &backup)
                .with_context(|| format!("Failed to back up config to: {}", backup.display()))?;
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        Self::default().save(path)?;
        Ok(true)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn ensure_config_dir() -> Result<PathBuf> {
        let dir = Self::config_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }
        Ok(dir)
    }
}
