// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

//! Client-local channel collections kept next to the config file.

pub mod favourites;
pub mod history;

pub use favourites::FavouritesStore;
pub use history::{HistoryStore, MAX_HISTORY};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::channel::ListedChannel;
use crate::config::Config;
use crate::taxonomy::{FAVORITES, HISTORY};

/// A channel remembered by the user, with the time it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedChannel {
    pub channel: ListedChannel,
    pub saved_at: DateTime<Utc>,
}

impl SavedChannel {
    pub fn now(channel: ListedChannel) -> Self {
        Self {
            channel,
            saved_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChannelList {
    channels: Vec<SavedChannel>,
}

fn read_list(path: &Path) -> Result<Vec<SavedChannel>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let list: ChannelList = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(list.channels)
}

fn write_list(path: &Path, channels: Vec<SavedChannel>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(&ChannelList { channels })
        .with_context(|| "Failed to serialize channel list")?;

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// The pseudo-categories answered from local storage instead of the
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    History,
    Favourites,
}

impl Collection {
    pub fn for_category(category: &str) -> Option<Self> {
        match category {
            HISTORY => Some(Self::History),
            FAVORITES => Some(Self::Favourites),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Library {
    pub history: HistoryStore,
    pub favourites: FavouritesStore,
}

impl Library {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            history: HistoryStore::new(&dir),
            favourites: FavouritesStore::new(&dir),
        }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::open(Config::ensure_config_dir()?))
    }

    /// Channels of a local collection. An unreadable file reads as empty so
    /// browsing keeps working.
    pub fn channels(&self, collection: Collection) -> Vec<ListedChannel> {
        let entries = match collection {
            Collection::History => self.history.entries(),
            Collection::Favourites => self.favourites.entries(),
        };

        match entries {
            Ok(entries) => entries.into_iter().map(|e| e.channel).collect(),
            Err(e) => {
                warn!("Ignoring unreadable {:?} collection: {:#}", collection, e);
                Vec::new()
            }
        }
    }
}
