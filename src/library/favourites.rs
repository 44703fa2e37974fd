// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{SavedChannel, read_list, write_list};
use crate::channel::{ChannelKey, ListedChannel};

/// Favourite channels in the order they were added.
#[derive(Debug, Clone)]
pub struct FavouritesStore {
    path: PathBuf,
}

impl FavouritesStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("favourites.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> Result<Vec<SavedChannel>> {
        read_list(&self.path)
    }

    pub fn contains(&self, key: &ChannelKey) -> Result<bool> {
        Ok(self.entries()?.iter().any(|e| &e.channel.key() == key))
    }

    /// Returns false if the channel was already a favourite.
    pub fn add(&self, channel: &ListedChannel) -> Result<bool> {
        let mut entries = self.entries()?;
        let key = channel.key();

        if entries.iter().any(|e| e.channel.key() == key) {
            return Ok(false);
        }

        entries.push(SavedChannel::now(channel.clone()));
        write_list(&self.path, entries)?;
        Ok(true)
    }

    /// Returns false if nothing matched.
    pub fn remove(&self, key: &ChannelKey) -> Result<bool> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|e| &e.channel.key() != key);

        if entries.len() == before {
            return Ok(false);
        }

        write_list(&self.path, entries)?;
        Ok(true)
    }

    /// Adds or removes the channel; returns whether it is now a favourite.
    pub fn toggle(&self, channel: &ListedChannel) -> Result<bool> {
        if self.remove(&channel.key())? {
            Ok(false)
        } else {
            self.add(channel)
        }
    }
}
