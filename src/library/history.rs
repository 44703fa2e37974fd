// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{SavedChannel, read_list, write_list};
use crate::channel::ListedChannel;

pub const MAX_HISTORY: usize = 20;

/// Recently played channels, most recent first.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("history.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> Result<Vec<SavedChannel>> {
        read_list(&self.path)
    }

    pub fn record(&self, channel: &ListedChannel) -> Result<()> {
        let mut entries = self.entries()?;
        push_recent(&mut entries, SavedChannel::now(channel.clone()), MAX_HISTORY);
        debug!("Recorded {} in history ({} entries)", channel, entries.len());
        write_list(&self.path, entries)
    }

    pub fn clear(&self) -> Result<()> {
        write_list(&self.path, Vec::new())
    }
}

/// Moves `entry` to the front, dropping an older entry with the same name
/// and country, and keeps at most `max` entries.
pub fn push_recent(entries: &mut Vec<SavedChannel>, entry: SavedChannel, max: usize) {
    entries.retain(|e| {
        !(e.channel.channel.name == entry.channel.channel.name
            && e.channel.country_name == entry.channel.country_name)
    });
    entries.insert(0, entry);
    entries.truncate(max);
}
