// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use tracing::{info, warn};

use crate::channel::{Channel, ListedChannel, StreamKind};
use crate::config::PlayerConfig;
use crate::library::HistoryStore;

/// Launches the configured external player on a stream URL.
#[derive(Debug, Clone)]
pub struct Player {
    config: PlayerConfig,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }

    pub fn command_name(&self) -> &str {
        &self.config.command
    }

    /// Configured args, then the YouTube args for YouTube streams, then
    /// the URL.
    fn command(&self, channel: &Channel) -> Command {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args);
        if channel.stream_kind() == StreamKind::YouTube {
            cmd.args(&self.config.youtube_args);
        }
        cmd.arg(&channel.url);
        cmd
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.config.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Plays in the foreground and waits for the player to exit.
    pub async fn play_blocking(&self, channel: &Channel) -> Result<()> {
        let mut cmd = self.command(channel);
        let command = self.config.command.clone();

        let status = tokio::task::spawn_blocking(move || cmd.status())
            .await
            .with_context(|| "Failed to spawn blocking task")?
            .with_context(|| format!("Failed to execute player command: {}", command))?;

        if !status.success() {
            anyhow::bail!("Player process failed with exit code: {}", status);
        }

        Ok(())
    }

    /// Starts the player with no terminal attached and returns immediately.
    pub fn play_detached(&self, channel: &Channel) -> Result<()> {
        let mut cmd = self.command(channel);
        cmd.stdout(Stdio::null())
            .stderr(Stdio::null())
            .stdin(Stdio::null());

        cmd.spawn().with_context(|| {
            format!(
                "Failed to start player in background: {}",
                self.config.command
            )
        })?;

        Ok(())
    }

    /// Plays a listed channel and records it in history. A history write
    /// failure does not stop playback.
    pub async fn play_channel(
        &self,
        channel: &ListedChannel,
        history: &HistoryStore,
        detached: bool,
    ) -> Result<()> {
        if let Err(e) = history.record(channel) {
            warn!("Could not record {} in history: {:#}", channel, e);
        }

        info!(
            "Starting playback of: {} ({})",
            channel,
            channel.channel.stream_kind()
        );

        if detached {
            self.play_detached(&channel.channel)
        } else {
            self.play_blocking(&channel.channel).await
        }
    }
}
