// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use sora_tv::{
    CatalogStore, ChannelDirectory, ChannelSource, Classifier, Config, DirectoryClient, Library,
    ListedChannel, Player, QueryEngine, StreamKind, Taxonomy,
};

pub mod browse;
pub mod channels;
pub mod directory;
pub mod library;

pub use browse::BrowseCommand;
pub use channels::ChannelsCommand;
pub use directory::{CategoriesCommand, CountriesCommand, RandomCommand};
pub use library::{FavouritesCommand, HistoryCommand};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    M3u,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "m3u" => Ok(Self::M3u),
            _ => anyhow::bail!("Invalid format: {}. Use 'text', 'json', or 'm3u'", s),
        }
    }
}

/// Prints a channel listing in the requested format.
pub fn print_channels(channels: &[ListedChannel], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(channels)?);
        }
        OutputFormat::Text => {
            if channels.is_empty() {
                println!("No channels found");
            }
            for (index, channel) in channels.iter().enumerate() {
                println!("{}", text_row(index + 1, channel));
            }
        }
        OutputFormat::M3u => {
            println!("#EXTM3U");
            for channel in channels {
                println!("{}", m3u_entry(channel));
            }
        }
    }

    Ok(())
}

fn text_row(number: usize, listed: &ListedChannel) -> String {
    let category = listed.channel.category.as_deref().unwrap_or("-");
    match listed.channel.stream_kind() {
        StreamKind::YouTube => format!("{:4} | {} [{}, youtube]", number, listed, category),
        StreamKind::Live => format!("{:4} | {} [{}]", number, listed, category),
    }
}

pub fn m3u_entry(listed: &ListedChannel) -> String {
    let channel = &listed.channel;
    let mut attrs = format!("tvg-name=\"{}\"", channel.name.replace('"', "'"));
    if let Some(lang) = channel.detect_language() {
        attrs.push_str(&format!(" tvg-language=\"{}\"", lang));
    }
    if let Some(group) = listed
        .country_name
        .as_deref()
        .or(channel.category.as_deref())
    {
        attrs.push_str(&format!(" group-title=\"{}\"", group.replace('"', "'")));
    }

    format!("#EXTINF:-1 {},{}\n{}", attrs, channel.name, channel.url)
}

/// Spinner shown on stderr while `fut` runs.
pub async fn with_spinner<F, T>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = fut.await;
    pb.finish_and_clear();
    result
}

/// Where commands get their channels from, plus the local pieces they share.
pub struct CommandContext {
    pub config: Config,
    pub catalog: Option<PathBuf>,
    pub server: Option<String>,
    pub page_size: Option<usize>,
}

impl CommandContext {
    pub fn new(
        config: Config,
        catalog: Option<PathBuf>,
        server: Option<String>,
        page_size: Option<usize>,
    ) -> Self {
        Self {
            config,
            catalog,
            server,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        match self.page_size {
            Some(size) => sora_tv::PageRequest::new(0, size).page_size,
            None => self.config.client.page_size(),
        }
    }

    pub fn taxonomy(&self) -> Arc<Taxonomy> {
        Arc::new(Taxonomy::builtin().with_overrides(&self.config.categories))
    }

    /// The in-process directory over the configured catalog file.
    pub fn local_directory(&self) -> ChannelDirectory {
        let path = self
            .catalog
            .clone()
            .unwrap_or_else(|| self.config.server.catalog.clone());

        ChannelDirectory::new(
            Arc::new(CatalogStore::from_path(path)),
            QueryEngine::new(Classifier::new(self.taxonomy())),
        )
    }

    /// A remote directory when `--server` was given, the local catalog
    /// otherwise.
    pub fn source(&self) -> Result<Arc<dyn ChannelSource>> {
        match &self.server {
            Some(url) => {
                debug!("Using remote directory at {}", url);
                Ok(Arc::new(DirectoryClient::new(
                    url,
                    self.config.client.timeout(),
                )?))
            }
            None => Ok(Arc::new(self.local_directory())),
        }
    }

    pub fn library(&self) -> Result<Library> {
        Library::open_default()
    }

    pub fn player(&self) -> Player {
        Player::new(self.config.player.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sora_tv::Channel;

    #[test]
    fn parses_formats() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("m3u").unwrap(), OutputFormat::M3u);
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn m3u_entry_groups_by_country() {
        let listed = ListedChannel::new(
            Channel::new("Al Jazeera", "http://aj/live.m3u8")
                .with_lang("ar")
                .with_category("news"),
            Some("Qatar".to_string()),
        );
        assert_eq!(
            m3u_entry(&listed),
            "#EXTINF:-1 tvg-name=\"Al Jazeera\" tvg-language=\"ar\" group-title=\"Qatar\",Al Jazeera\nhttp://aj/live.m3u8"
        );
    }

    #[test]
    fn text_rows_mark_youtube_streams() {
        let live = ListedChannel::new(Channel::new("TVE", "http://tve"), None);
        assert_eq!(text_row(3, &live), "   3 | TVE [-]");

        let youtube = ListedChannel::new(
            Channel::new("DW", "https://www.youtube.com/watch?v=dw").with_category("news"),
            Some("Germany".to_string()),
        );
        assert_eq!(text_row(12, &youtube), "  12 | DW (Germany) [news, youtube]");
    }

    #[test]
    fn page_size_flag_overrides_config() {
        let context = CommandContext::new(Config::default(), None, None, Some(1000));
        assert_eq!(context.page_size(), 200);
        let context = CommandContext::new(Config::default(), None, None, None);
        assert_eq!(context.page_size(), 50);
    }
}
