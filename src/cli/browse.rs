// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use inquire::{Select, Text};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use super::{CommandContext, with_spinner};
use sora_tv::taxonomy::{ALL_CHANNELS, CATEGORY_MENU};
use sora_tv::{
    ChannelFilter, ChannelKey, ChannelSource, Collection, Library, ListedChannel, LoadController,
    LoadOutcome, Player,
};

enum StartOption {
    Countries,
    Category(&'static str, &'static str),
}

impl fmt::Display for StartOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartOption::Countries => write!(f, "🌍 Countries"),
            StartOption::Category(_, name) => write!(f, "{}", name),
        }
    }
}

enum ListItem {
    Channel {
        index: usize,
        label: String,
    },
    LoadMore {
        loaded: usize,
        total: usize,
    },
    Search,
    Refresh,
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListItem::Channel { label, .. } => write!(f, "{}", label),
            ListItem::LoadMore { loaded, total } => {
                write!(f, "⬇ Load more ({} of {})", loaded, total)
            }
            ListItem::Search => write!(f, "🔍 Search loaded channels"),
            ListItem::Refresh => write!(f, "↻ Refresh"),
        }
    }
}

pub struct BrowseCommand {
    pub country: Option<String>,
    pub category: Option<String>,
}

impl BrowseCommand {
    pub async fn execute(self, context: CommandContext) -> Result<()> {
        let source = context.source()?;
        let library = context.library()?;
        let player = context.player();
        let page_size = context.page_size();

        let filter = match (self.country, self.category) {
            (None, None) => match Self::prompt_filter(source.as_ref()).await? {
                Some(filter) => filter,
                None => return Ok(()),
            },
            (country, category) => ChannelFilter::new(country, category),
        };

        if filter.country.is_none()
            && let Some(collection) = filter.category.as_deref().and_then(Collection::for_category)
        {
            return Self::browse_collection(&library, &player, collection, page_size).await;
        }

        let controller = LoadController::new(source, page_size);
        let outcome = with_spinner("Loading channels...", controller.set_filter(filter)).await;
        debug!("Initial load: {:?}", outcome);

        Self::browse_listing(&controller, &library, &player, page_size).await
    }

    async fn prompt_filter(source: &dyn ChannelSource) -> Result<Option<ChannelFilter>> {
        let mut options = vec![StartOption::Countries];
        options.extend(
            CATEGORY_MENU
                .iter()
                .filter(|(id, _)| *id != ALL_CHANNELS)
                .map(|&(id, name)| StartOption::Category(id, name)),
        );

        let Some(selection) = Select::new("Browse:", options)
            .with_page_size(15)
            .prompt_skippable()?
        else {
            return Ok(None);
        };

        match selection {
            StartOption::Category(id, _) => Ok(Some(ChannelFilter::category(id))),
            StartOption::Countries => {
                let countries = with_spinner("Fetching countries...", source.countries()).await?;
                if countries.is_empty() {
                    println!("No countries available.");
                    return Ok(None);
                }

                let names: Vec<String> = countries.into_iter().map(|c| c.name).collect();
                let Some(country) = Select::new("Select country:", names)
                    .with_page_size(15)
                    .prompt_skippable()?
                else {
                    return Ok(None);
                };

                let categories: Vec<&str> = CATEGORY_MENU
                    .iter()
                    .filter(|(id, _)| Collection::for_category(id).is_none())
                    .map(|(_, name)| *name)
                    .collect();
                let Some(name) = Select::new("Select category:", categories)
                    .with_page_size(15)
                    .prompt_skippable()?
                else {
                    return Ok(None);
                };

                let id = CATEGORY_MENU
                    .iter()
                    .find(|(_, n)| *n == name)
                    .map(|(id, _)| *id)
                    .unwrap_or(ALL_CHANNELS);

                Ok(Some(ChannelFilter::country(country).with_category(id)))
            }
        }
    }

    fn favourite_keys(library: &Library) -> HashSet<ChannelKey> {
        library
            .channels(Collection::Favourites)
            .iter()
            .map(ListedChannel::key)
            .collect()
    }

    fn label(channel: &ListedChannel, favourites: &HashSet<ChannelKey>) -> String {
        let star = if favourites.contains(&channel.key()) {
            "⭐ "
        } else {
            ""
        };
        format!("{}{}", star, channel)
    }

    async fn browse_listing<S: ChannelSource + ?Sized>(
        controller: &LoadController<S>,
        library: &Library,
        player: &Player,
        page_size: usize,
    ) -> Result<()> {
        let mut cursor = 0;

        loop {
            let snapshot = controller.snapshot().await;
            if let Some(error) = &snapshot.error {
                println!("Error loading channels: {}", error);
            }

            let favourites = Self::favourite_keys(library);
            let mut items: Vec<ListItem> = snapshot
                .channels
                .iter()
                .enumerate()
                .map(|(index, channel)| ListItem::Channel {
                    index,
                    label: Self::label(channel, &favourites),
                })
                .collect();

            if snapshot.has_more {
                items.push(ListItem::LoadMore {
                    loaded: snapshot.channels.len(),
                    total: snapshot.total,
                });
            }
            if !snapshot.channels.is_empty() {
                items.push(ListItem::Search);
            }
            items.push(ListItem::Refresh);

            if snapshot.channels.is_empty() && snapshot.error.is_none() {
                println!("No channels found.");
            }

            let cursor_at = cursor.min(items.len().saturating_sub(1));
            let Some(selection) = Select::new("Select channel:", items)
                .with_page_size(page_size.min(20))
                .with_starting_cursor(cursor_at)
                .prompt_skippable()?
            else {
                return Ok(());
            };

            match selection {
                ListItem::Channel { index, .. } => {
                    cursor = index;
                    // Prefetch when the pick was near the end of what is loaded.
                    let outcome = controller.on_scroll(index).await;
                    if outcome != LoadOutcome::Skipped {
                        debug!("Prefetch after selection: {:?}", outcome);
                    }

                    if let Some(channel) = snapshot.channels.get(index) {
                        Self::channel_actions(channel, library, player).await?;
                    }
                }
                ListItem::LoadMore { loaded, .. } => {
                    cursor = loaded;
                    with_spinner("Loading more...", controller.load_more()).await;
                }
                ListItem::Search => {
                    let Some(query) = Text::new("Search:").prompt_skippable()? else {
                        continue;
                    };
                    let hits: Vec<ListedChannel> =
                        snapshot.search(&query).into_iter().cloned().collect();
                    Self::pick_from(&hits, library, player, page_size).await?;
                }
                ListItem::Refresh => {
                    cursor = 0;
                    with_spinner("Refreshing...", controller.refresh()).await;
                }
            }
        }
    }

    async fn browse_collection(
        library: &Library,
        player: &Player,
        collection: Collection,
        page_size: usize,
    ) -> Result<()> {
        let channels = library.channels(collection);
        if channels.is_empty() {
            println!("Nothing here yet.");
            return Ok(());
        }
        Self::pick_from(&channels, library, player, page_size).await
    }

    async fn pick_from(
        channels: &[ListedChannel],
        library: &Library,
        player: &Player,
        page_size: usize,
    ) -> Result<()> {
        if channels.is_empty() {
            println!("No matching channels.");
            return Ok(());
        }

        let favourites = Self::favourite_keys(library);
        let items: Vec<ListItem> = channels
            .iter()
            .enumerate()
            .map(|(index, channel)| ListItem::Channel {
                index,
                label: Self::label(channel, &favourites),
            })
            .collect();

        if let Some(ListItem::Channel { index, .. }) = Select::new("Select channel:", items)
            .with_page_size(page_size.min(20))
            .prompt_skippable()?
            && let Some(channel) = channels.get(index)
        {
            Self::channel_actions(channel, library, player).await?;
        }

        Ok(())
    }

    async fn channel_actions(
        channel: &ListedChannel,
        library: &Library,
        player: &Player,
    ) -> Result<()> {
        let is_fav = library.favourites.contains(&channel.key())?;

        let mut actions = vec!["▶ Play", "▶ Play in background"];
        actions.push(if is_fav {
            "🗑 Remove from Favourites"
        } else {
            "⭐ Add to Favourites"
        });

        match Select::new(&format!("Action for '{}':", channel), actions).prompt_skippable()? {
            Some("▶ Play") => {
                println!("Playing: {}", channel);
                if let Err(e) = player.play_channel(channel, &library.history, false).await {
                    println!("Playback error: {}", e);
                }
            }
            Some("▶ Play in background") => {
                if let Err(e) = player.play_channel(channel, &library.history, true).await {
                    println!("Playback error: {}", e);
                }
            }
            Some(_) => {
                if library.favourites.toggle(channel)? {
                    println!("Added '{}' to favourites!", channel);
                } else {
                    println!("Removed '{}' from favourites", channel);
                }
            }
            None => {}
        }

        Ok(())
    }
}
