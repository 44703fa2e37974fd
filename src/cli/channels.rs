// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};

use super::{CommandContext, OutputFormat, print_channels, with_spinner};
use sora_tv::{ChannelFilter, ChannelQuery, Collection, PageRequest};

pub struct ChannelsCommand {
    pub country: Option<String>,
    pub category: Option<String>,
    pub page: usize,
    /// Walk every page instead of printing one.
    pub all: bool,
    pub format: OutputFormat,
}

impl ChannelsCommand {
    pub async fn execute(self, context: CommandContext) -> Result<()> {
        let filter = ChannelFilter::new(self.country, self.category);

        // History and favourites never reach the directory.
        if filter.country.is_none()
            && let Some(collection) = filter.category.as_deref().and_then(Collection::for_category)
        {
            let channels = context.library()?.channels(collection);
            return print_channels(&channels, self.format);
        }

        if !filter.is_browsable() {
            anyhow::bail!("Choose a country, or a category other than all-channels");
        }

        let source = context.source()?;
        let mut query = ChannelQuery::new(filter, PageRequest::new(self.page, context.page_size()));
        let mut channels = Vec::new();

        loop {
            let page = with_spinner("Fetching channels...", source.fetch_page(&query))
                .await
                .with_context(|| format!("Failed to fetch page {}", query.paging.page))?;

            channels.extend(page.channels);

            if !self.all || !page.has_more {
                if self.format == OutputFormat::Text {
                    eprintln!(
                        "Showing {} of {} channels{}",
                        channels.len(),
                        page.total,
                        if page.has_more { " (more available)" } else { "" }
                    );
                }
                break;
            }
            query.paging = query.paging.next();
        }

        print_channels(&channels, self.format)
    }
}
