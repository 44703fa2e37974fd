// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use serde_json::json;

use super::{CommandContext, OutputFormat, print_channels, with_spinner};
use sora_tv::taxonomy::{CATEGORY_MENU, category_title};

pub struct CountriesCommand {
    pub format: OutputFormat,
}

impl CountriesCommand {
    pub async fn execute(self, context: CommandContext) -> Result<()> {
        let source = context.source()?;
        let countries = with_spinner("Fetching countries...", source.countries()).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&countries)?),
            _ => {
                for country in countries {
                    println!("{:6} | {}", country.channels, country.name);
                }
            }
        }
        Ok(())
    }
}

pub struct CategoriesCommand {
    pub format: OutputFormat,
}

impl CategoriesCommand {
    pub fn execute(self) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = CATEGORY_MENU
                    .iter()
                    .map(|(id, _)| json!({ "id": id, "name": category_title(id) }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            _ => {
                for (id, name) in CATEGORY_MENU {
                    println!("{:16} {}", id, name);
                }
            }
        }
        Ok(())
    }
}

pub struct RandomCommand {
    pub country: Option<String>,
    pub play: bool,
    pub format: OutputFormat,
}

impl RandomCommand {
    pub async fn execute(self, context: CommandContext) -> Result<()> {
        let source = context.source()?;
        let country = self.country.as_deref().filter(|c| !c.is_empty());

        let Some(channel) = with_spinner("Picking a channel...", source.random_channel(country)).await?
        else {
            println!("No channels available");
            return Ok(());
        };

        if self.play {
            let library = context.library()?;
            context
                .player()
                .play_channel(&channel, &library.history, false)
                .await?;
            return Ok(());
        }

        print_channels(std::slice::from_ref(&channel), self.format)
    }
}
