// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;

use super::{CommandContext, OutputFormat, print_channels};
use sora_tv::Collection;

pub enum HistoryCommand {
    List { format: OutputFormat },
    Clear,
}

impl HistoryCommand {
    pub fn execute(self, context: CommandContext) -> Result<()> {
        let library = context.library()?;
        match self {
            Self::List { format } => {
                print_channels(&library.channels(Collection::History), format)
            }
            Self::Clear => {
                library.history.clear()?;
                println!("History cleared");
                Ok(())
            }
        }
    }
}

pub enum FavouritesCommand {
    List {
        format: OutputFormat,
    },
    Remove {
        name: String,
        country: Option<String>,
    },
}

impl FavouritesCommand {
    pub fn execute(self, context: CommandContext) -> Result<()> {
        let library = context.library()?;
        match self {
            Self::List { format } => {
                print_channels(&library.channels(Collection::Favourites), format)
            }
            Self::Remove { name, country } => {
                let matches: Vec<_> = library
                    .favourites
                    .entries()?
                    .into_iter()
                    .map(|e| e.channel)
                    .filter(|c| {
                        c.channel.name.eq_ignore_ascii_case(&name)
                            && (country.is_none() || c.country_name == country)
                    })
                    .collect();

                if matches.is_empty() {
                    anyhow::bail!("No favourite named '{}'", name);
                }

                for channel in matches {
                    library.favourites.remove(&channel.key())?;
                    println!("Removed '{}' from favourites", channel);
                }
                Ok(())
            }
        }
    }
}
