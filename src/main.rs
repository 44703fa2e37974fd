// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use sora_tv::Config;

mod cli;
use cli::{
    BrowseCommand, CategoriesCommand, ChannelsCommand, CommandContext, CountriesCommand,
    FavouritesCommand, HistoryCommand, OutputFormat, RandomCommand,
};

fn cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser)]
#[command(name = "sora-tv")]
#[command(about = "Browse and play free-to-air TV channels by country and category")]
#[command(version)]
#[command(styles = cargo_style())]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging to file (sora_tv_debug.log)
    #[arg(long, global = true)]
    debug_log: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Channel catalog JSON file, overrides [server] catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Query a running directory server instead of the local catalog
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Channels per page, overrides [client] page_size
    #[arg(long, global = true)]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive browser (default if no command given)
    Browse {
        /// Country to open directly
        #[arg(short, long)]
        country: Option<String>,
        /// Category to open directly
        #[arg(short = 'g', long)]
        category: Option<String>,
    },

    /// Serve the channel directory over HTTP
    Serve {
        /// Address to listen on, overrides [server] bind
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Print one page of channels (or every page with --all)
    Channels {
        #[arg(short, long)]
        country: Option<String>,
        #[arg(short = 'g', long)]
        category: Option<String>,
        /// Zero-based page number
        #[arg(short, long, default_value_t = 0)]
        page: usize,
        /// Fetch every page
        #[arg(short, long)]
        all: bool,
        /// Output format (text, json, m3u)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List countries with their channel counts
    Countries {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List browseable categories
    Categories {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Pick a random channel
    Random {
        #[arg(short, long)]
        country: Option<String>,
        /// Play it right away
        #[arg(long)]
        play: bool,
        /// Output format (text, json, m3u)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write a default config file
    Init {
        /// Replace an existing config (the old one is kept as a backup)
        #[arg(short, long)]
        force: bool,
    },

    /// Recently played channels
    #[command(subcommand)]
    History(HistorySubCommand),

    /// Favourite channels
    #[command(subcommand)]
    Favourites(FavouritesSubCommand),
}

#[derive(Subcommand)]
enum HistorySubCommand {
    /// List history, most recent first
    List {
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Forget all history
    Clear,
}

#[derive(Subcommand)]
enum FavouritesSubCommand {
    /// List favourites
    List {
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Remove a favourite by channel name
    Remove {
        name: String,
        #[arg(short, long)]
        country: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.debug_log {
        let file = File::create("sora_tv_debug.log")?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(
                EnvFilter::from_default_env()
                    .add_directive("sora_tv=debug".parse()?)
                    .add_directive("hyper_util=error".parse()?),
            )
            .init();
    } else if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into())
                    .add_directive("hyper_util=error".parse()?),
            )
            .init();
    } else if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("hyper_util=error".parse()?),
            )
            .init();
    } else if matches!(cli.command, Some(Commands::Serve { .. })) {
        // A server with no output at all is hard to operate.
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("sora_tv=info,tower_http=info"))
            .init();
    }

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    let context = CommandContext::new(config, cli.catalog, cli.server, cli.page_size);

    match cli.command {
        None => {
            BrowseCommand {
                country: None,
                category: None,
            }
            .execute(context)
            .await?;
        }
        Some(Commands::Browse { country, category }) => {
            BrowseCommand { country, category }.execute(context).await?;
        }
        Some(Commands::Serve { bind }) => {
            let addr = bind.unwrap_or(context.config.server.bind);
            sora_tv::server::serve(context.local_directory(), addr).await?;
        }
        Some(Commands::Channels {
            country,
            category,
            page,
            all,
            format,
        }) => {
            let cmd = ChannelsCommand {
                country,
                category,
                page,
                all,
                format: OutputFormat::from_str(&format)?,
            };
            cmd.execute(context).await?;
        }
        Some(Commands::Countries { format }) => {
            let cmd = CountriesCommand {
                format: OutputFormat::from_str(&format)?,
            };
            cmd.execute(context).await?;
        }
        Some(Commands::Categories { format }) => {
            CategoriesCommand {
                format: OutputFormat::from_str(&format)?,
            }
            .execute()?;
        }
        Some(Commands::Random {
            country,
            play,
            format,
        }) => {
            let cmd = RandomCommand {
                country,
                play,
                format: OutputFormat::from_str(&format)?,
            };
            cmd.execute(context).await?;
        }
        Some(Commands::Init { force }) => {
            if Config::write_default(&config_path, force)? {
                println!("Configuration saved to: {}", config_path.display());
            } else {
                println!(
                    "Config already exists at {} (use --force to replace it)",
                    config_path.display()
                );
            }
        }
        Some(Commands::History(history_cmd)) => {
            let cmd = match history_cmd {
                HistorySubCommand::List { format } => HistoryCommand::List {
                    format: OutputFormat::from_str(&format)?,
                },
                HistorySubCommand::Clear => HistoryCommand::Clear,
            };
            cmd.execute(context)?;
        }
        Some(Commands::Favourites(favourites_cmd)) => {
            let cmd = match favourites_cmd {
                FavouritesSubCommand::List { format } => FavouritesCommand::List {
                    format: OutputFormat::from_str(&format)?,
                },
                FavouritesSubCommand::Remove { name, country } => {
                    FavouritesCommand::Remove { name, country }
                }
            };
            cmd.execute(context)?;
        }
    }

    Ok(())
}
