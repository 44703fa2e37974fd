// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

pub mod catalog;
pub mod channel;
pub mod classifier;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod library;
pub mod loader;
pub mod pagination;
pub mod player;
pub mod query;
pub mod server;
pub mod taxonomy;

pub use catalog::{Catalog, CatalogStore, CountrySummary};
pub use channel::{Channel, ChannelFilter, ChannelKey, ListedChannel, StreamKind};
pub use classifier::Classifier;
pub use client::DirectoryClient;
pub use config::Config;
pub use directory::{ChannelDirectory, ChannelQuery, ChannelSource};
pub use error::{CatalogError, FetchError};
pub use library::{Collection, Library};
pub use loader::{ChannelLoader, LoadController, LoadOutcome, LoadPhase, LoaderSnapshot};
pub use pagination::{Page, PageRequest, paginate};
pub use player::Player;
pub use query::QueryEngine;
pub use taxonomy::Taxonomy;
