// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{CatalogStore, CountrySummary};
use crate::channel::{ChannelFilter, ListedChannel};
use crate::error::{CatalogError, FetchError};
use crate::pagination::{Page, PageRequest, paginate};
use crate::query::{Candidate, QueryEngine};

/// Filter plus paging: everything needed to ask for one page of channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ChannelQuery {
    pub filter: ChannelFilter,
    pub paging: PageRequest,
}

impl ChannelQuery {
    pub fn new(filter: ChannelFilter, paging: PageRequest) -> Self {
        Self { filter, paging }
    }
}

/// Anything that can answer channel queries: the in-process directory or a
/// remote one reached over HTTP.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    async fn fetch_page(&self, query: &ChannelQuery) -> Result<Page<ListedChannel>, FetchError>;

    async fn countries(&self) -> Result<Vec<CountrySummary>, FetchError>;

    async fn random_channel(&self, country: Option<&str>)
    -> Result<Option<ListedChannel>, FetchError>;
}

/// Answers channel queries from the shared catalog.
#[derive(Debug, Clone)]
pub struct ChannelDirectory {
    store: Arc<CatalogStore>,
    engine: QueryEngine,
}

impl ChannelDirectory {
    pub fn new(store: Arc<CatalogStore>, engine: QueryEngine) -> Self {
        Self { store, engine }
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    /// Loads the catalog (once per process), selects candidates and cuts
    /// the requested page. Unknown countries and categories produce an
    /// empty page; only an unusable catalog is an error.
    pub async fn page(&self, query: &ChannelQuery) -> Result<Page<ListedChannel>, CatalogError> {
        let catalog = self.store.get().await?;
        let candidates = self.engine.candidates(&catalog, &query.filter);
        let page = paginate(&candidates, query.paging).map(Candidate::to_listed);

        debug!(
            "Query {:?} page {} (size {}): {} of {} candidates, has_more={}",
            query.filter,
            query.paging.page,
            query.paging.page_size,
            page.channels.len(),
            page.total,
            page.has_more
        );

        Ok(page)
    }

    pub async fn country_summaries(&self) -> Result<Vec<CountrySummary>, CatalogError> {
        Ok(self.store.get().await?.summaries())
    }

    pub async fn pick_random(
        &self,
        country: Option<&str>,
    ) -> Result<Option<ListedChannel>, CatalogError> {
        let catalog = self.store.get().await?;
        Ok(catalog.random_channel(country, &mut rand::rng()))
    }
}

#[async_trait]
impl ChannelSource for ChannelDirectory {
    async fn fetch_page(&self, query: &ChannelQuery) -> Result<Page<ListedChannel>, FetchError> {
        Ok(self.page(query).await?)
    }

    async fn countries(&self) -> Result<Vec<CountrySummary>, FetchError> {
        Ok(self.country_summaries().await?)
    }

    async fn random_channel(
        &self,
        country: Option<&str>,
    ) -> Result<Option<ListedChannel>, FetchError> {
        Ok(self.pick_random(country).await?)
    }
}
