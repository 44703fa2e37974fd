// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::catalog::CountrySummary;
use crate::channel::ListedChannel;
use crate::directory::{ChannelQuery, ChannelSource};
use crate::error::FetchError;
use crate::pagination::Page;
use crate::taxonomy::ALL_CHANNELS;

/// HTTP client for a remote channel directory.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    base_url: Url,
}

impl DirectoryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid server URL: {}", base_url))?;

        // Keep any path prefix when joining endpoint paths onto it.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(concat!("sora-tv/", env!("CARGO_PKG_VERSION")))
                .build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::Unavailable(format!("invalid endpoint {}: {}", path, e)))
    }

    /// URL for one page of channels. A country query only carries the
    /// category when it actually narrows the list.
    pub fn channels_url(&self, query: &ChannelQuery) -> Result<Url, FetchError> {
        let mut url = self.endpoint("api/channels")?;
        {
            let mut pairs = url.query_pairs_mut();
            match (&query.filter.country, &query.filter.category) {
                (Some(country), category) => {
                    pairs.append_pair("country", country);
                    if let Some(category) = category.as_deref().filter(|c| *c != ALL_CHANNELS) {
                        pairs.append_pair("category", category);
                    }
                }
                (None, Some(category)) => {
                    pairs.append_pair("category", category);
                }
                (None, None) => {}
            }
            pairs
                .append_pair("page", &query.paging.page.to_string())
                .append_pair("pageSize", &query.paging.page_size.to_string());
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("Requesting: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

            warn!("Request to {} failed with status {}: {}", url, status, message);
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        decode(&body)
    }
}

/// serde_json's message already names the line and column.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

#[async_trait]
impl ChannelSource for DirectoryClient {
    async fn fetch_page(&self, query: &ChannelQuery) -> Result<Page<ListedChannel>, FetchError> {
        let url = self.channels_url(query)?;
        self.get_json(url).await
    }

    async fn countries(&self) -> Result<Vec<CountrySummary>, FetchError> {
        let url = self.endpoint("api/countries")?;
        self.get_json(url).await
    }

    async fn random_channel(
        &self,
        country: Option<&str>,
    ) -> Result<Option<ListedChannel>, FetchError> {
        let mut url = self.endpoint("api/channels/random")?;
        if let Some(country) = country {
            url.query_pairs_mut().append_pair("country", country);
        }
        self.get_json(url).await
    }
}
