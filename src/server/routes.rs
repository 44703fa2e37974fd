// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::errors::AppResult;
use crate::catalog::CountrySummary;
use crate::channel::{ChannelFilter, ListedChannel};
use crate::directory::{ChannelDirectory, ChannelQuery};
use crate::pagination::{Page, PageRequest};
use crate::taxonomy::{CATEGORY_MENU, category_title};

/// Raw query string of `GET /api/channels`. Paging values stay strings so a
/// malformed number falls back to its default instead of rejecting the
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct ChannelsParams {
    pub country: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl ChannelsParams {
    pub fn to_query(&self) -> ChannelQuery {
        ChannelQuery::new(
            ChannelFilter::new(self.country.clone(), self.category.clone()),
            PageRequest::parse(self.page.as_deref(), self.page_size.as_deref()),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RandomParams {
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: String,
    pub name: String,
}

pub fn create_router(directory: ChannelDirectory) -> Router {
    Router::new()
        .route("/api/channels", get(list_channels))
        .route("/api/channels/random", get(random_channel))
        .route("/api/countries", get(list_countries))
        .route("/api/categories", get(list_categories))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(directory)
}

async fn list_channels(
    State(directory): State<ChannelDirectory>,
    Query(params): Query<ChannelsParams>,
) -> AppResult<Json<Page<ListedChannel>>> {
    let page = directory.page(&params.to_query()).await?;
    Ok(Json(page))
}

async fn random_channel(
    State(directory): State<ChannelDirectory>,
    Query(params): Query<RandomParams>,
) -> AppResult<Json<Option<ListedChannel>>> {
    let country = params.country.as_deref().filter(|c| !c.is_empty());
    Ok(Json(directory.pick_random(country).await?))
}

async fn list_countries(
    State(directory): State<ChannelDirectory>,
) -> AppResult<Json<Vec<CountrySummary>>> {
    Ok(Json(directory.country_summaries().await?))
}

async fn list_categories() -> Json<Vec<CategoryEntry>> {
    Json(
        CATEGORY_MENU
            .iter()
            .map(|(id, _)| CategoryEntry {
                id: id.to_string(),
                name: category_title(id),
            })
            .collect(),
    )
}
