// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use sora_tv::server::create_router;
use sora_tv::{
    CatalogStore, ChannelDirectory, ChannelFilter, ChannelQuery, ChannelSource, DirectoryClient,
    FetchError, LoadController, LoadOutcome, PageRequest, QueryEngine,
};

async fn spawn_server(directory: ChannelDirectory) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(directory)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn directory() -> ChannelDirectory {
    let catalog = serde_json::from_value(json!({
        "Egypt": [
            {"name": "Al Jazeera News", "url": "u1", "category": "news"},
            {"name": "MBC Drama", "url": "u2"},
            {"name": "Nile Sport", "url": "u3"}
        ],
        "Qatar": [
            {"name": "beIN Sports 1", "url": "u4", "lang": "ar"}
        ]
    }))
    .unwrap();

    ChannelDirectory::new(
        Arc::new(CatalogStore::preloaded(catalog)),
        QueryEngine::default(),
    )
}

#[tokio::test]
async fn client_pages_through_a_live_server() {
    let base = spawn_server(directory()).await;
    let client = DirectoryClient::new(&base, Duration::from_secs(5)).unwrap();

    let query = ChannelQuery::new(ChannelFilter::category("sports"), PageRequest::new(0, 1));
    let page = client.fetch_page(&query).await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.has_more);
    assert_eq!(page.channels[0].channel.name, "Nile Sport");
    assert_eq!(page.channels[0].country_name.as_deref(), Some("Egypt"));

    let countries = client.countries().await.unwrap();
    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0].name, "Egypt");

    let random = client.random_channel(Some("Qatar")).await.unwrap().unwrap();
    assert_eq!(random.channel.lang.as_deref(), Some("ar"));
    assert!(client.random_channel(Some("Atlantis")).await.unwrap().is_none());
}

#[tokio::test]
async fn loader_over_http() {
    let base = spawn_server(directory()).await;
    let client = Arc::new(DirectoryClient::new(&base, Duration::from_secs(5)).unwrap());
    let controller = LoadController::new(client, 2);

    let outcome = controller
        .set_filter(ChannelFilter::country("Egypt").with_category("all-channels"))
        .await;
    assert_eq!(outcome, LoadOutcome::Loaded { added: 2 });
    assert_eq!(controller.load_more().await, LoadOutcome::Loaded { added: 1 });

    let snapshot = controller.snapshot().await;
    let names: Vec<_> = snapshot.channels.iter().map(|c| c.channel.name.as_str()).collect();
    assert_eq!(names, vec!["Al Jazeera News", "MBC Drama", "Nile Sport"]);
    assert!(!snapshot.has_more);
}

#[tokio::test]
async fn server_failure_reaches_the_client_as_status() {
    let dir = tempfile::tempdir().unwrap();
    let broken = ChannelDirectory::new(
        Arc::new(CatalogStore::from_path(dir.path().join("missing.json"))),
        QueryEngine::default(),
    );
    let base = spawn_server(broken).await;
    let client = DirectoryClient::new(&base, Duration::from_secs(5)).unwrap();

    let err = client
        .fetch_page(&ChannelQuery::new(
            ChannelFilter::country("Egypt"),
            PageRequest::default(),
        ))
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "An internal server error occurred");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn stored_country_name_does_not_break_cross_country_pages() {
    let catalog = serde_json::from_value(json!({
        "Egypt": [
            {"name": "Nile Sport", "url": "u3", "countryName": "Egypt"}
        ],
        "Qatar": [
            {"name": "beIN Sports 1", "url": "u4", "countryName": "Somewhere"}
        ]
    }))
    .unwrap();
    let directory = ChannelDirectory::new(
        Arc::new(CatalogStore::preloaded(catalog)),
        QueryEngine::default(),
    );
    let base = spawn_server(directory).await;

    let body = reqwest::get(format!("{}/api/channels?category=sports", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body.matches("countryName").count(), 2);

    let client = DirectoryClient::new(&base, Duration::from_secs(5)).unwrap();
    let page = client
        .fetch_page(&ChannelQuery::new(
            ChannelFilter::category("sports"),
            PageRequest::default(),
        ))
        .await
        .unwrap();

    let countries: Vec<_> = page
        .channels
        .iter()
        .map(|c| c.country_name.as_deref())
        .collect();
    assert_eq!(countries, vec![Some("Egypt"), Some("Qatar")]);
}
