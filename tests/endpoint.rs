// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use sora_tv::server::create_router;
use sora_tv::{Catalog, CatalogStore, ChannelDirectory, QueryEngine};

fn router_for(catalog: Value) -> Router {
    let catalog: Catalog = serde_json::from_value(catalog).unwrap();
    let directory = ChannelDirectory::new(
        Arc::new(CatalogStore::preloaded(catalog)),
        QueryEngine::default(),
    );
    create_router(directory)
}

fn two_countries() -> Router {
    router_for(json!({
        "France": [
            {"name": "Eurosport 1", "url": "http://fr/eurosport"},
            {"name": "France 2", "url": "http://fr/f2"}
        ],
        "Spain": [
            {"name": "La 1", "url": "http://es/la1"},
            {"name": "beIN Sports ES", "url": "http://es/bein"}
        ]
    }))
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn country_and_category() {
    let router = router_for(json!({
        "Egypt": [
            {"name": "Al Jazeera News", "url": "u1", "category": "news"},
            {"name": "MBC Drama", "url": "u2"}
        ]
    }));

    let (status, body) = get(
        router,
        "/api/channels?country=Egypt&category=news&page=0&pageSize=50",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "channels": [{"name": "Al Jazeera News", "url": "u1", "category": "news"}],
            "hasMore": false,
            "total": 1
        })
    );
}

#[tokio::test]
async fn cross_country_category_pages() {
    let (_, first) = get(
        two_countries(),
        "/api/channels?category=sports&page=0&pageSize=1",
    )
    .await;
    assert_eq!(
        first,
        json!({
            "channels": [{"name": "Eurosport 1", "url": "http://fr/eurosport", "countryName": "France"}],
            "hasMore": true,
            "total": 2
        })
    );

    let (_, second) = get(
        two_countries(),
        "/api/channels?category=sports&page=1&pageSize=1",
    )
    .await;
    assert_eq!(
        second,
        json!({
            "channels": [{"name": "beIN Sports ES", "url": "http://es/bein", "countryName": "Spain"}],
            "hasMore": false,
            "total": 2
        })
    );
}

#[tokio::test]
async fn unknown_filters_are_empty_not_errors() {
    let empty = json!({"channels": [], "hasMore": false, "total": 0});

    for uri in [
        "/api/channels?country=Atlantis",
        "/api/channels?category=xyz",
        "/api/channels",
        "/api/channels?category=all-channels",
        "/api/channels?country=&category=",
    ] {
        let (status, body) = get(two_countries(), uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body, empty, "{}", uri);
    }
}

#[tokio::test]
async fn country_with_all_channels_lists_everything() {
    let (_, body) = get(
        two_countries(),
        "/api/channels?country=Spain&category=all-channels",
    )
    .await;
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["channels"][0]["name"], json!("La 1"));
    assert!(body["channels"][0].get("countryName").is_none());
}

#[tokio::test]
async fn paging_parameters_are_clamped() {
    let (status, body) = get(
        two_countries(),
        "/api/channels?country=France&page=-4&pageSize=0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["channels"].as_array().unwrap().len(), 1);
    assert_eq!(body["hasMore"], json!(true));

    let (_, body) = get(
        two_countries(),
        "/api/channels?country=France&page=abc&pageSize=9999",
    )
    .await;
    assert_eq!(body["channels"].as_array().unwrap().len(), 2);
    assert_eq!(body["hasMore"], json!(false));

    let (_, body) = get(two_countries(), "/api/channels?country=France&page=7").await;
    assert_eq!(body, json!({"channels": [], "hasMore": false, "total": 2}));
}

#[tokio::test]
async fn oversized_page_is_empty_and_fractional_size_truncates() {
    let (status, body) = get(
        two_countries(),
        "/api/channels?country=France&page=99999999999999999999",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"channels": [], "hasMore": false, "total": 2}));

    let (status, body) = get(
        two_countries(),
        "/api/channels?country=France&pageSize=1.9",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["channels"].as_array().unwrap().len(), 1);
    assert_eq!(body["hasMore"], json!(true));

    let (_, body) = get(
        two_countries(),
        "/api/channels?country=France&page=1&pageSize=2.5",
    )
    .await;
    assert_eq!(body, json!({"channels": [], "hasMore": false, "total": 2}));
}

#[tokio::test]
async fn unreadable_catalog_is_an_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("channels.json");
    std::fs::write(&path, "{\"Egypt\": [").unwrap();

    let directory = ChannelDirectory::new(
        Arc::new(CatalogStore::from_path(&path)),
        QueryEngine::default(),
    );

    let (status, body) = get(create_router(directory.clone()), "/api/channels?country=Egypt").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "An internal server error occurred"}));

    let (status, _) = get(
        create_router(directory),
        "/api/channels?country=Atlantis",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn countries_categories_and_random() {
    let (_, countries) = get(two_countries(), "/api/countries").await;
    assert_eq!(
        countries,
        json!([{"name": "France", "channels": 2}, {"name": "Spain", "channels": 2}])
    );

    let (_, categories) = get(two_countries(), "/api/categories").await;
    let ids: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"top-news"));
    assert!(ids.contains(&"all-channels"));

    let (_, random) = get(two_countries(), "/api/channels/random?country=Spain").await;
    assert!(["La 1", "beIN Sports ES"].contains(&random["name"].as_str().unwrap()));

    let (status, nothing) = get(two_countries(), "/api/channels/random?country=Atlantis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(nothing, Value::Null);
}
