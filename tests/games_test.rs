//! Public catalog endpoints.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use irl_games_api::entities::Environment;
use irl_games_api::store::games::GameDraft;

#[tokio::test]
async fn catalog_groups_active_games_by_category() {
    let app = TestApp::new().await;
    let running = app.category("Running").await;
    let ball = app.category("Ball").await;
    app.category("Empty").await;

    for (title, category_id, is_active) in [
        ("Tag", Some(running.id), true),
        ("Relay", Some(running.id), true),
        ("Dodgeball", Some(ball.id), true),
        ("Retired", Some(ball.id), false),
        ("Charades", None, true),
    ] {
        app.game_with(GameDraft {
            title: title.to_string(),
            category_id,
            is_active,
            ..GameDraft::default()
        })
        .await;
    }

    let (status, body) = app.get("/games/", None).await;
    assert_eq!(status, StatusCode::OK);
    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0]["category"]["title"], json!("Ball"));
    assert_eq!(groups[0]["games"].as_array().unwrap().len(), 1);
    assert_eq!(groups[1]["category"]["title"], json!("Running"));
    let running_titles: Vec<&str> = groups[1]["games"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["title"].as_str().unwrap())
        .collect();
    assert_eq!(running_titles, ["Relay", "Tag"]);
    assert_eq!(groups[2]["category"], json!(null));
}

#[tokio::test]
async fn detail_by_slug_includes_equipment_and_category() {
    let app = TestApp::new().await;
    let category = app.category("Outdoor classics").await;
    app.game_with(GameDraft {
        title: "Kick the Can".to_string(),
        description: "Hide, then run for the can.".to_string(),
        environment: Environment::Outdoor,
        category_id: Some(category.id),
        equipment: vec!["Can".to_string()],
        ..GameDraft::default()
    })
    .await;

    let (status, body) = app.get("/games/kick-the-can/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], json!("Kick the Can"));
    assert_eq!(body["environment"], json!("OUTDOOR"));
    assert_eq!(body["environment_label"], json!("Outdoor"));
    assert_eq!(body["equipment"], json!(["can"]));
    assert_eq!(body["category"]["slug"], json!("outdoor-classics"));
}

#[tokio::test]
async fn inactive_or_unknown_games_are_not_found() {
    let app = TestApp::new().await;
    app.game_with(GameDraft {
        title: "Gone".to_string(),
        is_active: false,
        ..GameDraft::default()
    })
    .await;

    let (status, _) = app.get("/games/gone/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = app.get("/games/never-was/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!("connected"));
}
