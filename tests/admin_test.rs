//! Curator surface: access control and CRUD.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;
use irl_games_api::store;
use irl_games_api::validation::CommentDraft;

#[tokio::test]
async fn admin_routes_require_the_admin_role() {
    let app = TestApp::new().await;
    let player = app.token(&app.user("player").await);

    let (status, body) = app.get("/admin/categories", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    let (status, body) = app.get("/admin/categories", Some(&player)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], json!("FORBIDDEN"));
}

#[tokio::test]
async fn category_lifecycle() {
    let app = TestApp::new().await;
    let token = app.token(&app.admin().await);

    let (status, created) = app
        .post(
            "/admin/categories",
            Some(&token),
            json!({"title": "Ball Games", "description": "Anything with a ball"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], json!("ball-games"));
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .post("/admin/categories", Some(&token), json!({"title": "Ball games"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, body) = app
        .post("/admin/categories", Some(&token), json!({"title": "x", "slug": "not a slug"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["slug"].is_array());

    let (status, updated) = app
        .send(
            Method::PATCH,
            &format!("/admin/categories/{id}"),
            Some(&token),
            Some(json!({"title": "Balls"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], json!("Balls"));
    assert_eq!(updated["slug"], json!("ball-games"));

    let (status, _) = app
        .post(
            "/admin/games",
            Some(&token),
            json!({"title": "Dodgeball", "category_id": id}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(Method::DELETE, &format!("/admin/categories/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("CONFLICT"));

    let (status, listed) = app.get("/admin/categories", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn games_are_created_patched_but_never_deleted() {
    let app = TestApp::new().await;
    let token = app.token(&app.admin().await);

    let (status, created) = app
        .post(
            "/admin/games",
            Some(&token),
            json!({
                "title": "Sardines",
                "min_players": 3,
                "max_players": 12,
                "environment": "BOTH",
                "equipment": ["Torch"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["slug"], json!("sardines"));
    assert_eq!(created["environment"], json!("BOTH"));
    assert_eq!(created["environment_label"], json!("Indoor or Outdoor"));
    assert_eq!(created["equipment"], json!(["torch"]));
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/admin/games/{id}"),
            Some(&token),
            Some(json!({"max_players": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["min_players"].is_array());

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/admin/games/{id}"),
            Some(&token),
            Some(json!({"is_active": false, "equipment": []})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], json!(false));
    assert_eq!(body["equipment"], json!([]));

    let (status, _) = app
        .send(Method::DELETE, &format!("/admin/games/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (_, listed) = app.get("/admin/games", Some(&token)).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn comment_moderation() {
    let app = TestApp::new().await;
    let token = app.token(&app.admin().await);
    let game = app.game("Tag").await;
    let author = app.user("writer").await;

    let root = store::comments::create(
        app.db(),
        CommentDraft::submitted(game.id, author.id, "root", None),
        app.now(),
    )
    .await
    .unwrap();
    store::comments::create(
        app.db(),
        CommentDraft::submitted(game.id, author.id, "reply", Some(root.id)),
        app.now(),
    )
    .await
    .unwrap();

    let (status, listed) = app.get("/admin/comments", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["text"], json!("reply"));

    let uri = format!("/admin/comments/{}", root.id);
    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({"rating": 8, "upvotes": 2})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], json!(8));
    assert_eq!(body["author_name"], json!("writer"));

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({"rating": 0})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["rating"].is_array());

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({"rating": null})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], json!(null));
    assert_eq!(body["upvotes"], json!(2));

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, listed) = app.get("/admin/comments", Some(&token)).await;
    assert_eq!(listed, json!([]));

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_ip_listing_shows_recorded_addresses() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let token = app.token(&admin);

    let (status, body) = app.get("/admin/user-ips", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_id"], json!(admin.id));
    assert_eq!(rows[0]["ip_address"], json!("203.0.113.7"));
}
