//! Per-game statistics and the curator actions built on them.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use common::TestApp;
use irl_games_api::entities::{Environment, comment, game, user};
use irl_games_api::services::stats::format_rating;
use irl_games_api::services::{GameAction, games_with_stats};
use irl_games_api::store;
use irl_games_api::validation::CommentDraft;

async fn comment_on(
    app: &TestApp,
    game: &game::Model,
    author: &user::Model,
    text: &str,
    rating: Option<i16>,
) -> comment::Model {
    let mut draft = CommentDraft::submitted(game.id, author.id, text, None);
    draft.rating = rating;
    store::comments::create(app.db(), draft, app.now()).await.unwrap()
}

#[tokio::test]
async fn average_rating_is_reported_with_two_decimals() {
    let app = TestApp::new().await;
    let game = app.game("Juggling").await;
    let author = app.user("critic").await;
    comment_on(&app, &game, &author, "fine", Some(5)).await;
    comment_on(&app, &game, &author, "great", Some(9)).await;

    let stats = games_with_stats(app.db(), app.now()).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].game.id, game.id);
    assert_eq!(format_rating(stats[0].avg_rating), "7.00");
    assert_eq!(stats[0].comments_count, 2);
}

#[tokio::test]
async fn only_games_with_a_rated_comment_are_listed() {
    let app = TestApp::new().await;
    let rated = app.game("Rated").await;
    let unrated = app.game("Unrated").await;
    app.game("Silent").await;
    let author = app.user("critic").await;

    comment_on(&app, &rated, &author, "ok", Some(4)).await;
    comment_on(&app, &rated, &author, "no score", None).await;
    comment_on(&app, &unrated, &author, "no score either", None).await;

    let stats = games_with_stats(app.db(), app.now()).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].game.id, rated.id);
    assert_eq!(format_rating(stats[0].avg_rating), "4.00");
    assert_eq!(stats[0].comments_count, 2);
}

#[tokio::test]
async fn last_day_counters_follow_the_clock() {
    let app = TestApp::new().await;
    let game = app.game("Hiking").await;
    let author = app.user("walker").await;

    for i in 0..3 {
        comment_on(&app, &game, &author, &format!("old {i}"), Some(6)).await;
    }
    app.clock.advance(Duration::hours(25));
    comment_on(&app, &game, &author, "new 1", Some(8)).await;
    comment_on(&app, &game, &author, "new 2", None).await;

    let stats = games_with_stats(app.db(), app.now()).await.unwrap();
    let entry = &stats[0];
    assert_eq!(entry.comments_count, 5);
    assert_eq!(entry.comments_count_last_day, 2);
    assert_eq!(entry.last_comment.as_deref(), Some("new 2"));
    assert!(!entry.was_updated_last_day);
    assert_eq!(format_rating(entry.avg_rating), "6.50");
}

#[tokio::test]
async fn last_comment_tie_goes_to_the_later_insert() {
    let app = TestApp::new().await;
    let game = app.game("Fishing").await;
    let author = app.user("angler").await;
    comment_on(&app, &game, &author, "same instant a", Some(3)).await;
    comment_on(&app, &game, &author, "same instant b", None).await;

    let stats = games_with_stats(app.db(), app.now()).await.unwrap();
    assert_eq!(stats[0].last_comment.as_deref(), Some("same instant b"));
}

#[tokio::test]
async fn repeated_snapshots_are_identical() {
    let app = TestApp::new().await;
    let author = app.user("critic").await;
    for (title, ratings) in [("A", [1, 2, 10]), ("B", [3, 3, 4]), ("C", [7, 7, 8])] {
        let game = app.game(title).await;
        for rating in ratings {
            comment_on(&app, &game, &author, "rated", Some(rating)).await;
            app.clock.advance(Duration::minutes(7));
        }
    }

    let first = games_with_stats(app.db(), app.now()).await.unwrap();
    let second = games_with_stats(app.db(), app.now()).await.unwrap();
    assert_eq!(first, second);
    let titles: Vec<&str> = first.iter().map(|s| s.game.title.as_str()).collect();
    assert_eq!(titles, ["A", "B", "C"]);
    assert_eq!(format_rating(first[0].avg_rating), "4.33");
}

#[tokio::test]
async fn reset_rating_clears_ratings_of_selected_games_only() {
    let app = TestApp::new().await;
    let keep = app.game("Keep").await;
    let reset = app.game("Reset").await;
    let author = app.user("critic").await;
    comment_on(&app, &keep, &author, "kept", Some(8)).await;
    comment_on(&app, &reset, &author, "one", Some(2)).await;
    comment_on(&app, &reset, &author, "two", Some(3)).await;

    let report = GameAction::ResetRating
        .apply(app.db(), &[reset.id], app.now())
        .await
        .unwrap();
    assert_eq!(report.affected_count, 2);

    let cleared = comment::Entity::find()
        .filter(comment::Column::GameId.eq(reset.id))
        .filter(comment::Column::Rating.is_not_null())
        .all(app.db())
        .await
        .unwrap();
    assert!(cleared.is_empty());

    let stats = games_with_stats(app.db(), app.now()).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].game.id, keep.id);
}

#[tokio::test]
async fn stats_view_over_http_and_its_actions() {
    let app = TestApp::new().await;
    let token = app.token(&app.admin().await);
    let game = app.game("Square").await;
    let author = app.user("critic").await;
    comment_on(&app, &game, &author, "fun", Some(10)).await;

    let (status, body) = app.get("/admin/games-with-stats", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["avg_rating"], json!("10.00"));
    assert_eq!(body[0]["comments_count"], json!(1));
    assert_eq!(body[0]["last_comment"], json!("fun"));
    assert_eq!(body[0]["comments_count_last_day"], json!(1));
    assert_eq!(body[0]["was_updated_last_day"], json!(true));

    let (status, body) = app
        .post(
            "/admin/games-with-stats/actions/soft-delete",
            Some(&token),
            json!({"ids": [game.id]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"affected_count": 1, "message": "1 game was deactivated."}));

    let stored = game::Entity::find_by_id(game.id).one(app.db()).await.unwrap().unwrap();
    assert!(!stored.is_active);

    // Deactivated games keep their statistics.
    let (_, body) = app.get("/admin/games-with-stats", Some(&token)).await;
    assert_eq!(body[0]["is_active"], json!(false));

    let (status, _) = app
        .post(
            "/admin/games-with-stats/actions/set-environment-indoor",
            Some(&token),
            json!({"ids": [game.id]}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn base_view_moves_games_indoors() {
    let app = TestApp::new().await;
    let token = app.token(&app.admin().await);
    let a = app.game("Alpha").await;
    let b = app.game("Beta").await;

    let (status, body) = app
        .post(
            "/admin/games/actions/set-environment-indoor",
            Some(&token),
            json!({"ids": [a.id, b.id]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affected_count"], json!(2));
    assert_eq!(body["message"], json!("2 games were moved indoors."));

    let games = game::Entity::find().all(app.db()).await.unwrap();
    assert!(games.iter().all(|g| g.environment == Environment::Indoor));

    for unlisted in ["reset-rating", "soft-delete", "delete-selected"] {
        let (status, _) = app
            .post(
                &format!("/admin/games/actions/{unlisted}"),
                Some(&token),
                json!({"ids": [a.id]}),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{unlisted}");
    }
}
