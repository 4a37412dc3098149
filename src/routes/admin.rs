use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::auth::AdminUser;
use crate::dto::{
    ActionRequest, AdminCommentRow, AdminGameRow, CommentFeedbackRequest, CreateCategoryRequest,
    CreateGameRequest, GameStatsView, UpdateCategoryRequest, UpdateGameRequest,
};
use crate::entities::{category, game, user_ip};
use crate::error::AppError;
use crate::services::{ActionReport, GameAdminView, games_with_stats, ip_ledger};
use crate::state::AppState;
use crate::store;
use crate::store::categories::{CategoryDraft, CategoryPatch};
use crate::store::comments::CommentPatch;

/// Newest comments shown in the curator listing.
const COMMENT_LISTING_LIMIT: u64 = 200;

/// Curator router; every handler requires the admin role.
///
/// Games have no delete route: they are deactivated through the `soft-delete` action.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            patch(update_category).delete(delete_category),
        )
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", patch(update_game))
        .route("/games/actions/{action}", post(run_games_action))
        .route("/games-with-stats", get(list_games_with_stats))
        .route("/games-with-stats/actions/{action}", post(run_stats_action))
        .route("/comments", get(list_comments))
        .route("/comments/{id}", patch(update_comment).delete(delete_comment))
        .route("/user-ips", get(list_user_ips))
}

// ============================================================================
// Categories
// ============================================================================

async fn list_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<category::Model>>, AppError> {
    Ok(Json(store::categories::list(&state.db).await?))
}

async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<category::Model>), AppError> {
    let draft = CategoryDraft {
        title: body.title,
        slug: body.slug,
        description: body.description,
    };
    let created = store::categories::create(&state.db, draft, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<category::Model>, AppError> {
    let patch = CategoryPatch {
        title: body.title,
        slug: body.slug,
        description: body.description,
    };
    let updated = store::categories::update(&state.db, id, patch, state.clock.now()).await?;
    Ok(Json(updated))
}

async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    store::categories::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Games
// ============================================================================

async fn list_games(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<AdminGameRow>>, AppError> {
    let games = store::games::list_all(&state.db).await?;
    let ids: Vec<i32> = games.iter().map(|g| g.id).collect();
    let mut equipment = store::games::equipment_for(&state.db, &ids).await?;

    let rows = games
        .into_iter()
        .map(|game| {
            let names = equipment.remove(&game.id).unwrap_or_default();
            AdminGameRow::new(game, names)
        })
        .collect();
    Ok(Json(rows))
}

async fn game_row(state: &AppState, game: game::Model) -> Result<AdminGameRow, AppError> {
    let names = store::games::equipment_for(&state.db, &[game.id])
        .await?
        .remove(&game.id)
        .unwrap_or_default();
    Ok(AdminGameRow::new(game, names))
}

async fn create_game(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<AdminGameRow>), AppError> {
    let game = store::games::create(&state.db, body.into(), state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(game_row(&state, game).await?)))
}

async fn update_game(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateGameRequest>,
) -> Result<Json<AdminGameRow>, AppError> {
    let game = store::games::update(&state.db, id, body.into(), state.clock.now()).await?;
    Ok(Json(game_row(&state, game).await?))
}

async fn run_action(
    state: &AppState,
    view: GameAdminView,
    slug: &str,
    ids: &[i32],
) -> Result<Json<ActionReport>, AppError> {
    let action = view
        .action(slug)
        .ok_or_else(|| AppError::NotFound(format!("Unknown action \"{slug}\".")))?;
    let report = action.apply(&state.db, ids, state.clock.now()).await?;
    Ok(Json(report))
}

async fn run_games_action(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(action): Path<String>,
    Json(body): Json<ActionRequest>,
) -> Result<Json<ActionReport>, AppError> {
    run_action(&state, GameAdminView::Games, &action, &body.ids).await
}

// ============================================================================
// Statistics view
// ============================================================================

async fn list_games_with_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<GameStatsView>>, AppError> {
    let stats = games_with_stats(&state.db, state.clock.now()).await?;
    Ok(Json(stats.into_iter().map(GameStatsView::from).collect()))
}

async fn run_stats_action(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(action): Path<String>,
    Json(body): Json<ActionRequest>,
) -> Result<Json<ActionReport>, AppError> {
    run_action(&state, GameAdminView::GamesWithStats, &action, &body.ids).await
}

// ============================================================================
// Comments
// ============================================================================

async fn list_comments(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<AdminCommentRow>>, AppError> {
    let rows = store::comments::list_recent(&state.db, COMMENT_LISTING_LIMIT)
        .await?
        .into_iter()
        .map(|(comment, author)| AdminCommentRow::new(comment, author))
        .collect();
    Ok(Json(rows))
}

async fn update_comment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(body): Json<CommentFeedbackRequest>,
) -> Result<Json<AdminCommentRow>, AppError> {
    let patch = CommentPatch {
        rating: body.rating,
        upvotes: body.upvotes,
        downvotes: body.downvotes,
    };
    let comment =
        store::comments::update_feedback(&state.db, id, patch, state.clock.now()).await?;
    let author = match comment.author_id {
        Some(author_id) => store::users::find_by_id(&state.db, author_id).await?,
        None => None,
    };
    Ok(Json(AdminCommentRow::new(comment, author)))
}

async fn delete_comment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    store::comments::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// User IPs
// ============================================================================

async fn list_user_ips(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<user_ip::Model>>, AppError> {
    Ok(Json(ip_ledger::list(&state.db).await?))
}
