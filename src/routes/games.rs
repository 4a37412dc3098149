use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::dto::{CategoryGroup, GameDetail};
use crate::error::AppError;
use crate::state::AppState;
use crate::store;

/// Public catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games/", get(catalog))
        .route("/games/{game}/", get(game_detail))
}

/// Active games grouped by category.
async fn catalog(State(state): State<AppState>) -> Result<Json<Vec<CategoryGroup>>, AppError> {
    let categories = store::categories::list(&state.db).await?;
    let games = store::games::list_active(&state.db).await?;

    Ok(Json(CategoryGroup::group(&categories, &games)))
}

async fn game_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GameDetail>, AppError> {
    let game = store::games::find_active_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No game with slug \"{slug}\".")))?;

    let category = match game.category_id {
        Some(id) => store::categories::find_by_id(&state.db, id).await?,
        None => None,
    };
    let equipment = store::games::equipment_for(&state.db, &[game.id])
        .await?
        .remove(&game.id)
        .unwrap_or_default();

    Ok(Json(GameDetail::new(&game, category.as_ref(), equipment)))
}
