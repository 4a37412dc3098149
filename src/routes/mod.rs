mod admin;
mod comments;
mod games;
mod health;

use axum::Router;
use axum::middleware::from_fn_with_state;

use crate::middleware::record_user_ip;
use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health` database connectivity check
/// - `GET /games/`, `GET /games/{slug}/` public catalog
/// - `GET /games/{id}/comments/`, `POST /games/{id}/reply/` comment tree and replies
/// - `/admin/...` curator surface, admin role only
///
/// Every request passes through the user IP ledger.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(games::router())
        .merge(comments::router())
        .nest("/admin", admin::router())
        .layer(from_fn_with_state(state.clone(), record_user_ip))
        .with_state(state)
}
