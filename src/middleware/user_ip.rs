//! Remembers the addresses authenticated users connect from.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::auth::CurrentUser;
use crate::services::ip_ledger;
use crate::state::AppState;

/// Axum middleware: feed the ledger for authenticated callers, then pass the request on.
///
/// Never rejects or alters the request. Ledger failures are logged and dropped.
pub async fn record_user_ip(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let current = CurrentUser::from_request_parts(&mut parts, &state).await;
    let remote = ConnectInfo::<SocketAddr>::from_request_parts(&mut parts, &state).await;

    match (current.as_ref().map(CurrentUser::user), remote) {
        (Ok(Some(user)), Ok(ConnectInfo(addr))) => {
            let ip = addr.ip().to_string();
            match ip_ledger::observe(&state.db, user.id, &ip, state.clock.now()).await {
                Ok(observation) => {
                    debug!(user_id = user.id, ip = %ip, ?observation, "user ip observed");
                }
                Err(err) => warn!(user_id = user.id, ip = %ip, "Failed to record user ip: {err}"),
            }
        }
        (Ok(Some(user)), Err(_)) => {
            warn!(user_id = user.id, "No remote address on request; ip not recorded");
        }
        (Err(err), _) => warn!("Could not resolve caller for ip ledger: {err:?}"),
        (Ok(None), _) => {}
    }

    next.run(Request::from_parts(parts, body)).await
}
