use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sea_orm::EntityTrait;

use crate::auth::jwt;
use crate::entities::user;
use crate::error::AppError;
use crate::state::AppState;

/// Whoever sent the request: a known user or the anonymous caller.
///
/// A missing, malformed or expired token, or one naming a user that no longer
/// exists, all resolve to `Anonymous`. The result is cached in the request
/// extensions so later extractors do not hit the database again.
#[derive(Debug, Clone)]
pub enum CurrentUser {
    Authenticated(user::Model),
    Anonymous,
}

impl CurrentUser {
    #[must_use]
    pub const fn user(&self) -> Option<&user::Model> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}

fn bearer_user_id(parts: &Parts, secret: &str) -> Option<i32> {
    let token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?
        .strip_prefix("Bearer ")?;

    match jwt::validate_access_token(token, secret) {
        Ok(claims) => claims.user_id(),
        Err(err) => {
            tracing::debug!("Ignoring bearer token: {err}");
            None
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<Self>() {
            return Ok(cached.clone());
        }

        let user = match bearer_user_id(parts, &state.config.jwt_secret) {
            Some(id) => user::Entity::find_by_id(id).one(&state.db).await?,
            None => None,
        };
        let current = user.map_or(Self::Anonymous, Self::Authenticated);

        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// Authenticated user; anonymous callers are turned away with 401.
///
/// ```ignore
/// async fn handler(AuthUser(user): AuthUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await? {
            CurrentUser::Authenticated(user) => Ok(Self(user)),
            CurrentUser::Anonymous => Err(AppError::AuthRequired),
        }
    }
}

/// Requires the authenticated user to have the `"admin"` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_model) = AuthUser::from_request_parts(parts, state).await?;

        if !user_model.is_admin() {
            return Err(AppError::Forbidden("Admin role required.".to_string()));
        }

        Ok(Self(user_model))
    }
}
