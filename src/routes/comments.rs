use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value};

use crate::auth::AuthUser;
use crate::dto::{CommentView, ReplyResponse};
use crate::error::AppError;
use crate::services::comments_for_game;
use crate::state::AppState;
use crate::store;
use crate::validation::{
    CommentDraft, FIELD_REQUIRED, TextPolicy, ValidationErrors, validate_comment,
};

/// Comment tree and reply endpoints. Any method other than the one routed gets 405.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games/{game}/comments/", get(list_comments))
        .route("/games/{game}/reply/", post(reply))
}

async fn list_comments(
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
) -> Result<Json<Vec<CommentView>>, AppError> {
    let tree = comments_for_game(&state.db, game_id, state.clock.now()).await?;
    Ok(Json(tree))
}

/// Fields of a reply body after type coercion.
///
/// A field that cannot be coerced falls back to its empty value and its message is kept
/// in `errors`, so the remaining checks still run.
#[derive(Debug, Default, PartialEq, Eq)]
struct ReplyPayload {
    text: String,
    parent: Option<i32>,
    errors: ValidationErrors,
}

impl ReplyPayload {
    fn parse(body: &[u8]) -> Result<Self, AppError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| AppError::MalformedBody(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(AppError::MalformedBody(
                "Request body must be a JSON object.".to_string(),
            ));
        };

        let mut errors = ValidationErrors::new();
        let text = coerce_text(&fields).unwrap_or_else(|msg| {
            errors.add("text", msg);
            String::new()
        });
        let parent = coerce_parent(&fields).unwrap_or_else(|msg| {
            errors.add("parent", msg);
            None
        });

        Ok(Self {
            text,
            parent,
            errors,
        })
    }
}

fn coerce_text(fields: &Map<String, Value>) -> Result<String, &'static str> {
    match fields.get("text") {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(Value::String(_) | Value::Null) | None => Err(FIELD_REQUIRED),
        Some(_) => Err("Enter a valid text."),
    }
}

/// Parent id from a number or numeric string. Blank, null and `0` mean no parent.
fn coerce_parent(fields: &Map<String, Value>) -> Result<Option<i32>, &'static str> {
    const NOT_A_NUMBER: &str = "Enter a whole number.";

    let id = match fields.get("parent") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => return Ok(None),
        Some(Value::String(raw)) => raw.trim().parse().map_err(|_| NOT_A_NUMBER)?,
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or(NOT_A_NUMBER)?,
        Some(_) => return Err(NOT_A_NUMBER),
    };
    Ok((id != 0).then_some(id))
}

/// Post a top-level comment or a reply to one.
async fn reply(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(game_id): Path<i32>,
    body: Bytes,
) -> Result<Json<ReplyResponse>, AppError> {
    let payload = ReplyPayload::parse(&body)?;
    let draft = CommentDraft::submitted(game_id, user.id, &payload.text, payload.parent);

    let refs = store::comments::resolve_references(&state.db, game_id, draft.parent_id).await?;
    let mut errors = payload.errors;
    if let Err(checked) = validate_comment(&draft, refs.as_refs(), TextPolicy::Submitted) {
        errors.absorb(checked);
    }
    errors.into_result()?;

    let now = state.clock.now();
    let comment = store::comments::create(&state.db, draft, now).await?;
    tracing::info!(
        comment_id = comment.id,
        game_id,
        user_id = user.id,
        parent_id = ?comment.parent_id,
        "comment posted"
    );

    Ok(Json(ReplyResponse {
        success: true,
        comment: CommentView::new(&comment, Some(&user), now),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ReplyPayload {
        match ReplyPayload::parse(body.as_bytes()) {
            Ok(payload) => payload,
            Err(err) => ReplyPayload {
                errors: ValidationErrors::single("body", format!("{err:?}")),
                ..ReplyPayload::default()
            },
        }
    }

    #[test]
    fn accepts_text_and_numeric_or_string_parent() {
        let expected = ReplyPayload {
            text: "nice".to_string(),
            parent: Some(3),
            errors: ValidationErrors::new(),
        };
        assert_eq!(parse(r#"{"text":" nice ","parent":3}"#), expected);
        assert_eq!(parse(r#"{"text":"nice","parent":"3"}"#).parent, Some(3));
        assert_eq!(parse(r#"{"text":"nice","parent":""}"#).parent, None);
        assert_eq!(parse(r#"{"text":"nice","parent":null}"#).parent, None);
    }

    #[test]
    fn zero_parent_means_top_level() {
        let payload = parse(r#"{"text":"nice","parent":0}"#);
        assert_eq!(payload.parent, None);
        assert!(payload.errors.is_empty());
        assert_eq!(parse(r#"{"text":"nice","parent":"0"}"#).parent, None);
    }

    #[test]
    fn missing_or_blank_text_is_required() {
        let payload = parse(r#"{"tt":"bad","pent":null}"#);
        assert_eq!(payload.errors.messages("text"), [FIELD_REQUIRED]);

        let payload = parse(r#"{"text":"   "}"#);
        assert_eq!(payload.errors.messages("text"), [FIELD_REQUIRED]);
    }

    #[test]
    fn bad_text_keeps_the_parent_for_later_checks() {
        let payload = parse(r#"{"text":"","parent":7}"#);
        assert!(payload.errors.has("text"));
        assert_eq!(payload.parent, Some(7));
    }

    #[test]
    fn non_numeric_parent_is_rejected() {
        assert!(parse(r#"{"text":"ok","parent":"abc"}"#).errors.has("parent"));
        assert!(parse(r#"{"text":"ok","parent":[1]}"#).errors.has("parent"));
    }

    #[test]
    fn malformed_json_and_non_objects_are_body_errors() {
        assert!(matches!(
            ReplyPayload::parse(b"{not json"),
            Err(AppError::MalformedBody(_))
        ));
        assert!(matches!(
            ReplyPayload::parse(b"[1,2]"),
            Err(AppError::MalformedBody(_))
        ));
    }
}
