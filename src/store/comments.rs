use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder,
    QuerySelect, TransactionTrait,
};

use super::StoreError;
use crate::entities::{comment, game, user};
use crate::validation::{CommentDraft, CommentRefs, TextPolicy, validate_comment};

/// Rows a draft points at, as found in the database.
#[derive(Debug, Clone)]
pub struct ResolvedRefs {
    pub game_exists: bool,
    pub parent: Option<comment::Model>,
}

impl ResolvedRefs {
    #[must_use]
    pub fn as_refs(&self) -> CommentRefs<'_> {
        CommentRefs {
            game_exists: self.game_exists,
            parent: self.parent.as_ref(),
        }
    }
}

/// Look up the game and the optional parent of a comment.
///
/// # Errors
///
/// Returns a database error if a lookup fails.
pub async fn resolve_references<C: ConnectionTrait>(
    conn: &C,
    game_id: i32,
    parent_id: Option<i32>,
) -> Result<ResolvedRefs, StoreError> {
    let game_exists = game::Entity::find_by_id(game_id).one(conn).await?.is_some();
    let parent = match parent_id {
        Some(id) => comment::Entity::find_by_id(id).one(conn).await?,
        None => None,
    };
    Ok(ResolvedRefs {
        game_exists,
        parent,
    })
}

/// Insert a comment after rerunning every comment rule against fresh rows.
///
/// Text only has to be non-blank here; the stricter length window belongs to
/// the public reply endpoint.
///
/// # Errors
///
/// `Validation` if a rule fails, `Database` on storage failure.
pub async fn create(
    db: &DatabaseConnection,
    draft: CommentDraft,
    now: DateTime<Utc>,
) -> Result<comment::Model, StoreError> {
    let txn = db.begin().await?;

    let refs = resolve_references(&txn, draft.game_id, draft.parent_id).await?;
    validate_comment(&draft, refs.as_refs(), TextPolicy::Stored)?;

    let comment = comment::ActiveModel {
        author_id: ActiveValue::Set(draft.author_id),
        game_id: ActiveValue::Set(draft.game_id),
        parent_id: ActiveValue::Set(draft.parent_id),
        text: ActiveValue::Set(draft.text),
        attachment: ActiveValue::Set(draft.attachment),
        rating: ActiveValue::Set(draft.rating),
        upvotes: ActiveValue::Set(draft.upvotes),
        downvotes: ActiveValue::Set(draft.downvotes),
        created: ActiveValue::Set(now),
        modified: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::debug!(
        comment_id = comment.id,
        game_id = comment.game_id,
        parent_id = ?comment.parent_id,
        "comment stored"
    );
    Ok(comment)
}

/// Curator edit of the feedback counters. `rating: Some(None)` clears the rating.
#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub rating: Option<Option<i16>>,
    pub upvotes: Option<i16>,
    pub downvotes: Option<i16>,
}

/// # Errors
///
/// `NotFound` for an unknown id, `Validation` when the result breaks a rule.
pub async fn update_feedback(
    db: &DatabaseConnection,
    id: i32,
    patch: CommentPatch,
    now: DateTime<Utc>,
) -> Result<comment::Model, StoreError> {
    let txn = db.begin().await?;
    let existing = comment::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(StoreError::NotFound("comment"))?;

    let draft = CommentDraft {
        game_id: existing.game_id,
        author_id: existing.author_id,
        parent_id: existing.parent_id,
        text: existing.text.clone(),
        rating: patch.rating.unwrap_or(existing.rating),
        upvotes: patch.upvotes.unwrap_or(existing.upvotes),
        downvotes: patch.downvotes.unwrap_or(existing.downvotes),
        attachment: existing.attachment.clone(),
    };
    let refs = resolve_references(&txn, draft.game_id, draft.parent_id).await?;
    validate_comment(&draft, refs.as_refs(), TextPolicy::Stored)?;

    let mut active: comment::ActiveModel = existing.into();
    active.rating = ActiveValue::Set(draft.rating);
    active.upvotes = ActiveValue::Set(draft.upvotes);
    active.downvotes = ActiveValue::Set(draft.downvotes);
    active.modified = ActiveValue::Set(now);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Delete a comment; its replies go with it.
///
/// # Errors
///
/// `NotFound` if no such comment exists.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    let result = comment::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(StoreError::NotFound("comment"));
    }
    tracing::info!(comment_id = id, "comment deleted");
    Ok(())
}

/// Newest comments across all games, with their authors.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_recent(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<(comment::Model, Option<user::Model>)>, StoreError> {
    Ok(comment::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(comment::Column::Created)
        .order_by_desc(comment::Column::Id)
        .limit(limit)
        .all(db)
        .await?)
}
