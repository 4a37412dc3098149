use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::dto::CommentView;
use crate::entities::{comment, user};

/// Top-level comments of a game, newest first, each carrying its replies oldest first.
///
/// Two queries at most: one for the roots and one for all of their replies.
/// An unknown game simply has no comments.
///
/// # Errors
///
/// Returns a database error if either query fails.
pub async fn comments_for_game(
    db: &DatabaseConnection,
    game_id: i32,
    now: DateTime<Utc>,
) -> Result<Vec<CommentView>, DbErr> {
    let roots = comment::Entity::find()
        .find_also_related(user::Entity)
        .filter(comment::Column::GameId.eq(game_id))
        .filter(comment::Column::ParentId.is_null())
        .order_by_desc(comment::Column::Created)
        .order_by_desc(comment::Column::Id)
        .all(db)
        .await?;
    if roots.is_empty() {
        return Ok(Vec::new());
    }

    let root_ids: Vec<i32> = roots.iter().map(|(root, _)| root.id).collect();
    let replies = comment::Entity::find()
        .find_also_related(user::Entity)
        .filter(comment::Column::ParentId.is_in(root_ids))
        .order_by_asc(comment::Column::Created)
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await?;

    let mut by_parent: HashMap<i32, Vec<CommentView>> = HashMap::new();
    for (reply, author) in &replies {
        if let Some(parent_id) = reply.parent_id {
            by_parent
                .entry(parent_id)
                .or_default()
                .push(CommentView::new(reply, author.as_ref(), now));
        }
    }

    Ok(roots
        .iter()
        .map(|(root, author)| {
            CommentView::new(root, author.as_ref(), now)
                .with_replies(by_parent.remove(&root.id).unwrap_or_default())
        })
        .collect())
}
