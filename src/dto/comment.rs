use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::{comment, user};
use crate::utils::time_ago;

/// Shown in place of a removed author.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

// ============ Response DTOs ============

/// One comment as returned by the comment endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub author_name: String,
    pub text: String,
    /// Integer rating, or `"-"` when unrated.
    #[serde(serialize_with = "rating_or_dash")]
    pub rating: Option<i16>,
    pub upvotes: i16,
    pub downvotes: i16,
    pub time_ago: String,
    pub parent_id: Option<i32>,
    /// Present on top-level comments of a tree only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<CommentView>>,
}

impl CommentView {
    /// Flat projection without a `replies` field.
    #[must_use]
    pub fn new(comment: &comment::Model, author: Option<&user::Model>, now: DateTime<Utc>) -> Self {
        Self {
            id: comment.id,
            author_name: author.map_or_else(
                || ANONYMOUS_AUTHOR.to_string(),
                |user| user.username.clone(),
            ),
            text: comment.text.clone(),
            rating: comment.rating,
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
            time_ago: time_ago(comment.created, now),
            parent_id: comment.parent_id,
            replies: None,
        }
    }

    #[must_use]
    pub fn with_replies(mut self, replies: Vec<Self>) -> Self {
        self.replies = Some(replies);
        self
    }
}

fn rating_or_dash<S: Serializer>(rating: &Option<i16>, serializer: S) -> Result<S::Ok, S::Error> {
    match rating {
        Some(value) => serializer.serialize_i16(*value),
        None => serializer.serialize_str("-"),
    }
}

/// Body of a successful reply.
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub success: bool,
    pub comment: CommentView,
}

/// Comment row in the curator listing.
#[derive(Debug, Serialize)]
pub struct AdminCommentRow {
    pub id: i32,
    pub game_id: i32,
    pub parent_id: Option<i32>,
    pub author_name: String,
    pub text: String,
    pub rating: Option<i16>,
    pub upvotes: i16,
    pub downvotes: i16,
    pub created: DateTime<Utc>,
}

impl AdminCommentRow {
    #[must_use]
    pub fn new(comment: comment::Model, author: Option<user::Model>) -> Self {
        Self {
            id: comment.id,
            game_id: comment.game_id,
            parent_id: comment.parent_id,
            author_name: author.map_or_else(|| ANONYMOUS_AUTHOR.to_string(), |user| user.username),
            text: comment.text,
            rating: comment.rating,
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
            created: comment.created,
        }
    }
}

// ============ Request DTOs ============

/// PATCH /admin/comments/{id}
#[derive(Debug, Default, Deserialize)]
pub struct CommentFeedbackRequest {
    /// Absent keeps the rating, `null` clears it.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub rating: Option<Option<i16>>,
    pub upvotes: Option<i16>,
    pub downvotes: Option<i16>,
}

/// Distinguishes an explicit `null` from a missing field.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample(rating: Option<i16>) -> comment::Model {
        let now = Utc::now();
        comment::Model {
            id: 7,
            author_id: None,
            game_id: 1,
            parent_id: None,
            text: "great fun".to_string(),
            attachment: None,
            rating,
            upvotes: 2,
            downvotes: 0,
            created: now,
            modified: now,
        }
    }

    #[test]
    fn unrated_comment_serializes_dash_and_no_replies_key() {
        let view = CommentView::new(&sample(None), None, Utc::now());
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["rating"], json!("-"));
        assert_eq!(value["author_name"], json!(ANONYMOUS_AUTHOR));
        assert!(value.get("replies").is_none());
        assert_eq!(value["parent_id"], json!(null));
    }

    #[test]
    fn root_with_empty_replies_keeps_the_key() {
        let view = CommentView::new(&sample(Some(8)), None, Utc::now()).with_replies(Vec::new());
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["rating"], json!(8));
        assert_eq!(value["replies"], json!([]));
    }

    #[test]
    fn feedback_request_distinguishes_null_from_missing() {
        let cleared: CommentFeedbackRequest =
            serde_json::from_value(json!({"rating": null})).unwrap();
        assert_eq!(cleared.rating, Some(None));

        let untouched: CommentFeedbackRequest =
            serde_json::from_value(json!({"upvotes": 3})).unwrap();
        assert_eq!(untouched.rating, None);
        assert_eq!(untouched.upvotes, Some(3));
    }
}
