//! Field-level validation shared by the JSON endpoints and the storage layer.
//!
//! Validators are pure: anything that needs the database (the parent comment, whether
//! the game exists) is resolved by the caller and passed in.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::comment;

pub const MIN_COMMENT_LEN: usize = 2;
pub const MAX_COMMENT_LEN: usize = 2000;
pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 10;

pub const PARENT_MISSING: &str = "Parent comment does not exist.";
pub const REPLY_TO_REPLY: &str = "Cannot reply to a reply.";
pub const PARENT_OTHER_GAME: &str = "Reply must be under the same Game as Parent.";
pub const GAME_MISSING: &str = "Game does not exist.";
pub const FIELD_REQUIRED: &str = "This field is required.";

/// Field name to list of messages, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a single failing field.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Take over the fields of `other` that have no messages here yet.
    pub fn absorb(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_insert(messages);
        }
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// How strictly comment text is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPolicy {
    /// Text posted through the public form: trimmed length within 2..=2000.
    Submitted,
    /// Any stored comment: must not be blank.
    Stored,
}

/// A comment about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub game_id: i32,
    pub author_id: Option<i32>,
    pub parent_id: Option<i32>,
    pub text: String,
    pub rating: Option<i16>,
    pub upvotes: i16,
    pub downvotes: i16,
    pub attachment: Option<String>,
}

impl CommentDraft {
    /// Draft for a comment posted by a user; text is trimmed.
    #[must_use]
    pub fn submitted(game_id: i32, author_id: i32, text: &str, parent_id: Option<i32>) -> Self {
        Self {
            game_id,
            author_id: Some(author_id),
            parent_id,
            text: text.trim().to_string(),
            rating: None,
            upvotes: 0,
            downvotes: 0,
            attachment: None,
        }
    }
}

/// Rows a comment draft refers to, looked up by the caller.
#[derive(Debug, Clone, Copy)]
pub struct CommentRefs<'a> {
    pub game_exists: bool,
    /// `None` either when no parent was requested or when it was not found.
    pub parent: Option<&'a comment::Model>,
}

/// Check a comment draft. Each field stops at its first failure.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate_comment(
    draft: &CommentDraft,
    refs: CommentRefs<'_>,
    policy: TextPolicy,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(message) = check_text(&draft.text, policy) {
        errors.add("text", message);
    }

    if let Some(rating) = draft.rating {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            errors.add(
                "rating",
                format!("Rating must be between {MIN_RATING} and {MAX_RATING}."),
            );
        }
    }

    if draft.upvotes < 0 {
        errors.add("upvotes", "Ensure this value is greater than or equal to 0.");
    }
    if draft.downvotes < 0 {
        errors.add("downvotes", "Ensure this value is greater than or equal to 0.");
    }

    if let Some(parent_id) = draft.parent_id {
        match refs.parent {
            Some(parent) if parent.id != parent_id => errors.add("parent", PARENT_MISSING),
            None => errors.add("parent", PARENT_MISSING),
            Some(parent) if parent.is_reply() => errors.add("parent", REPLY_TO_REPLY),
            Some(parent) if parent.game_id != draft.game_id => {
                errors.add("parent", PARENT_OTHER_GAME);
            }
            Some(_) => {}
        }
    }

    if !refs.game_exists {
        errors.add("game", GAME_MISSING);
    }

    errors.into_result()
}

fn check_text(text: &str, policy: TextPolicy) -> Result<(), String> {
    match policy {
        TextPolicy::Submitted => {
            let len = text.trim().chars().count();
            if len < MIN_COMMENT_LEN {
                Err(format!(
                    "Comment is too short (min {MIN_COMMENT_LEN} characters)."
                ))
            } else if len > MAX_COMMENT_LEN {
                Err(format!(
                    "Comment is too long (max {MAX_COMMENT_LEN} characters)."
                ))
            } else {
                Ok(())
            }
        }
        TextPolicy::Stored if text.trim().is_empty() => Err(FIELD_REQUIRED.to_string()),
        TextPolicy::Stored => Ok(()),
    }
}

/// URL-safe: ASCII letters, digits, hyphens and underscores.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
