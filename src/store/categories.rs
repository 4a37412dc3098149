use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use super::StoreError;
use crate::entities::{category, game};
use crate::utils::slug::{MAX_SLUG_LEN, slugify};
use crate::validation::{ValidationErrors, is_valid_slug};

const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, Default)]
pub struct CategoryDraft {
    pub title: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

fn validate(title: &str, slug: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if title.trim().is_empty() {
        errors.add("title", "This field is required.");
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            "title",
            format!("Ensure this value has at most {MAX_TITLE_LEN} characters."),
        );
    }
    if !is_valid_slug(slug) {
        errors.add(
            "slug",
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
        );
    } else if slug.len() > MAX_SLUG_LEN {
        errors.add(
            "slug",
            format!("Ensure this value has at most {MAX_SLUG_LEN} characters."),
        );
    }
    errors.into_result()
}

/// # Errors
///
/// `Validation` for a bad title or slug, `Conflict` if the slug is taken.
pub async fn create(
    db: &DatabaseConnection,
    draft: CategoryDraft,
    now: DateTime<Utc>,
) -> Result<category::Model, StoreError> {
    let slug = draft.slug.unwrap_or_else(|| slugify(&draft.title));
    validate(&draft.title, &slug)?;

    let category = category::ActiveModel {
        title: ActiveValue::Set(draft.title.trim().to_string()),
        slug: ActiveValue::Set(slug),
        description: ActiveValue::Set(draft.description),
        created: ActiveValue::Set(now),
        modified: ActiveValue::Set(now),
        ..Default::default()
    };

    Ok(category.insert(db).await?)
}

/// # Errors
///
/// `NotFound`, `Validation` or `Conflict` as for [`create`].
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    patch: CategoryPatch,
    now: DateTime<Utc>,
) -> Result<category::Model, StoreError> {
    let existing = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound("category"))?;

    let title = patch.title.unwrap_or_else(|| existing.title.clone());
    let slug = patch.slug.unwrap_or_else(|| existing.slug.clone());
    validate(&title, &slug)?;

    let mut active: category::ActiveModel = existing.into();
    active.title = ActiveValue::Set(title.trim().to_string());
    active.slug = ActiveValue::Set(slug);
    if let Some(description) = patch.description {
        active.description = ActiveValue::Set(description);
    }
    active.modified = ActiveValue::Set(now);

    Ok(active.update(db).await?)
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<category::Model>, StoreError> {
    Ok(category::Entity::find_by_id(id).one(db).await?)
}

/// All categories ordered by title.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<category::Model>, StoreError> {
    Ok(category::Entity::find()
        .order_by_asc(category::Column::Title)
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?)
}

/// Delete a category that no game refers to.
///
/// # Errors
///
/// `NotFound` if missing, `Conflict` while any game (active or not) still uses it.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    let existing = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound("category"))?;

    let referencing = game::Entity::find()
        .filter(game::Column::CategoryId.eq(existing.id))
        .count(db)
        .await?;
    if referencing > 0 {
        return Err(StoreError::Conflict(format!(
            "Cannot delete category \"{}\": {referencing} game(s) still belong to it.",
            existing.title
        )));
    }

    category::Entity::delete_by_id(existing.id).exec(db).await?;
    tracing::info!(category_id = existing.id, "category deleted");
    Ok(())
}
