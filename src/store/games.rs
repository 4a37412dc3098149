use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use super::StoreError;
use crate::entities::{Environment, category, game, game_equipment};
use crate::utils::slug::{MAX_SLUG_LEN, slugify};
use crate::validation::{ValidationErrors, is_valid_slug};

const MAX_TITLE_LEN: usize = 255;

/// Every writable field of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDraft {
    pub title: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub description: String,
    pub min_players: i16,
    pub max_players: i16,
    pub min_duration: i16,
    pub max_duration: i16,
    pub environment: Environment,
    pub category_id: Option<i32>,
    pub is_active: bool,
    pub attachments: Option<String>,
    pub equipment: Vec<String>,
}

impl Default for GameDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: None,
            description: String::new(),
            min_players: 1,
            max_players: 10,
            min_duration: 1,
            max_duration: 30,
            environment: Environment::Outdoor,
            category_id: None,
            is_active: true,
            attachments: None,
            equipment: Vec::new(),
        }
    }
}

/// Partial update. `category_id: Some(None)` detaches the category.
#[derive(Debug, Clone, Default)]
pub struct GamePatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub min_players: Option<i16>,
    pub max_players: Option<i16>,
    pub min_duration: Option<i16>,
    pub max_duration: Option<i16>,
    pub environment: Option<Environment>,
    pub category_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
    pub attachments: Option<Option<String>>,
    pub equipment: Option<Vec<String>>,
}

impl GameDraft {
    fn from_model(model: &game::Model, equipment: Vec<String>) -> Self {
        Self {
            title: model.title.clone(),
            slug: Some(model.slug.clone()),
            description: model.description.clone(),
            min_players: model.min_players,
            max_players: model.max_players,
            min_duration: model.min_duration,
            max_duration: model.max_duration,
            environment: model.environment,
            category_id: model.category_id,
            is_active: model.is_active,
            attachments: model.attachments.clone(),
            equipment,
        }
    }

    fn apply(mut self, patch: GamePatch) -> Self {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(slug) = patch.slug {
            self.slug = Some(slug);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(v) = patch.min_players {
            self.min_players = v;
        }
        if let Some(v) = patch.max_players {
            self.max_players = v;
        }
        if let Some(v) = patch.min_duration {
            self.min_duration = v;
        }
        if let Some(v) = patch.max_duration {
            self.max_duration = v;
        }
        if let Some(environment) = patch.environment {
            self.environment = environment;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(attachments) = patch.attachments {
            self.attachments = attachments;
        }
        if let Some(equipment) = patch.equipment {
            self.equipment = equipment;
        }
        self
    }

    fn resolved_slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| slugify(&self.title))
    }
}

/// Field checks plus the `min <= max` invariants.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_game(draft: &GameDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.title.trim().is_empty() {
        errors.add("title", "This field is required.");
    } else if draft.title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            "title",
            format!("Ensure this value has at most {MAX_TITLE_LEN} characters."),
        );
    }

    let slug = draft.resolved_slug();
    if !is_valid_slug(&slug) {
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

    for (field, value) in [
        ("min_players", draft.min_players),
        ("max_players", draft.max_players),
        ("min_duration", draft.min_duration),
        ("max_duration", draft.max_duration),
    ] {
        if value < 1 {
            errors.add(field, "Ensure this value is greater than or equal to 1.");
        }
    }

    if draft.min_players > draft.max_players {
        errors.add(
            "min_players",
            "Minimum players number cannot be bigger than maximum players.",
        );
    }
    if draft.min_duration > draft.max_duration {
        errors.add(
            "min_duration",
            "Minimum duration cannot be bigger than maximum duration.",
        );
    }

    errors.into_result()
}

async fn check_category<C: ConnectionTrait>(
    conn: &C,
    category_id: Option<i32>,
) -> Result<(), StoreError> {
    if let Some(id) = category_id {
        if category::Entity::find_by_id(id).one(conn).await?.is_none() {
            return Err(ValidationErrors::single("category", "Category does not exist.").into());
        }
    }
    Ok(())
}

fn normalize_equipment(names: &[String]) -> BTreeSet<String> {
    names
        .iter()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}

async fn replace_equipment<C: ConnectionTrait>(
    conn: &C,
    game_id: i32,
    names: &[String],
) -> Result<(), StoreError> {
    game_equipment::Entity::delete_many()
        .filter(game_equipment::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;

    let rows: Vec<game_equipment::ActiveModel> = normalize_equipment(names)
        .into_iter()
        .map(|name| game_equipment::ActiveModel {
            game_id: ActiveValue::Set(game_id),
            name: ActiveValue::Set(name),
        })
        .collect();
    if !rows.is_empty() {
        game_equipment::Entity::insert_many(rows).exec(conn).await?;
    }
    Ok(())
}

/// Validate and insert a game together with its equipment.
///
/// # Errors
///
/// `Validation` on a failed check, `Conflict` if the slug is taken.
pub async fn create(
    db: &DatabaseConnection,
    draft: GameDraft,
    now: DateTime<Utc>,
) -> Result<game::Model, StoreError> {
    validate_game(&draft)?;

    let txn = db.begin().await?;
    check_category(&txn, draft.category_id).await?;

    let slug = draft.resolved_slug();
    let game = game::ActiveModel {
        title: ActiveValue::Set(draft.title.trim().to_string()),
        slug: ActiveValue::Set(slug),
        description: ActiveValue::Set(draft.description),
        min_players: ActiveValue::Set(draft.min_players),
        max_players: ActiveValue::Set(draft.max_players),
        min_duration: ActiveValue::Set(draft.min_duration),
        max_duration: ActiveValue::Set(draft.max_duration),
        environment: ActiveValue::Set(draft.environment),
        category_id: ActiveValue::Set(draft.category_id),
        is_active: ActiveValue::Set(draft.is_active),
        attachments: ActiveValue::Set(draft.attachments),
        created: ActiveValue::Set(now),
        modified: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    replace_equipment(&txn, game.id, &draft.equipment).await?;
    txn.commit().await?;

    tracing::info!(game_id = game.id, slug = %game.slug, "game created");
    Ok(game)
}

/// Merge `patch` into the stored game and revalidate the whole record.
///
/// # Errors
///
/// `NotFound`, `Validation` or `Conflict`.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    patch: GamePatch,
    now: DateTime<Utc>,
) -> Result<game::Model, StoreError> {
    let txn = db.begin().await?;
    let existing = game::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(StoreError::NotFound("game"))?;

    let current_equipment = equipment_of(&txn, id).await?;
    let replaces_equipment = patch.equipment.is_some();
    let draft = GameDraft::from_model(&existing, current_equipment).apply(patch);
    validate_game(&draft)?;
    check_category(&txn, draft.category_id).await?;

    let slug = draft.resolved_slug();
    let mut active: game::ActiveModel = existing.into();
    active.title = ActiveValue::Set(draft.title.trim().to_string());
    active.slug = ActiveValue::Set(slug);
    active.description = ActiveValue::Set(draft.description);
    active.min_players = ActiveValue::Set(draft.min_players);
    active.max_players = ActiveValue::Set(draft.max_players);
    active.min_duration = ActiveValue::Set(draft.min_duration);
    active.max_duration = ActiveValue::Set(draft.max_duration);
    active.environment = ActiveValue::Set(draft.environment);
    active.category_id = ActiveValue::Set(draft.category_id);
    active.is_active = ActiveValue::Set(draft.is_active);
    active.attachments = ActiveValue::Set(draft.attachments);
    active.modified = ActiveValue::Set(now);
    let game = active.update(&txn).await?;

    if replaces_equipment {
        replace_equipment(&txn, id, &draft.equipment).await?;
    }
    txn.commit().await?;

    tracing::info!(game_id = game.id, "game updated");
    Ok(game)
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<game::Model>, StoreError> {
    Ok(game::Entity::find_by_id(id).one(db).await?)
}

/// Active game by slug; deactivated games are hidden.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_active_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<game::Model>, StoreError> {
    Ok(game::Entity::find()
        .filter(game::Column::Slug.eq(slug))
        .filter(game::Column::IsActive.eq(true))
        .one(db)
        .await?)
}

/// Active games ordered by title.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_active(db: &DatabaseConnection) -> Result<Vec<game::Model>, StoreError> {
    Ok(game::Entity::find()
        .filter(game::Column::IsActive.eq(true))
        .order_by_asc(game::Column::Title)
        .order_by_asc(game::Column::Id)
        .all(db)
        .await?)
}

/// Every game, including deactivated ones, ordered by title.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<game::Model>, StoreError> {
    Ok(game::Entity::find()
        .order_by_asc(game::Column::Title)
        .order_by_asc(game::Column::Id)
        .all(db)
        .await?)
}

async fn equipment_of<C: ConnectionTrait>(
    conn: &C,
    game_id: i32,
) -> Result<Vec<String>, StoreError> {
    Ok(game_equipment::Entity::find()
        .filter(game_equipment::Column::GameId.eq(game_id))
        .order_by_asc(game_equipment::Column::Name)
        .all(conn)
        .await?
        .into_iter()
        .map(|row| row.name)
        .collect())
}

/// Equipment names per game, each list sorted. Games without equipment are absent.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn equipment_for(
    db: &DatabaseConnection,
    game_ids: &[i32],
) -> Result<HashMap<i32, Vec<String>>, StoreError> {
    let mut by_game: HashMap<i32, Vec<String>> = HashMap::new();
    if game_ids.is_empty() {
        return Ok(by_game);
    }

    let rows = game_equipment::Entity::find()
        .filter(game_equipment::Column::GameId.is_in(game_ids.iter().copied()))
        .order_by_asc(game_equipment::Column::Name)
        .all(db)
        .await?;
    for row in rows {
        by_game.entry(row.game_id).or_default().push(row.name);
    }
    Ok(by_game)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> GameDraft {
        GameDraft {
            title: "Capture the Flag".to_string(),
            ..GameDraft::default()
        }
    }

    #[test]
    fn defaults_are_valid_and_slug_comes_from_title() {
        let draft = draft();
        assert!(validate_game(&draft).is_ok());
        assert_eq!(draft.resolved_slug(), "capture-the-flag");
    }

    #[test]
    fn min_above_max_is_rejected() {
        let bad = GameDraft {
            min_players: 12,
            max_players: 4,
            min_duration: 50,
            max_duration: 10,
            ..draft()
        };
        let errors = validate_game(&bad).err().unwrap_or_default();
        assert!(errors.has("min_players"));
        assert!(errors.has("min_duration"));
    }

    #[test]
    fn patch_overrides_only_given_fields() {
        let merged = draft().apply(GamePatch {
            max_players: Some(40),
            category_id: Some(None),
            ..GamePatch::default()
        });
        assert_eq!(merged.max_players, 40);
        assert_eq!(merged.min_players, 1);
        assert_eq!(merged.title, "Capture the Flag");
    }

    #[test]
    fn equipment_is_trimmed_lowercased_and_deduplicated() {
        let names = vec![" Ball".to_string(), "ball".to_string(), String::new()];
        let set = normalize_equipment(&names);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), ["ball"]);
    }
}
