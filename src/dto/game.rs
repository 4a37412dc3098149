use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::comment::deserialize_some;
use crate::entities::{Environment, category, game};
use crate::services::GameStats;
use crate::services::stats::format_rating;
use crate::store::games::{GameDraft, GamePatch};

// ============ Response DTOs ============

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: i32,
    pub title: String,
    pub slug: String,
}

impl From<&category::Model> for CategoryRef {
    fn from(category: &category::Model) -> Self {
        Self {
            id: category.id,
            title: category.title.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// Game as shown in the catalog listing.
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub min_players: i16,
    pub max_players: i16,
    pub min_duration: i16,
    pub max_duration: i16,
    pub environment: Environment,
    pub environment_label: &'static str,
}

impl From<&game::Model> for GameSummary {
    fn from(game: &game::Model) -> Self {
        Self {
            id: game.id,
            title: game.title.clone(),
            slug: game.slug.clone(),
            min_players: game.min_players,
            max_players: game.max_players,
            min_duration: game.min_duration,
            max_duration: game.max_duration,
            environment: game.environment,
            environment_label: game.environment.label(),
        }
    }
}

/// Catalog section: one category (or none) and its active games.
#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub category: Option<CategoryRef>,
    pub games: Vec<GameSummary>,
}

impl CategoryGroup {
    /// Group games under their categories, in category title order, with uncategorized
    /// games last. Categories without games are left out.
    #[must_use]
    pub fn group(categories: &[category::Model], games: &[game::Model]) -> Vec<Self> {
        let mut by_category: HashMap<Option<i32>, Vec<GameSummary>> = HashMap::new();
        for game in games {
            by_category
                .entry(game.category_id)
                .or_default()
                .push(GameSummary::from(game));
        }

        let mut groups: Vec<Self> = categories
            .iter()
            .filter_map(|category| {
                by_category.remove(&Some(category.id)).map(|games| Self {
                    category: Some(CategoryRef::from(category)),
                    games,
                })
            })
            .collect();
        if let Some(games) = by_category.remove(&None) {
            groups.push(Self {
                category: None,
                games,
            });
        }
        groups
    }
}

/// GET /games/{slug}/
#[derive(Debug, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub summary: GameSummary,
    pub description: String,
    pub category: Option<CategoryRef>,
    pub equipment: Vec<String>,
    pub attachments: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl GameDetail {
    #[must_use]
    pub fn new(game: &game::Model, category: Option<&category::Model>, equipment: Vec<String>) -> Self {
        Self {
            summary: GameSummary::from(game),
            description: game.description.clone(),
            category: category.map(CategoryRef::from),
            equipment,
            attachments: game.attachments.clone(),
            created: game.created,
            modified: game.modified,
        }
    }
}

/// Curator listing row with every stored field.
#[derive(Debug, Serialize)]
pub struct AdminGameRow {
    #[serde(flatten)]
    pub game: game::Model,
    pub environment_label: &'static str,
    pub equipment: Vec<String>,
}

impl AdminGameRow {
    #[must_use]
    pub fn new(game: game::Model, equipment: Vec<String>) -> Self {
        Self {
            environment_label: game.environment.label(),
            game,
            equipment,
        }
    }
}

/// Row of the statistics view; `avg_rating` is rendered with two decimals.
#[derive(Debug, Serialize)]
pub struct GameStatsView {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub is_active: bool,
    pub avg_rating: String,
    pub comments_count: i64,
    pub last_comment: Option<String>,
    pub comments_count_last_day: i64,
    pub was_updated_last_day: bool,
}

impl From<GameStats> for GameStatsView {
    fn from(stats: GameStats) -> Self {
        Self {
            id: stats.game.id,
            title: stats.game.title,
            slug: stats.game.slug,
            is_active: stats.game.is_active,
            avg_rating: format_rating(stats.avg_rating),
            comments_count: stats.comments_count,
            last_comment: stats.last_comment,
            comments_count_last_day: stats.comments_count_last_day,
            was_updated_last_day: stats.was_updated_last_day,
        }
    }
}

// ============ Request DTOs ============

/// POST /admin/games
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub min_players: Option<i16>,
    pub max_players: Option<i16>,
    pub min_duration: Option<i16>,
    pub max_duration: Option<i16>,
    pub environment: Option<Environment>,
    pub category_id: Option<i32>,
    pub is_active: Option<bool>,
    pub attachments: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
}

impl From<CreateGameRequest> for GameDraft {
    fn from(request: CreateGameRequest) -> Self {
        let defaults = Self::default();
        Self {
            title: request.title,
            slug: request.slug,
            description: request.description,
            min_players: request.min_players.unwrap_or(defaults.min_players),
            max_players: request.max_players.unwrap_or(defaults.max_players),
            min_duration: request.min_duration.unwrap_or(defaults.min_duration),
            max_duration: request.max_duration.unwrap_or(defaults.max_duration),
            environment: request.environment.unwrap_or(defaults.environment),
            category_id: request.category_id,
            is_active: request.is_active.unwrap_or(defaults.is_active),
            attachments: request.attachments,
            equipment: request.equipment,
        }
    }
}

/// PATCH /admin/games/{id}
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGameRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub min_players: Option<i16>,
    pub max_players: Option<i16>,
    pub min_duration: Option<i16>,
    pub max_duration: Option<i16>,
    pub environment: Option<Environment>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub attachments: Option<Option<String>>,
    pub equipment: Option<Vec<String>>,
}

impl From<UpdateGameRequest> for GamePatch {
    fn from(request: UpdateGameRequest) -> Self {
        Self {
            title: request.title,
            slug: request.slug,
            description: request.description,
            min_players: request.min_players,
            max_players: request.max_players,
            min_duration: request.min_duration,
            max_duration: request.max_duration,
            environment: request.environment,
            category_id: request.category_id,
            is_active: request.is_active,
            attachments: request.attachments,
            equipment: request.equipment,
        }
    }
}

/// POST /admin/categories
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// PATCH /admin/categories/{id}
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Body of every bulk action.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub ids: Vec<i32>,
}
