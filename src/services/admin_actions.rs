//! Bulk actions a curator can run on a selection of games.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};
use serde::Serialize;

use crate::entities::{Environment, comment, game};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    SetEnvironmentIndoor,
    ResetRating,
    SoftDelete,
}

impl GameAction {
    pub const ALL: [Self; 3] = [Self::SetEnvironmentIndoor, Self::ResetRating, Self::SoftDelete];

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::SetEnvironmentIndoor => "set-environment-indoor",
            Self::ResetRating => "reset-rating",
            Self::SoftDelete => "soft-delete",
        }
    }

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.slug() == slug)
    }

    /// Run the action on the selected games.
    ///
    /// # Errors
    ///
    /// Returns a database error if the bulk update fails.
    pub async fn apply(
        self,
        db: &DatabaseConnection,
        game_ids: &[i32],
        now: DateTime<Utc>,
    ) -> Result<ActionReport, DbErr> {
        let ids = game_ids.iter().copied();
        let affected = match self {
            Self::SetEnvironmentIndoor => {
                game::Entity::update_many()
                    .set(game::ActiveModel {
                        environment: ActiveValue::Set(Environment::Indoor),
                        modified: ActiveValue::Set(now),
                        ..Default::default()
                    })
                    .filter(game::Column::Id.is_in(ids))
                    .exec(db)
                    .await?
                    .rows_affected
            }
            Self::SoftDelete => {
                game::Entity::update_many()
                    .set(game::ActiveModel {
                        is_active: ActiveValue::Set(false),
                        modified: ActiveValue::Set(now),
                        ..Default::default()
                    })
                    .filter(game::Column::Id.is_in(ids))
                    .exec(db)
                    .await?
                    .rows_affected
            }
            Self::ResetRating => {
                comment::Entity::update_many()
                    .set(comment::ActiveModel {
                        rating: ActiveValue::Set(None),
                        modified: ActiveValue::Set(now),
                        ..Default::default()
                    })
                    .filter(comment::Column::GameId.is_in(ids))
                    .exec(db)
                    .await?
                    .rows_affected
            }
        };

        tracing::info!(action = self.slug(), affected_count = affected, "admin action applied");
        Ok(ActionReport {
            affected_count: affected,
            message: self.message(affected),
        })
    }

    fn message(self, count: u64) -> String {
        let one = count == 1;
        match self {
            Self::SetEnvironmentIndoor if one => "1 game was moved indoors.".to_string(),
            Self::SetEnvironmentIndoor => format!("{count} games were moved indoors."),
            Self::ResetRating if one => "Rating was reset on 1 comment.".to_string(),
            Self::ResetRating => format!("Rating was reset on {count} comments."),
            Self::SoftDelete if one => "1 game was deactivated.".to_string(),
            Self::SoftDelete => format!("{count} games were deactivated."),
        }
    }
}

/// Which listing an action is triggered from. Each listing offers a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAdminView {
    Games,
    GamesWithStats,
}

impl GameAdminView {
    #[must_use]
    pub const fn actions(self) -> &'static [GameAction] {
        match self {
            Self::Games => &[GameAction::SetEnvironmentIndoor],
            Self::GamesWithStats => &[GameAction::ResetRating, GameAction::SoftDelete],
        }
    }

    /// The action named `slug`, if this view offers it.
    #[must_use]
    pub fn action(self, slug: &str) -> Option<GameAction> {
        GameAction::from_slug(slug).filter(|action| self.actions().contains(action))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub affected_count: u64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_offer_fixed_action_lists() {
        assert_eq!(
            GameAdminView::Games.action("set-environment-indoor"),
            Some(GameAction::SetEnvironmentIndoor)
        );
        assert_eq!(GameAdminView::Games.action("soft-delete"), None);
        assert_eq!(GameAdminView::Games.action("delete-selected"), None);
        assert_eq!(
            GameAdminView::GamesWithStats.action("reset-rating"),
            Some(GameAction::ResetRating)
        );
        assert_eq!(GameAdminView::GamesWithStats.action("set-environment-indoor"), None);
    }

    #[test]
    fn slugs_round_trip() {
        for action in GameAction::ALL {
            assert_eq!(GameAction::from_slug(action.slug()), Some(action));
        }
    }

    #[test]
    fn messages_are_pluralized() {
        assert_eq!(GameAction::SoftDelete.message(1), "1 game was deactivated.");
        assert_eq!(
            GameAction::ResetRating.message(3),
            "Rating was reset on 3 comments."
        );
    }
}
