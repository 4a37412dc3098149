//! Per-game feedback statistics for the curator view.
//!
//! Every figure comes from one grouped query, so the number of round trips does
//! not grow with the number of games.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Expr, Query};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, Order, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::day_before;
use crate::entities::{comment, game};

/// One game with its feedback aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStats {
    pub game: game::Model,
    /// Mean of the non-null ratings.
    pub avg_rating: f64,
    /// Every comment of the game, rated or not, replies included.
    pub comments_count: i64,
    pub last_comment: Option<String>,
    pub comments_count_last_day: i64,
    pub was_updated_last_day: bool,
}

#[derive(Debug, FromQueryResult)]
struct RatingAggregate {
    game_id: i32,
    comments_count: i64,
    rated_count: i64,
    rating_sum: Option<i64>,
}

#[derive(Debug, FromQueryResult)]
struct RecentCount {
    game_id: i32,
    recent: i64,
}

/// Games having at least one rated comment, ordered by title, annotated as of `now`.
///
/// # Errors
///
/// Returns a database error if any of the aggregate queries fails.
pub async fn games_with_stats(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<Vec<GameStats>, DbErr> {
    let horizon = day_before(now);

    let ratings: Vec<RatingAggregate> = comment::Entity::find()
        .select_only()
        .column(comment::Column::GameId)
        .column_as(Expr::col(comment::Column::Id).count(), "comments_count")
        .column_as(Expr::col(comment::Column::Rating).count(), "rated_count")
        .column_as(Expr::col(comment::Column::Rating).sum(), "rating_sum")
        .group_by(comment::Column::GameId)
        .having(Expr::expr(Expr::col(comment::Column::Rating).count()).gt(0))
        .into_model::<RatingAggregate>()
        .all(db)
        .await?;
    if ratings.is_empty() {
        return Ok(Vec::new());
    }
    let game_ids: Vec<i32> = ratings.iter().map(|r| r.game_id).collect();

    let recent: HashMap<i32, i64> = comment::Entity::find()
        .select_only()
        .column(comment::Column::GameId)
        .column_as(Expr::col(comment::Column::Id).count(), "recent")
        .filter(comment::Column::GameId.is_in(game_ids.clone()))
        .filter(comment::Column::Created.gte(horizon))
        .group_by(comment::Column::GameId)
        .into_model::<RecentCount>()
        .all(db)
        .await?
        .into_iter()
        .map(|row| (row.game_id, row.recent))
        .collect();

    let last_comments: HashMap<i32, String> = latest_comments(db, &game_ids)
        .await?
        .into_iter()
        .map(|c| (c.game_id, c.text))
        .collect();

    let aggregates: HashMap<i32, RatingAggregate> =
        ratings.into_iter().map(|r| (r.game_id, r)).collect();

    let games = game::Entity::find()
        .filter(game::Column::Id.is_in(game_ids))
        .order_by_asc(game::Column::Title)
        .order_by_asc(game::Column::Id)
        .all(db)
        .await?;

    Ok(games
        .into_iter()
        .filter_map(|game| {
            let aggregate = aggregates.get(&game.id)?;
            Some(GameStats {
                avg_rating: mean(aggregate.rating_sum.unwrap_or(0), aggregate.rated_count),
                comments_count: aggregate.comments_count,
                last_comment: last_comments.get(&game.id).cloned(),
                comments_count_last_day: recent.get(&game.id).copied().unwrap_or(0),
                was_updated_last_day: game.modified >= horizon,
                game,
            })
        })
        .collect())
}

/// Newest comment of each game, ties broken by the higher id.
async fn latest_comments(
    db: &DatabaseConnection,
    game_ids: &[i32],
) -> Result<Vec<comment::Model>, DbErr> {
    let latest = Alias::new("latest");
    let newest_of_game = Query::select()
        .column((latest.clone(), comment::Column::Id))
        .from_as(comment::Entity, latest.clone())
        .and_where(
            Expr::col((latest.clone(), comment::Column::GameId))
                .equals((comment::Entity, comment::Column::GameId)),
        )
        .order_by((latest.clone(), comment::Column::Created), Order::Desc)
        .order_by((latest, comment::Column::Id), Order::Desc)
        .limit(1)
        .to_owned();

    comment::Entity::find()
        .filter(comment::Column::GameId.is_in(game_ids.iter().copied()))
        .filter(Expr::col((comment::Entity, comment::Column::Id)).in_subquery(newest_of_game))
        .all(db)
        .await
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: i64, count: i64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Two-decimal rendering used wherever an average is displayed.
#[must_use]
pub fn format_rating(avg: f64) -> String {
    format!("{avg:.2}")
}
