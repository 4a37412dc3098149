use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use super::day_before;
use crate::entities::user_ip;

/// Outcome of one sighting of a user at an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// A row was inserted or its `updated` advanced.
    Recorded,
    /// Seen within the last day; nothing written.
    Suppressed,
}

/// Remember that `user_id` was seen at `ip`, writing at most once per 24 hours per pair.
///
/// One statement: insert the pair, or on conflict advance `updated` only when the stored
/// value is at least a day old. Concurrent callers therefore see a single `Recorded`.
///
/// # Errors
///
/// Returns a database error if the upsert fails.
pub async fn observe(
    db: &DatabaseConnection,
    user_id: i32,
    ip: &str,
    now: DateTime<Utc>,
) -> Result<Observation, DbErr> {
    let row = user_ip::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        ip_address: ActiveValue::Set(ip.to_string()),
        created: ActiveValue::Set(now),
        updated: ActiveValue::Set(now),
        ..Default::default()
    };
    let stale = Expr::col((user_ip::Entity, user_ip::Column::Updated)).lte(day_before(now));

    let written = user_ip::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([user_ip::Column::UserId, user_ip::Column::IpAddress])
                .update_column(user_ip::Column::Updated)
                .action_and_where(stale)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(if written == 0 {
        Observation::Suppressed
    } else {
        Observation::Recorded
    })
}

/// Every recorded pair, most recently touched first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<user_ip::Model>, DbErr> {
    user_ip::Entity::find()
        .order_by_desc(user_ip::Column::Updated)
        .order_by_desc(user_ip::Column::Id)
        .all(db)
        .await
}
