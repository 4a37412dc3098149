pub mod admin_actions;
pub mod comment_tree;
pub mod ip_ledger;
pub mod stats;

use chrono::{DateTime, Duration, Utc};

pub use admin_actions::{ActionReport, GameAction, GameAdminView};
pub use comment_tree::comments_for_game;
pub use ip_ledger::{Observation, observe};
pub use stats::{GameStats, games_with_stats};

/// Start of the trailing 24-hour window ending at `now`.
pub(crate) fn day_before(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(24)
}
