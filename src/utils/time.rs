use std::fmt;

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Coarse age of something, ordered from freshest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelativeAge {
    JustNow,
    Seconds(i64),
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Months(i64),
    Years(i64),
}

impl RelativeAge {
    /// Bucket the distance from `then` to `now`. Timestamps in the future count as now.
    #[must_use]
    pub fn between(then: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let secs = (now - then).num_seconds();
        match secs {
            s if s < 1 => Self::JustNow,
            s if s < MINUTE => Self::Seconds(s),
            s if s < HOUR => Self::Minutes(s / MINUTE),
            s if s < DAY => Self::Hours(s / HOUR),
            s if s < MONTH => Self::Days(s / DAY),
            s if s < YEAR => Self::Months(s / MONTH),
            s => Self::Years(s / YEAR),
        }
    }
}

impl fmt::Display for RelativeAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (count, unit) = match *self {
            Self::JustNow => return f.write_str("just now"),
            Self::Seconds(n) => (n, "second"),
            Self::Minutes(n) => (n, "minute"),
            Self::Hours(n) => (n, "hour"),
            Self::Days(n) => (n, "day"),
            Self::Months(n) => (n, "month"),
            Self::Years(n) => (n, "year"),
        };
        if count == 1 {
            write!(f, "1 {unit} ago")
        } else {
            write!(f, "{count} {unit}s ago")
        }
    }
}

/// English relative timestamp such as "3 minutes ago".
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    RelativeAge::between(then, now).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn phrases() {
        let now = Utc::now();
        assert_eq!(time_ago(now, now), "just now");
        assert_eq!(time_ago(now + Duration::minutes(5), now), "just now");
        assert_eq!(time_ago(now - Duration::seconds(1), now), "1 second ago");
        assert_eq!(time_ago(now - Duration::minutes(3), now), "3 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2 days ago");
        assert_eq!(time_ago(now - Duration::days(65), now), "2 months ago");
        assert_eq!(time_ago(now - Duration::days(800), now), "2 years ago");
    }

    #[test]
    fn older_timestamps_never_read_fresher() {
        let now = Utc::now();
        let mut previous = RelativeAge::JustNow;
        let mut age = Duration::zero();
        while age < Duration::days(1000) {
            let current = RelativeAge::between(now - age, now);
            assert!(current >= previous, "{current:?} after {previous:?}");
            previous = current;
            age += Duration::seconds(37) + age / 50;
        }
    }
}
