//! Relative time formatting ("3h ago") for table cells.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Drop precision below the largest meaningful unit so `humantime`
/// prints "3h" rather than "3h 12m 7s".
fn coarse(d: Duration) -> Duration {
    let secs = d.as_secs();
    let unit = match secs {
        0..60 => 1,
        60..3_600 => 60,
        3_600..86_400 => 3_600,
        _ => 86_400,
    };
    Duration::from_secs(secs - secs % unit)
}

pub fn ago_from(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now - ts).to_std() {
        Ok(d) if d.as_secs() < 5 => "just now".into(),
        Ok(d) => format!("{} ago", humantime::format_duration(coarse(d))),
        // Clock skew: backend timestamp in the future
        Err(_) => "just now".into(),
    }
}

pub fn ago(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(|| "never".into(), |t| ago_from(t, Utc::now()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rounds_down_to_largest_unit() {
        let now = Utc::now();
        assert_eq!(ago_from(now - TimeDelta::seconds(42), now), "42s ago");
        assert_eq!(ago_from(now - TimeDelta::seconds(3 * 3_600 + 700), now), "3h ago");
        assert_eq!(ago_from(now - TimeDelta::days(2), now), "2days ago");
    }

    #[test]
    fn future_and_missing_timestamps() {
        let now = Utc::now();
        assert_eq!(ago_from(now + TimeDelta::minutes(1), now), "just now");
        assert_eq!(ago(None), "never");
    }
}
