use chrono::{DateTime, SecondsFormat, Utc};

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Milliseconds rounded up to whole seconds.
pub fn ceil_seconds(ms: i64) -> i64 {
    ms.div_euclid(1000) + i64::from(ms.rem_euclid(1000) != 0)
}

pub fn millis_to_rfc3339(ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_seconds_rounds_partial_seconds_up() {
        assert_eq!(ceil_seconds(120_000), 120);
        assert_eq!(ceil_seconds(119_001), 120);
        assert_eq!(ceil_seconds(1), 1);
        assert_eq!(ceil_seconds(0), 0);
    }

    #[test]
    fn formats_epoch_millis() {
        assert_eq!(
            millis_to_rfc3339(1_700_000_000_000).as_deref(),
            Some("2023-11-14T22:13:20Z")
        );
    }
}
