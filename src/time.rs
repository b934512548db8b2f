use chrono::{SecondsFormat, Utc};

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// ISO-8601 timestamp with millisecond precision, e.g. `2025-01-31T09:15:00.000Z`.
pub fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn now_ms_is_reasonable() {
        let a = now_ms();
        assert!(a > 1_500_000_000_000); // after 2017
        assert!(a < 4_100_000_000_000); // before year ~2100
    }

    #[test]
    fn iso_now_is_utc_with_millis() {
        let stamp = iso_now();
        assert!(stamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
        let fraction = stamp.split('.').nth(1).expect("fractional seconds");
        assert_eq!(fraction.len(), 4); // three digits plus the trailing Z
    }
}
