//! Record identifier generation.
//!
//! Identifiers are decimal millisecond timestamps. Within a collection a new
//! id is never smaller than or equal to an existing numeric id, so two inserts
//! in the same millisecond still get distinct, increasing ids.

use chrono::{DateTime, Utc};

/// Returns the next identifier for a collection holding `existing` ids.
pub fn next_id<'a>(existing: impl IntoIterator<Item = &'a str>, now: DateTime<Utc>) -> String {
    let now_ms = now.timestamp_millis().max(0) as u64;
    let floor = existing
        .into_iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .map(|max| max.saturating_add(1))
        .unwrap_or(0);
    now_ms.max(floor).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_collection_uses_timestamp() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(next_id(Vec::<&str>::new(), now), "1700000000123");
    }

    #[test]
    fn test_same_millisecond_bumps_past_existing() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let id = next_id(["1700000000123"], now);
        assert_eq!(id, "1700000000124");

        let id = next_id(["1700000000123", "1700000000124"], now);
        assert_eq!(id, "1700000000125");
    }

    #[test]
    fn test_non_numeric_ids_are_ignored() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        assert_eq!(next_id(["legacy-id", "999"], now), "1000");
    }
}
