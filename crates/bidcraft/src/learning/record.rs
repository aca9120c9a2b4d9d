//! Correction records and the document shapes kept by the learning store.

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Remembered cost per line item, in the order items were first learned.
pub type CostMemory = IndexMap<String, f64>;

/// Corrections per line item, each sequence in chronological order.
pub type CorrectionLog = IndexMap<String, Vec<CorrectionRecord>>;

/// Number of times each line item was deleted from a bid.
pub type DeletionLog = IndexMap<String, u64>;

/// One user-submitted price correction for a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    /// The cost the estimate originally carried.
    pub original_cost: f64,

    /// The cost the user replaced it with.
    pub corrected_cost: f64,

    /// When the correction was logged. Written as RFC 3339; timestamps
    /// without an offset are read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,

    /// `corrected_cost - original_cost`, kept for audit.
    pub adjustment: f64,
}

impl CorrectionRecord {
    /// Create a record stamped with the current time.
    pub fn new(original_cost: f64, corrected_cost: f64) -> Self {
        Self::at(original_cost, corrected_cost, Utc::now())
    }

    /// Create a record with an explicit timestamp.
    pub fn at(original_cost: f64, corrected_cost: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            original_cost,
            corrected_cost,
            timestamp,
            adjustment: corrected_cost - original_cost,
        }
    }
}

/// Parse an ISO-8601 timestamp, with or without a UTC offset.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    text.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", text)))
}

/// A remembered cost offered back to the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemSuggestion {
    pub item: String,
    pub suggested_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_is_derived() {
        let record = CorrectionRecord::new(500.0, 600.0);
        assert_eq!(record.adjustment, 100.0);

        let record = CorrectionRecord::new(250.0, 200.0);
        assert_eq!(record.adjustment, -50.0);
    }

    #[test]
    fn test_serialized_shape() {
        let ts = DateTime::parse_from_rfc3339("2024-12-30T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = CorrectionRecord::at(100.0, 120.5, ts);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["original_cost"], 100.0);
        assert_eq!(value["corrected_cost"], 120.5);
        assert_eq!(value["adjustment"], 20.5);
        assert_eq!(value["timestamp"], "2024-12-30T10:00:00Z");
    }

    #[test]
    fn test_timestamp_without_offset_reads_as_utc() {
        let record: CorrectionRecord = serde_json::from_str(
            r#"{"original_cost": 500.0, "corrected_cost": 600.0,
                "timestamp": "2024-12-30T10:00:00.123456", "adjustment": 100.0}"#,
        )
        .unwrap();

        let expected = DateTime::parse_from_rfc3339("2024-12-30T10:00:00.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(record.timestamp, expected);

        // Written back with an explicit offset
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["timestamp"], "2024-12-30T10:00:00.123456Z");
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert!(parse_timestamp("2024-12-30T10:00:00").is_some());
        assert!(parse_timestamp("2024-12-30T10:00:00+02:00").is_some());
        assert_eq!(
            parse_timestamp("2024-12-30T10:00:00+02:00"),
            parse_timestamp("2024-12-30T08:00:00")
        );
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
