//! Event-series summarization - reduce a user-behavior action sequence to
//! fixed summary statistics
//!
//! The policy is all-or-nothing: any defect in the sequence (unparsable
//! document, non-object element, missing or ill-typed key, empty sequence)
//! yields an `Err`, which the assembler maps to the zero-valued fallback
//! summary. Partial recovery of individual fields is never attempted.

use crate::flatten::types::{Embedded, SummaryError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Fixed summary of one user-behavior action sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSummary {
    pub total_actions: u64,
    pub total_duration: f64,
    pub total_page_views: f64,
    pub last_action: Option<String>,
    pub primary_device: Option<String>,
}

impl BehaviorSummary {
    /// The record substituted when summarization fails for a row
    pub fn fallback() -> Self {
        BehaviorSummary {
            total_actions: 0,
            total_duration: 0.0,
            total_page_views: 0.0,
            last_action: None,
            primary_device: None,
        }
    }

    /// Summary field names, in output order (unprefixed)
    pub const FIELDS: [&'static str; 5] = [
        "total_actions",
        "total_duration",
        "total_page_views",
        "last_action",
        "primary_device",
    ];

    /// Field values in the same order as [`Self::FIELDS`]
    pub fn values(&self) -> [Value; 5] {
        [
            Value::from(self.total_actions),
            number(self.total_duration),
            number(self.total_page_views),
            self.last_action.as_deref().map(Value::from).unwrap_or(Value::Null),
            self.primary_device.as_deref().map(Value::from).unwrap_or(Value::Null),
        ]
    }
}

/// Summarize one parsed user-behavior document.
pub fn summarize_behavior(doc: &Embedded) -> Result<BehaviorSummary, SummaryError> {
    let actions = match doc {
        Embedded::Array(items) => items,
        Embedded::Object(_) => return Err(SummaryError::NotAnArray),
        Embedded::Missing | Embedded::Malformed => return Err(SummaryError::Unparsable),
    };
    if actions.is_empty() {
        return Err(SummaryError::EmptySequence);
    }

    let mut total_duration = 0.0;
    let mut total_page_views = 0.0;
    let mut devices: Vec<&str> = Vec::with_capacity(actions.len());

    for action in actions {
        let obj = action.as_object().ok_or(SummaryError::NotAnObject)?;
        total_duration += require_number(obj, "session_duration")?;
        total_page_views += require_number(obj, "page_views")?;
        devices.push(require_str(obj, "device")?);
    }

    // "Last" is document order, not chronological order.
    let last = actions[actions.len() - 1]
        .as_object()
        .ok_or(SummaryError::NotAnObject)?;
    let last_action = require_str(last, "action_type")?.to_string();

    Ok(BehaviorSummary {
        total_actions: actions.len() as u64,
        total_duration,
        total_page_views,
        last_action: Some(last_action),
        primary_device: Some(primary_device(&devices).to_string()),
    })
}

/// Mode of the device values, ties broken by the first element in sequence
/// order that achieves the maximum count.
///
/// One counting pass plus one scan; the strict `>` keeps the earliest
/// element on ties.
fn primary_device<'a>(devices: &[&'a str]) -> &'a str {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for device in devices {
        *counts.entry(device).or_default() += 1;
    }

    let mut primary = devices[0];
    let mut best = 0usize;
    for device in devices {
        let count = counts[device];
        if count > best {
            best = count;
            primary = device;
        }
    }
    primary
}

/// Any JSON number is acceptable; integers and fractions both sum
fn require_number(obj: &Map<String, Value>, key: &'static str) -> Result<f64, SummaryError> {
    match obj.get(key) {
        None => Err(SummaryError::MissingKey(key)),
        Some(value) => value.as_f64().ok_or(SummaryError::InvalidValue(key)),
    }
}

fn require_str<'a>(obj: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, SummaryError> {
    match obj.get(key) {
        None => Err(SummaryError::MissingKey(key)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(SummaryError::InvalidValue(key)),
    }
}

/// Sums over all-integer sequences stay integers in the output; a
/// fractional input keeps its fraction.
pub(crate) fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Embedded {
        Embedded::parse(Some(&value))
    }

    #[test]
    fn test_sums_and_last_action() {
        let summary = summarize_behavior(&doc(json!([
            {"session_duration": 100, "page_views": 5, "device": "mobile", "action_type": "view"},
            {"session_duration": 200, "page_views": 3, "device": "mobile", "action_type": "purchase"}
        ])))
        .unwrap();

        assert_eq!(summary.total_actions, 2);
        assert_eq!(summary.total_duration, 300.0);
        assert_eq!(summary.total_page_views, 8.0);
        assert_eq!(summary.last_action.as_deref(), Some("purchase"));
        assert_eq!(summary.primary_device.as_deref(), Some("mobile"));
        // Integral sums come out of values() as plain integers
        assert_eq!(summary.values()[1], json!(300));
        assert_eq!(summary.values()[2], json!(8));
    }

    #[test]
    fn test_fractional_durations_are_summed_not_rejected() {
        let summary = summarize_behavior(&doc(json!([
            {"session_duration": 100.5, "page_views": 2, "device": "mobile", "action_type": "view"},
            {"session_duration": 200.25, "page_views": 3, "device": "mobile", "action_type": "purchase"}
        ])))
        .unwrap();

        assert_eq!(summary.total_duration, 300.75);
        assert_eq!(summary.total_page_views, 5.0);
        assert_eq!(summary.values()[1], json!(300.75));
        assert_eq!(summary.values()[2], json!(5));
    }

    #[test]
    fn test_ill_typed_value_fails_the_whole_record() {
        let result = summarize_behavior(&doc(json!([
            {"session_duration": "an hour", "page_views": 5, "device": "mobile", "action_type": "view"}
        ])));

        assert_eq!(result, Err(SummaryError::InvalidValue("session_duration")));

        let result = summarize_behavior(&doc(json!([
            {"session_duration": 60, "page_views": 5, "device": 7, "action_type": "view"}
        ])));

        assert_eq!(result, Err(SummaryError::InvalidValue("device")));
    }

    #[test]
    fn test_summary_serializes_with_the_fixed_field_names() {
        let summary = summarize_behavior(&doc(json!([
            {"session_duration": 60, "page_views": 2, "device": "tablet", "action_type": "view"}
        ])))
        .unwrap();

        let encoded = serde_json::to_value(&summary).unwrap();
        let keys: Vec<&str> = encoded.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, BehaviorSummary::FIELDS);

        let decoded: BehaviorSummary = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, summary);
    }

    #[test]
    fn test_primary_device_tie_breaks_to_first_in_sequence() {
        let actions: Vec<Value> = ["mobile", "desktop", "mobile", "desktop"]
            .iter()
            .map(|device| {
                json!({
                    "session_duration": 60,
                    "page_views": 1,
                    "device": device,
                    "action_type": "view"
                })
            })
            .collect();

        let summary = summarize_behavior(&doc(Value::Array(actions))).unwrap();

        // Counts tied at 2 each; the first element in sequence order wins.
        assert_eq!(summary.primary_device.as_deref(), Some("mobile"));
    }

    #[test]
    fn test_primary_device_majority_wins_regardless_of_position() {
        let actions: Vec<Value> = ["desktop", "mobile", "tablet", "mobile"]
            .iter()
            .map(|device| {
                json!({
                    "session_duration": 60,
                    "page_views": 1,
                    "device": device,
                    "action_type": "view"
                })
            })
            .collect();

        let summary = summarize_behavior(&doc(Value::Array(actions))).unwrap();

        assert_eq!(summary.primary_device.as_deref(), Some("mobile"));
    }

    #[test]
    fn test_empty_sequence_is_an_error() {
        assert_eq!(
            summarize_behavior(&doc(json!([]))),
            Err(SummaryError::EmptySequence)
        );
    }

    #[test]
    fn test_missing_key_fails_the_whole_record() {
        let result = summarize_behavior(&doc(json!([
            {"session_duration": 100, "page_views": 5, "device": "mobile", "action_type": "view"},
            {"session_duration": 200, "device": "mobile", "action_type": "view"}
        ])));

        assert_eq!(result, Err(SummaryError::MissingKey("page_views")));
    }

    #[test]
    fn test_unparsable_document_is_an_error() {
        assert_eq!(
            summarize_behavior(&Embedded::Malformed),
            Err(SummaryError::Unparsable)
        );
        assert_eq!(
            summarize_behavior(&Embedded::Missing),
            Err(SummaryError::Unparsable)
        );
    }

    #[test]
    fn test_object_document_is_an_error() {
        assert_eq!(
            summarize_behavior(&doc(json!({"device": "mobile"}))),
            Err(SummaryError::NotAnArray)
        );
    }

    #[test]
    fn test_fallback_is_the_zero_record() {
        let fallback = BehaviorSummary::fallback();
        assert_eq!(
            fallback.values(),
            [json!(0), json!(0), json!(0), Value::Null, Value::Null]
        );
    }
}
