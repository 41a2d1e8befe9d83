//! History summarization - reduce a price-history snapshot sequence to
//! fixed summary statistics
//!
//! Same all-or-nothing policy as the behavior summarizer: any defect in the
//! sequence yields an `Err` and the assembler substitutes the zero-valued
//! fallback. An empty sequence is a defect here too (the mean is undefined).

use crate::flatten::types::{Embedded, SummaryError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed summary of one price-history snapshot sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub price_changes_count: u64,
    pub max_price: f64,
    pub min_price: f64,
    pub avg_price: f64,
    pub max_discount: f64,
    pub last_promotion_type: Option<String>,
}

impl PriceSummary {
    /// The record substituted when summarization fails for a row
    pub fn fallback() -> Self {
        PriceSummary {
            price_changes_count: 0,
            max_price: 0.0,
            min_price: 0.0,
            avg_price: 0.0,
            max_discount: 0.0,
            last_promotion_type: None,
        }
    }

    /// Summary field names, in output order (unprefixed)
    pub const FIELDS: [&'static str; 6] = [
        "price_changes_count",
        "max_price",
        "min_price",
        "avg_price",
        "max_discount",
        "last_promotion_type",
    ];

    /// Field values in the same order as [`Self::FIELDS`]
    pub fn values(&self) -> [Value; 6] {
        [
            Value::from(self.price_changes_count),
            Value::from(self.max_price),
            Value::from(self.min_price),
            Value::from(self.avg_price),
            Value::from(self.max_discount),
            self.last_promotion_type
                .as_deref()
                .map(Value::from)
                .unwrap_or(Value::Null),
        ]
    }
}

/// Summarize one parsed price-history document.
pub fn summarize_price(doc: &Embedded) -> Result<PriceSummary, SummaryError> {
    let snapshots = match doc {
        Embedded::Array(items) => items,
        Embedded::Object(_) => return Err(SummaryError::NotAnArray),
        Embedded::Missing | Embedded::Malformed => return Err(SummaryError::Unparsable),
    };
    if snapshots.is_empty() {
        return Err(SummaryError::EmptySequence);
    }

    let mut max_price = f64::MIN;
    let mut min_price = f64::MAX;
    let mut price_sum = 0.0;
    let mut max_discount = f64::MIN;

    for snapshot in snapshots {
        let obj = snapshot.as_object().ok_or(SummaryError::NotAnObject)?;
        let price = require_f64(obj, "price")?;
        max_price = max_price.max(price);
        min_price = min_price.min(price);
        price_sum += price;
        max_discount = max_discount.max(require_f64(obj, "discount_percentage")?);
    }

    // "Last" is document order, not chronological order.
    let last = snapshots[snapshots.len() - 1]
        .as_object()
        .ok_or(SummaryError::NotAnObject)?;

    Ok(PriceSummary {
        price_changes_count: snapshots.len() as u64,
        max_price,
        min_price,
        avg_price: price_sum / snapshots.len() as f64,
        max_discount,
        last_promotion_type: nullable_str(last, "promotion_type")?,
    })
}

fn require_f64(obj: &Map<String, Value>, key: &'static str) -> Result<f64, SummaryError> {
    match obj.get(key) {
        None => Err(SummaryError::MissingKey(key)),
        Some(value) => value.as_f64().ok_or(SummaryError::InvalidValue(key)),
    }
}

/// A key that must exist but whose value may legitimately be JSON null
fn nullable_str(obj: &Map<String, Value>, key: &'static str) -> Result<Option<String>, SummaryError> {
    match obj.get(key) {
        None => Err(SummaryError::MissingKey(key)),
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SummaryError::InvalidValue(key)),
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
    fn test_extrema_mean_and_last_promotion() {
        let summary = summarize_price(&doc(json!([
            {"date": "2026-07-01", "price": 100.0, "promotion_type": "Clearance", "discount_percentage": 10},
            {"date": "2026-07-08", "price": 80.0, "promotion_type": null, "discount_percentage": 25},
            {"date": "2026-07-15", "price": 120.0, "promotion_type": "Flash Sale", "discount_percentage": 0}
        ])))
        .unwrap();

        assert_eq!(summary.price_changes_count, 3);
        assert_eq!(summary.max_price, 120.0);
        assert_eq!(summary.min_price, 80.0);
        assert_eq!(summary.avg_price, 100.0);
        assert_eq!(summary.max_discount, 25.0);
        assert_eq!(summary.last_promotion_type.as_deref(), Some("Flash Sale"));
    }

    #[test]
    fn test_null_promotion_in_last_snapshot_is_valid() {
        let summary = summarize_price(&doc(json!([
            {"date": "2026-07-01", "price": 50.0, "promotion_type": "None", "discount_percentage": 0},
            {"date": "2026-07-08", "price": 55.0, "promotion_type": null, "discount_percentage": 15}
        ])))
        .unwrap();

        assert_eq!(summary.last_promotion_type, None);
        assert_eq!(summary.max_discount, 15.0);
    }

    #[test]
    fn test_empty_sequence_is_an_error() {
        assert_eq!(
            summarize_price(&doc(json!([]))),
            Err(SummaryError::EmptySequence)
        );
    }

    #[test]
    fn test_missing_price_fails_the_whole_record() {
        let result = summarize_price(&doc(json!([
            {"date": "2026-07-01", "price": 50.0, "promotion_type": null, "discount_percentage": 0},
            {"date": "2026-07-08", "promotion_type": null, "discount_percentage": 0}
        ])));

        assert_eq!(result, Err(SummaryError::MissingKey("price")));
    }

    #[test]
    fn test_integer_prices_are_accepted() {
        let summary = summarize_price(&doc(json!([
            {"date": "2026-07-01", "price": 10, "promotion_type": null, "discount_percentage": 0},
            {"date": "2026-07-08", "price": 20, "promotion_type": null, "discount_percentage": 30}
        ])))
        .unwrap();

        assert_eq!(summary.avg_price, 15.0);
        assert_eq!(summary.max_discount, 30.0);
    }

    #[test]
    fn test_ill_typed_price_fails_the_whole_record() {
        let result = summarize_price(&doc(json!([
            {"date": "2026-07-01", "price": "ten", "promotion_type": null, "discount_percentage": 0}
        ])));

        assert_eq!(result, Err(SummaryError::InvalidValue("price")));
    }

    #[test]
    fn test_summary_serializes_with_the_fixed_field_names() {
        let summary = summarize_price(&doc(json!([
            {"date": "2026-07-01", "price": 40.0, "promotion_type": "None", "discount_percentage": 10}
        ])))
        .unwrap();

        let encoded = serde_json::to_value(&summary).unwrap();
        let keys: Vec<&str> = encoded.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, PriceSummary::FIELDS);

        let decoded: PriceSummary = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, summary);
    }

    #[test]
    fn test_fallback_is_the_zero_record() {
        let fallback = PriceSummary::fallback();
        assert_eq!(
            fallback.values(),
            [json!(0), json!(0.0), json!(0.0), json!(0.0), json!(0.0), Value::Null]
        );
    }
}
