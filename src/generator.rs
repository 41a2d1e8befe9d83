//! Seeded synthetic-record generation
//!
//! Produces raw transaction records shaped like the production feed: scalar
//! fields plus the five JSON-encoded embedded documents. All randomness
//! flows through one explicit `StdRng`, so a (seed, base time) pair fully
//! determines the output and generation is parallel-safe.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value};
use uuid::Builder;

const SIZES: [Option<&str>; 6] = [Some("S"), Some("M"), Some("L"), Some("XL"), Some("XXL"), None];
const COLORS: [Option<&str>; 6] = [
    Some("Red"),
    Some("Blue"),
    Some("Green"),
    Some("Black"),
    Some("White"),
    None,
];
const MATERIALS: [Option<&str>; 6] = [
    Some("Cotton"),
    Some("Polyester"),
    Some("Wool"),
    Some("Silk"),
    Some("Leather"),
    None,
];
const FEATURES: [&str; 5] = [
    "Waterproof",
    "Breathable",
    "UV Protection",
    "Quick Dry",
    "Stain Resistant",
];
const WARRANTY_MONTHS: [Option<u32>; 4] = [Some(12), Some(24), Some(36), None];

const ACTION_TYPES: [&str; 4] = ["view", "cart_add", "wishlist_add", "purchase"];
const DEVICES: [&str; 3] = ["mobile", "desktop", "tablet"];

const CARRIERS: [&str; 4] = ["FedEx", "UPS", "DHL", "USPS"];
const SHIPPING_METHODS: [&str; 4] = ["Standard", "Express", "Next Day", "International"];
const SHIPPING_ZONES: [&str; 4] = ["NA", "EU", "ASIA", "AU"];
const RESTRICTIONS: [&str; 4] = ["Hazmat", "Oversized", "Fragile", "Perishable"];

const MAIN_CATEGORIES: [&str; 4] = ["Electronics", "Fashion", "Home", "Sports"];

// "None" the string and null are distinct promotion values in the feed
const PROMOTION_TYPES: [Option<&str>; 5] = [
    Some("None"),
    Some("Holiday Sale"),
    Some("Clearance"),
    Some("Flash Sale"),
    None,
];
const DISCOUNTS: [i64; 6] = [0, 10, 15, 20, 25, 30];

const CURRENCIES: [&str; 5] = ["USD", "EUR", "GBP", "JPY", "AUD"];
const PAYMENT_METHODS: [&str; 4] = ["credit_card", "paypal", "crypto", "bank_transfer"];
const STATUSES: [&str; 4] = ["completed", "pending", "failed", "refunded"];
const RETURN_REASONS: [Option<&str>; 4] =
    [Some("size_issue"), Some("quality_issue"), Some("wrong_item"), None];
const MARKETING_SOURCES: [Option<&str>; 5] = [
    Some("organic_search"),
    Some("paid_search"),
    Some("social_media"),
    Some("email"),
    None,
];
const REVIEW_SCORES: [Option<i64>; 6] = [Some(1), Some(2), Some(3), Some(4), Some(5), None];

const SNIPPETS: [&str; 5] = [
    "Arrived earlier than expected, well packaged.",
    "Please leave the parcel with the concierge.",
    "Second purchase of this item, consistent quality.",
    "Color differs slightly from the photos.",
    "Bought as a replacement for a worn-out one.",
];

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148",
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0",
];

/// Generates raw transaction records from an explicit seed.
pub struct RecordGenerator {
    rng: StdRng,
    base: DateTime<Utc>,
}

impl RecordGenerator {
    /// Seeded generator anchored at the current time
    pub fn new(seed: u64) -> Self {
        Self::with_base(seed, Utc::now())
    }

    /// Seeded generator with an explicit time anchor; the same (seed, base)
    /// pair always yields the same records.
    pub fn with_base(seed: u64, base: DateTime<Utc>) -> Self {
        RecordGenerator {
            rng: StdRng::seed_from_u64(seed),
            base,
        }
    }

    /// Generate a batch of raw records
    pub fn generate(&mut self, count: usize) -> Vec<Map<String, Value>> {
        (0..count).map(|_| self.record()).collect()
    }

    /// Generate one raw record with all scalar fields and the five
    /// JSON-encoded embedded documents
    pub fn record(&mut self) -> Map<String, Value> {
        let mut record = Map::new();

        record.insert("transaction_id".into(), Value::String(self.uuid()));
        let ts = self.base - Duration::seconds(self.rng.gen_range(0..365 * 24 * 3600));
        record.insert(
            "timestamp".into(),
            Value::String(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
        );
        record.insert("customer_id".into(), Value::String(self.uuid()));
        record.insert("product_id".into(), Value::String(self.uuid()));
        record.insert("quantity".into(), json!(self.rng.gen_range(1..=5)));
        record.insert("base_price".into(), json!(round2(self.rng.gen_range(10.0..1000.0))));
        record.insert("currency".into(), json!(self.pick(&CURRENCIES)));
        record.insert("payment_method".into(), json!(self.pick(&PAYMENT_METHODS)));
        record.insert("status".into(), json!(self.pick(&STATUSES)));

        record.insert(
            "product_attributes".into(),
            encoded(self.product_attributes()),
        );
        record.insert("user_behavior".into(), encoded(self.user_behavior()));
        record.insert("shipping_info".into(), encoded(self.shipping_info()));
        record.insert("category_info".into(), encoded(self.category_info()));
        record.insert("price_history".into(), encoded(self.price_history()));

        record.insert("customer_notes".into(), self.maybe_snippet(0.3));
        record.insert("review_score".into(), json!(self.pick(&REVIEW_SCORES)));
        record.insert("review_text".into(), self.maybe_snippet(0.2));
        record.insert("is_gift".into(), json!(self.rng.gen_bool(0.5)));
        record.insert("gift_message".into(), self.maybe_snippet(0.1));
        record.insert("return_reason".into(), json!(self.pick(&RETURN_REASONS)));
        record.insert("marketing_source".into(), json!(self.pick(&MARKETING_SOURCES)));
        record.insert("session_id".into(), Value::String(self.uuid()));
        record.insert("ip_address".into(), Value::String(self.ip_address()));
        record.insert("user_agent".into(), json!(self.pick(&USER_AGENTS)));

        record
    }

    fn product_attributes(&mut self) -> Value {
        let feature_count = self.rng.gen_range(0..=3);
        json!({
            "size": self.pick(&SIZES),
            "color": self.pick(&COLORS),
            "material": self.pick(&MATERIALS),
            "features": self.sample(&FEATURES, feature_count),
            "warranty_months": self.pick(&WARRANTY_MONTHS),
        })
    }

    fn user_behavior(&mut self) -> Value {
        let actions: Vec<Value> = (0..self.rng.gen_range(1..=5))
            .map(|_| {
                let ts = self.base - Duration::days(self.rng.gen_range(1..=30));
                json!({
                    "timestamp": ts.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    "action_type": self.pick(&ACTION_TYPES),
                    "device": self.pick(&DEVICES),
                    "session_duration": self.rng.gen_range(30..=3600),
                    "page_views": self.rng.gen_range(1..=20),
                })
            })
            .collect();
        Value::Array(actions)
    }

    fn shipping_info(&mut self) -> Value {
        let delivery = self.base + Duration::days(self.rng.gen_range(1..=14));
        let zone_count = self.rng.gen_range(1..=3);
        let restriction_count = self.rng.gen_range(0..=2);
        json!({
            "carrier": self.pick(&CARRIERS),
            "method": self.pick(&SHIPPING_METHODS),
            "tracking_number": self.uuid(),
            "estimated_delivery": delivery.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "shipping_zones": self.sample(&SHIPPING_ZONES, zone_count),
            "restrictions": self.sample(&RESTRICTIONS, restriction_count),
        })
    }

    fn category_info(&mut self) -> Value {
        let main = *self.pick(&MAIN_CATEGORIES);
        let subs: [&str; 4] = match main {
            "Electronics" => ["Smartphones", "Laptops", "Accessories", "Gaming"],
            "Fashion" => ["Clothing", "Shoes", "Accessories", "Watches"],
            "Home" => ["Furniture", "Decor", "Kitchen", "Garden"],
            _ => ["Equipment", "Clothing", "Shoes", "Accessories"],
        };
        json!({ "main": main, "sub": self.pick(&subs) })
    }

    fn price_history(&mut self) -> Value {
        let changes = self.rng.gen_range(2..=5);
        let base_price = self.rng.gen_range(10.0..1000.0);
        let snapshots: Vec<Value> = (0..changes)
            .map(|i| {
                let date = self.base - Duration::days(30 - i * 7);
                json!({
                    "date": date.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    "price": round2(base_price * self.rng.gen_range(0.8..1.2)),
                    "promotion_type": self.pick(&PROMOTION_TYPES),
                    "discount_percentage": self.pick(&DISCOUNTS),
                })
            })
            .collect();
        Value::Array(snapshots)
    }

    /// Version-4-shaped UUID drawn from the seeded RNG, so IDs stay
    /// reproducible under a fixed seed
    fn uuid(&mut self) -> String {
        let bytes: [u8; 16] = self.rng.gen();
        Builder::from_random_bytes(bytes).into_uuid().to_string()
    }

    fn ip_address(&mut self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.rng.gen_range(1..=223u8),
            self.rng.gen_range(0..=255u8),
            self.rng.gen_range(0..=255u8),
            self.rng.gen_range(1..=254u8),
        )
    }

    fn maybe_snippet(&mut self, probability: f64) -> Value {
        if self.rng.gen_bool(probability) {
            json!(self.pick(&SNIPPETS))
        } else {
            Value::Null
        }
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.gen_range(0..items.len())]
    }

    fn sample(&mut self, items: &[&str], count: usize) -> Vec<String> {
        items
            .choose_multiple(&mut self.rng, count)
            .map(|s| s.to_string())
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Embedded documents travel as JSON-encoded strings, as in the raw feed
fn encoded(doc: Value) -> Value {
    Value::String(doc.to_string())
}
