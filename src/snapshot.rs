//! Point-in-time readings of one poll category

use crate::api::Category;
use crate::flatten::{FlatMap, flatten};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Last successfully fetched payload of a category.
///
/// Built once per successful fetch and replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    category: Category,
    raw: Value,
    readings: FlatMap,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(category: Category, raw: Value) -> Self {
        Self::at(category, raw, Utc::now())
    }

    pub fn at(category: Category, raw: Value, fetched_at: DateTime<Utc>) -> Self {
        let readings = flatten(&raw);
        Self {
            category,
            raw,
            readings,
            fetched_at,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Payload as returned by the API
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Flattened readings
    pub fn readings(&self) -> &FlatMap {
        &self.readings
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Reading of `key` unless it is null or an empty string
    pub fn reading(&self, key: &str) -> Option<&Value> {
        self.readings.get(key).filter(|v| has_reading(v))
    }

    /// Readings that carry a value, in key order
    pub fn present(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.readings.iter().filter(|(_, v)| has_reading(v))
    }

    /// Device model named by the `device` reading
    pub fn device_model(&self) -> Option<&str> {
        self.reading("device").and_then(Value::as_str)
    }
}

/// Absent, null and empty-string values are "no reading"
pub fn has_reading(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
