//! Row normalization at the data-store boundary
//!
//! Rows come back from the store as loosely typed JSON objects. JSON columns
//! (`images`, `videos`, ...) may be null, missing, or hold something other
//! than an array. Every row is passed through [`normalize_row`] before it
//! becomes a [`Package`], so list-typed fields are always present.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Package, PackageStatus, Result};

/// A raw row as exchanged with the data store
pub type Row = Map<String, Value>;

const STRING_LISTS: [&str; 4] = ["images", "highlights", "inclusions", "exclusions"];
const OPTIONAL_STRINGS: [&str; 4] = ["duration", "travel_period", "location", "description"];

/// Coerce a raw row into a [`Package`].
pub fn normalize_row(mut row: Row) -> Result<Package> {
    for key in ["id", "title", "slug"] {
        match row.get(key) {
            Some(Value::String(_)) => {}
            Some(Value::Number(n)) => {
                let s = n.to_string();
                row.insert(key.to_string(), Value::String(s));
            }
            _ => return Err(Error::MalformedRow(format!("missing `{key}`"))),
        }
    }

    if !matches!(row.get("price"), Some(Value::String(_))) {
        row.insert("price".to_string(), Value::String(String::new()));
    }

    for key in OPTIONAL_STRINGS {
        if !matches!(row.get(key), Some(Value::String(_))) {
            row.insert(key.to_string(), Value::Null);
        }
    }

    let status = row
        .get("status")
        .and_then(Value::as_str)
        .map(PackageStatus::from_loose)
        .unwrap_or_default();
    row.insert("status".to_string(), Value::String(status.as_str().to_string()));

    if !row.get("rating").is_some_and(Value::is_number) {
        row.insert("rating".to_string(), Value::Null);
    }
    let review_count = row.get("review_count").and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_f64().map(|f| f as i64))
            .map(Value::from)
    });
    row.insert("review_count".to_string(), review_count.unwrap_or(Value::Null));

    for key in STRING_LISTS {
        let list = take_array(&mut row, key)
            .into_iter()
            .filter(Value::is_string)
            .collect();
        row.insert(key.to_string(), Value::Array(list));
    }

    // Entries that do not decode are dropped rather than failing the row
    let videos = take_array(&mut row, "videos")
        .into_iter()
        .filter(|v| serde_json::from_value::<crate::Video>(v.clone()).is_ok())
        .collect();
    row.insert("videos".to_string(), Value::Array(videos));

    let itinerary = take_array(&mut row, "itinerary")
        .into_iter()
        .filter(Value::is_object)
        .filter(|v| serde_json::from_value::<crate::ItineraryDay>(v.clone()).is_ok())
        .collect();
    row.insert("itinerary".to_string(), Value::Array(itinerary));

    for key in ["created_at", "updated_at"] {
        if !matches!(row.get(key), Some(Value::String(_))) {
            return Err(Error::MalformedRow(format!("missing `{key}`")));
        }
    }

    serde_json::from_value(Value::Object(row)).map_err(|e| Error::MalformedRow(e.to_string()))
}

/// Serialize a struct into a row for the store
pub fn to_row<T: Serialize>(value: &T) -> Result<Row> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::MalformedRow(format!("expected object, got {other}"))),
    }
}

fn take_array(row: &mut Row, key: &str) -> Vec<Value> {
    match row.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
