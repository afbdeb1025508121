// Feed parsing: JSON bodies into raw per-feed records
pub mod neotaste_parser;
pub mod thefork_parser;

pub use neotaste_parser::{NeotasteParser, RawPrimaryRestaurant};
pub use thefork_parser::{RawSecondaryRestaurant, TheForkParser};

use crate::model::ParserError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

pub trait Parser {
    type Record: DeserializeOwned;

    fn feed_name(&self) -> &'static str;

    /// Decodes a feed body. A body that is not JSON, or holds no list of
    /// records, is an error; a single record that fails to decode is skipped.
    fn parse(&self, body: &str) -> Result<Vec<Self::Record>, ParserError> {
        parse_records(body, self.feed_name())
    }
}

fn parse_records<T: DeserializeOwned>(body: &str, context: &str) -> Result<Vec<T>, ParserError> {
    let value: Value = serde_json::from_str(body).map_err(|source| ParserError::Json {
        context: context.to_string(),
        source,
    })?;

    // Saved scrapes are bare arrays; the live API wraps them in `data`.
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(ParserError::NotAList { context: context.to_string() }),
        },
        _ => return Err(ParserError::NotAList { context: context.to_string() }),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping {} record #{}: {}", context, index, e),
        }
    }
    Ok(records)
}

/// Accepts numbers and numeric strings; anything else becomes `None`.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}

/// Decodes a list element by element, dropping elements of the wrong shape.
/// Anything but an array becomes an empty list.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Decodes a nested object; a value of any other shape becomes the default.
pub(crate) fn lenient_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient_optional_object(deserializer)?.unwrap_or_default())
}

/// Like [`lenient_object`], keeping absence as `None`.
pub(crate) fn lenient_optional_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Accepts strings and numbers (postal codes and ids show up as both).
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
