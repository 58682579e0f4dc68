//! Field deserializers that default instead of failing.
//!
//! Server payloads are trusted for meaning but not for shape: an absent,
//! `null` or mistyped field must read as "no information". These helpers are
//! used with `#[serde(deserialize_with = ...)]` together with a
//! container-level `#[serde(default)]`.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// Any field: fall back to `T::default()` when the value does not fit.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// List field: keep the entries that fit, drop the rest.
pub(crate) fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(filter_items(value).unwrap_or_default())
}

/// Optional list field: `None` unless the value is an array.
pub(crate) fn lenient_opt_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(filter_items(value))
}

fn filter_items<T: DeserializeOwned>(value: Value) -> Option<Vec<T>> {
    match value {
        Value::Array(items) => {
            Some(items.into_iter().filter_map(|item| T::deserialize(item).ok()).collect())
        },
        _ => None,
    }
}
