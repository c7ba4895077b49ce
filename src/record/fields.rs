//! Lenient field deserializers shared by every record type.
//!
//! Source files come from several exporters and disagree on types: quantities
//! arrive as numbers or numeric strings, ids as numbers or strings, lot lists
//! as a single string or an array. Text and list columns accept any JSON value
//! and fall back to the column's default. Numeric columns default only for
//! `null`: a value that is neither a number nor a numeric string fails the
//! record. Combine with `#[serde(default)]` so absent keys get the same default
//! as `null`.

use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

use crate::core::item::LotList;

/// Renders a JSON value as column text; `null` becomes the empty string.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

pub fn to_optional_text(value: &Value) -> Option<String> {
    Some(to_text(value)).filter(|text| !text.is_empty())
}

/// `None` when the value is present but not numeric.
pub fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Null => Some(0),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}

/// `None` when the value is present but not numeric.
pub fn to_decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn not_a_number<E: Error>(value: &Value) -> E {
    E::custom(format!("expected a number or numeric string, found {value}"))
}

/// Empty for anything but a non-empty string (one element) or an array
/// (its non-null elements, in order).
pub fn to_lot_list(value: &Value) -> LotList {
    match value {
        Value::String(s) if !s.is_empty() => LotList::new(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(to_text)
            .collect::<Vec<_>>()
            .into(),
        _ => LotList::default(),
    }
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| to_text(&value))
}

pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| to_optional_text(&value))
}

pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_integer(&value).ok_or_else(|| not_a_number(&value))
}

pub fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_decimal(&value).ok_or_else(|| not_a_number(&value))
}

pub fn lot_list<'de, D>(deserializer: D) -> Result<LotList, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| to_lot_list(&value))
}
