//! Shapes of category payloads in the JSON release
//!
//! A category value may be a scalar, a single object, or a list mixing
//! objects and scalars. Everything is normalized to payload objects before
//! rows are built.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Key holding the primary value of a payload object
pub const VALUE_KEY: &str = "value";

/// A category value, classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryPayload<'a> {
    /// Null, false, zero, empty string, empty list or empty object
    Empty,
    /// String, number or `true`, stringified
    Scalar(String),
    Object(&'a Map<String, Value>),
    List(&'a [Value]),
}

impl<'a> CategoryPayload<'a> {
    pub fn classify(value: &'a Value) -> Self {
        if !is_truthy(value) {
            return Self::Empty;
        }
        match value {
            Value::Object(map) => Self::Object(map),
            Value::Array(items) => Self::List(items),
            other => Self::Scalar(text_of(other)),
        }
    }

    /// Payload objects carried by this value, one per resulting fact
    pub fn into_objects(self) -> Vec<Cow<'a, Map<String, Value>>> {
        match self {
            Self::Empty => Vec::new(),
            Self::Scalar(text) => vec![Cow::Owned(wrap_value(Value::String(text)))],
            Self::Object(map) => vec![Cow::Borrowed(map)],
            Self::List(items) => items.iter().map(item_object).collect(),
        }
    }
}

/// Normalize one list item: objects pass through, scalars become
/// `{"value": "<text>"}`, anything else is wrapped as its JSON text
pub fn item_object(item: &Value) -> Cow<'_, Map<String, Value>> {
    match item {
        Value::Object(map) => Cow::Borrowed(map),
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            Cow::Owned(wrap_value(Value::String(text_of(item))))
        }
        other => Cow::Owned(wrap_value(Value::String(other.to_string()))),
    }
}

fn wrap_value(value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(VALUE_KEY.to_string(), value);
    map
}

/// Whether a JSON value carries anything
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text form of a value: strings unquoted, everything else as JSON
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text of a non-null field
pub fn field_text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).filter(|v| !v.is_null()).map(text_of)
}

/// Join a token list with `;`
///
/// Nulls are skipped, a bare string is kept as is, and an object
/// contributes its keys. Empty results are `None`.
pub fn join_tokens(value: Option<&Value>) -> Option<String> {
    let value = value.filter(|v| is_truthy(v))?;

    let joined = match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(text_of)
            .collect::<Vec<_>>()
            .join(";"),
        Value::Object(map) => map.keys().cloned().collect::<Vec<_>>().join(";"),
        other => text_of(other),
    };

    (!joined.is_empty()).then_some(joined)
}

/// Number of items in a collection field; absent or falsy is zero, a lone
/// scalar is one
pub fn collection_len(value: Option<&Value>) -> i64 {
    let len = match value {
        Some(value) if !is_truthy(value) => 0,
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        Some(_) => 1,
        None => 0,
    };
    i64::try_from(len).unwrap_or(i64::MAX)
}
