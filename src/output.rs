//! Canonical rendering of query documents.
//!
//! Documents render as MongoDB relaxed Extended JSON, so values without a
//! JSON counterpart keep their type:
//!
//! - object ids as `{"$oid": "..."}`
//! - patterns as `{"$regex": "...", "$options": "i"}`
//! - timestamps as `{"$date": "<RFC 3339, milliseconds>"}`
//!
//! Object keys are always sorted, so equal documents render identically.
//!
//! # Examples
//!
//! ```
//! use mongoq::{translate, output::to_json};
//!
//! let doc = translate("age > 10 && name == \"Al*\"").unwrap();
//! assert_eq!(
//!     to_json(&doc),
//!     r#"{"age":{"$gt":10},"name":{"$options":"i","$regex":"Al.*"}}"#
//! );
//! ```

use crate::value::{Document, QueryValue, Scalar};
use bson::Bson;
use chrono::SecondsFormat;
use serde_json::{Map, Value, json};

/// Converts a document to a `serde_json::Value` in Extended JSON form.
pub fn to_json_value(doc: &Document) -> Value {
    Value::Object(
        doc.iter()
            .map(|(key, value)| (key.clone(), query_value_to_json(value)))
            .collect::<Map<String, Value>>(),
    )
}

fn query_value_to_json(value: &QueryValue) -> Value {
    match value {
        QueryValue::Scalar(scalar) => scalar_to_json(scalar),
        QueryValue::Document(doc) => to_json_value(doc),
        QueryValue::List(items) => Value::Array(items.iter().map(query_value_to_json).collect()),
    }
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::String(s) => Value::String(s.clone()),
        Scalar::Integer(n) => Value::Number((*n).into()),
        Scalar::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Scalar::Boolean(b) => Value::Bool(*b),
        Scalar::DateTime(ts) => json!({ "$date": ts.to_rfc3339_opts(SecondsFormat::Millis, true) }),
        Scalar::ObjectId(oid) => json!({ "$oid": oid.to_hex() }),
        Scalar::Pattern(p) => json!({ "$regex": p.pattern, "$options": p.options }),
    }
}

/// Converts a document to compact JSON text.
///
/// - No indentation or extra whitespace
/// - Deterministic output (object keys are sorted)
pub fn to_json(doc: &Document) -> String {
    to_json_value(doc).to_string()
}

/// Converts a document to JSON text with 2-space indentation.
pub fn to_json_pretty(doc: &Document) -> String {
    format!("{:#}", to_json_value(doc))
}

/// Converts a document to a `bson::Document` for use with a MongoDB driver.
pub fn to_bson(doc: &Document) -> bson::Document {
    doc.iter()
        .map(|(key, value)| (key.clone(), query_value_to_bson(value)))
        .collect()
}

fn query_value_to_bson(value: &QueryValue) -> Bson {
    match value {
        QueryValue::Scalar(scalar) => scalar_to_bson(scalar),
        QueryValue::Document(doc) => Bson::Document(to_bson(doc)),
        QueryValue::List(items) => Bson::Array(items.iter().map(query_value_to_bson).collect()),
    }
}

fn scalar_to_bson(scalar: &Scalar) -> Bson {
    match scalar {
        Scalar::String(s) => Bson::String(s.clone()),
        Scalar::Integer(n) => Bson::Int64(*n),
        Scalar::Float(f) => Bson::Double(*f),
        Scalar::Boolean(b) => Bson::Boolean(*b),
        Scalar::DateTime(ts) => Bson::DateTime(bson::DateTime::from_millis(ts.timestamp_millis())),
        Scalar::ObjectId(oid) => Bson::ObjectId(*oid),
        Scalar::Pattern(p) => Bson::RegularExpression(bson::Regex {
            pattern: p.pattern.clone(),
            options: p.options.clone(),
        }),
    }
}
