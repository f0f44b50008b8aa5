// ── Extended JSON interchange ──
//
// Documents are exchanged as JSON using the store's extended notation for
// the two scalar kinds JSON lacks: `{"$uuid": "..."}` and `{"$date": "..."}`.
// Any other object is a nested document. A document whose only key is one of
// the tags is written as `{"$doc": {...}}` so it cannot be read back as a
// scalar.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Document, Value};

const UUID_TAG: &str = "$uuid";
const DATE_TAG: &str = "$date";
const DOC_TAG: &str = "$doc";

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int64(n) => serializer.serialize_i64(*n),
            Self::Double(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::Uuid(u) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(UUID_TAG, &u.hyphenated().to_string())?;
                map.end()
            }
            Self::DateTime(dt) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(DATE_TAG, &dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))?;
                map.end()
            }
            Self::Array(items) => serializer.collect_seq(items),
            Self::Document(doc) => doc.serialize(serializer),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_tag_shaped() {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(DOC_TAG, &Entries(self))?;
            map.end()
        } else {
            Entries(self).serialize(serializer)
        }
    }
}

/// A document's fields as a plain JSON object, without escaping.
struct Entries<'a>(&'a Document);

impl Serialize for Entries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter())
    }
}

impl Document {
    fn is_tag_shaped(&self) -> bool {
        self.len() == 1
            && self
                .keys()
                .next()
                .is_some_and(|key| matches!(key, UUID_TAG | DATE_TAG | DOC_TAG))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        value_from_json(json).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Document(doc) => Ok(doc),
            other => Err(de::Error::custom(format!(
                "expected a document object, found {}",
                other.kind()
            ))),
        }
    }
}

fn value_from_json(json: serde_json::Value) -> Result<Value, String> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(value_from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)?,
        serde_json::Value::Object(mut map) => {
            if map.len() == 1 {
                if let Some(raw) = map.get(UUID_TAG) {
                    return parse_uuid(raw).map(Value::Uuid);
                }
                if let Some(raw) = map.get(DATE_TAG) {
                    return parse_date(raw).map(Value::DateTime);
                }
                if let Some(raw) = map.remove(DOC_TAG) {
                    let serde_json::Value::Object(inner) = raw else {
                        return Err(format!("{DOC_TAG} must hold an object"));
                    };
                    return document_from_map(inner).map(Value::Document);
                }
            }
            Value::Document(document_from_map(map)?)
        }
    })
}

fn document_from_map(map: serde_json::Map<String, serde_json::Value>) -> Result<Document, String> {
    let mut doc = Document::new();
    for (key, value) in map {
        doc.append(key, value_from_json(value)?);
    }
    Ok(doc)
}

fn parse_uuid(raw: &serde_json::Value) -> Result<Uuid, String> {
    let text = raw
        .as_str()
        .ok_or_else(|| format!("{UUID_TAG} must hold a string"))?;
    Uuid::parse_str(text).map_err(|e| format!("invalid {UUID_TAG} '{text}': {e}"))
}

fn parse_date(raw: &serde_json::Value) -> Result<DateTime<Utc>, String> {
    let text = raw
        .as_str()
        .ok_or_else(|| format!("{DATE_TAG} must hold a string"))?;
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid {DATE_TAG} '{text}': {e}"))
}
