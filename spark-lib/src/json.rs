//! The JSON value model used for case bodies.
//!
//! Decoding goes through [`DECODE_ORDER`]: each node of the parsed document is
//! offered to the variants in that order and the first one that accepts it
//! wins. Encoding is the structural inverse and never fails.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_path_to_error::Segment;
use std::collections::BTreeMap;
use std::fmt;

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Object(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Object,
    Array,
    String,
    Bool,
    Number,
    Null,
}

/// Priority in which variants are tried when decoding a node.
pub const DECODE_ORDER: [Kind; 6] = [
    Kind::Object,
    Kind::Array,
    Kind::String,
    Kind::Bool,
    Kind::Number,
    Kind::Null,
];

/// A document that could not be decoded, with the location of the failure.
#[derive(Debug, thiserror::Error)]
#[error("Malformed JSON at {path}: {source}")]
pub struct DecodeError {
    pub path: String,
    #[source]
    pub source: serde_json::Error,
}

impl From<serde_path_to_error::Error<serde_json::Error>> for DecodeError {
    fn from(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        DecodeError {
            path: NodePath(error.path()).to_string(),
            source: error.into_inner(),
        }
    }
}

/// Location inside a document, rendered as `$.key[0]`.
pub(crate) struct NodePath<'a>(pub(crate) &'a serde_path_to_error::Path);

impl fmt::Display for NodePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in self.0.iter() {
            match segment {
                Segment::Seq { index } => write!(f, "[{index}]")?,
                Segment::Map { key } => write!(f, ".{key}")?,
                Segment::Enum { variant } => write!(f, ".{variant}")?,
                _ => write!(f, ".?")?,
            }
        }
        Ok(())
    }
}

impl Kind {
    /// Returns `None` when this variant does not apply to `node`.
    fn probe(self, node: &serde_json::Value) -> Option<Value> {
        match (self, node) {
            (Kind::Object, serde_json::Value::Object(map)) => Some(Value::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), decode_node(child)))
                    .collect(),
            )),
            (Kind::Array, serde_json::Value::Array(items)) => {
                Some(Value::Array(items.iter().map(decode_node).collect()))
            }
            (Kind::String, serde_json::Value::String(text)) => Some(Value::String(text.clone())),
            (Kind::Bool, serde_json::Value::Bool(flag)) => Some(Value::Bool(*flag)),
            (Kind::Number, serde_json::Value::Number(number)) => number.as_f64().map(Value::Number),
            (Kind::Null, serde_json::Value::Null) => Some(Value::Null),
            _ => None,
        }
    }
}

/// A number with no finite f64 form decodes as `Null`, the same way it encodes.
fn decode_node(node: &serde_json::Value) -> Value {
    DECODE_ORDER
        .into_iter()
        .find_map(|kind| kind.probe(node))
        .unwrap_or(Value::Null)
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Decodes a UTF-8 JSON document. Errors name the failing key or index.
pub fn decode(raw: &[u8]) -> Result<Value, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(raw);
    let tree: serde_json::Value = serde_path_to_error::deserialize(&mut deserializer)?;
    deserializer.end().map_err(|source| DecodeError {
        path: "$".to_string(),
        source,
    })?;
    Ok(Value::from_json(&tree))
}

/// Encodes a value as compact JSON.
pub fn encode(value: &Value) -> Vec<u8> {
    value.to_json().to_string().into_bytes()
}

impl Value {
    pub fn from_json(tree: &serde_json::Value) -> Self {
        decode_node(tree)
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(text) => serde_json::Value::String(text.clone()),
            Value::Number(n) => number_to_json(*n),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Bool(flag) => serde_json::Value::Bool(*flag),
            Value::Null => serde_json::Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tree = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from_json(&tree))
    }
}
