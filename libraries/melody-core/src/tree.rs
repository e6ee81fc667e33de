//! Format-neutral value trees and the `Serializable` contract
//!
//! Every persisted entity flattens itself into a [`Tree`] (a
//! `serde_json::Value` with insertion-ordered maps) and rebuilds itself from
//! one. Codecs only ever see trees, never entities.
//!
//! Reading is lenient for optional data: absent or `null` lists become empty
//! and absent optional strings become `None`. Required scalar fields (ids,
//! names, titles, durations) fail fast with [`MelodyError::MissingField`].

use crate::error::{MelodyError, Result};
use serde_json::{Map, Value};
use std::time::Duration;

/// Intermediate serialization representation
pub type Tree = Value;

/// Capability shared by every persisted entity
pub trait Serializable {
    /// Flatten into a tree. Deterministic and non-mutating.
    fn serialize(&self) -> Tree;

    /// Rebuild from a tree produced by [`Serializable::serialize`]
    fn deserialize(tree: &Tree) -> Result<Self>
    where
        Self: Sized;
}

/// Entities that can appear inside a tagged union
///
/// The tag is the type name, so tags are unique by construction.
pub trait Tagged: Serializable + Sized {
    /// Stable, process-independent type tag
    const TYPE_TAG: &'static str;
}

/// Name of a tree node's kind, used in type errors
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Ordered builder for entity trees
#[derive(Debug, Default)]
pub struct TreeBuilder {
    map: Map<String, Value>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; later keys keep their insertion position
    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.map.insert(key.to_string(), value.into());
        self
    }

    /// Append every field of another object tree (used to extend a base tree)
    #[must_use]
    pub fn extend(mut self, base: Tree) -> Self {
        if let Value::Object(fields) = base {
            self.map.extend(fields);
        }
        self
    }

    pub fn build(self) -> Tree {
        Value::Object(self.map)
    }
}

/// List of strings (ids, tokens)
pub fn strings<I, S>(items: I) -> Tree
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Value::Array(
        items
            .into_iter()
            .map(|s| Value::String(s.as_ref().to_string()))
            .collect(),
    )
}

/// Optional string, `null` when absent
pub fn optional_string<S: AsRef<str>>(value: Option<S>) -> Tree {
    value.map_or(Value::Null, |s| Value::String(s.as_ref().to_string()))
}

/// List of serialized entities
pub fn entities<E: Serializable>(items: &[E]) -> Tree {
    Value::Array(items.iter().map(Serializable::serialize).collect())
}

/// Durations below this many milliseconds keep millisecond precision
///
/// `ms / 1000` written as an f64 reads back to the same millisecond count
/// well inside this bound.
const MAX_EXACT_MILLIS: u128 = 1 << 50;

/// Round a duration to the precision it is stored with
///
/// Millisecond precision up to 2^50 ms (about 35 000 years), whole seconds
/// beyond that. Quantized durations survive `duration` followed by
/// [`TreeReader::duration`] unchanged.
pub fn quantize_duration(value: Duration) -> Duration {
    let nanos = value.as_nanos();
    let millis = (nanos + 500_000) / 1_000_000;
    if millis < MAX_EXACT_MILLIS {
        return Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX));
    }
    let secs = (nanos + 500_000_000) / 1_000_000_000;
    Duration::from_secs(u64::try_from(secs).unwrap_or(u64::MAX))
}

/// Duration in seconds: an integer when whole, otherwise a float with
/// millisecond precision
pub fn duration(value: Duration) -> Tree {
    let value = quantize_duration(value);
    if value.subsec_nanos() == 0 {
        Value::from(value.as_secs())
    } else {
        Value::from(value.as_millis() as f64 / 1000.0)
    }
}

/// Convert raw seconds into a quantized duration, refusing negative or
/// non-finite input
pub fn duration_from_secs(field: &str, secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(MelodyError::invalid_value(
            field,
            format!("duration must be a non-negative number of seconds, got {secs}"),
        ));
    }

    let millis = (secs * 1000.0).round();
    if millis < MAX_EXACT_MILLIS as f64 {
        return Ok(Duration::from_millis(millis as u64));
    }
    Duration::try_from_secs_f64(secs.round()).map_err(|e| MelodyError::invalid_value(field, e.to_string()))
}

/// Typed field access over one object tree
///
/// `null` and absent keys are treated alike.
#[derive(Debug, Clone, Copy)]
pub struct TreeReader<'a> {
    entity: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> TreeReader<'a> {
    /// Wrap an object tree; any other kind is an invalid type for `entity`
    pub fn new(entity: &'static str, tree: &'a Tree) -> Result<Self> {
        match tree {
            Value::Object(map) => Ok(Self { entity, map }),
            other => Err(MelodyError::invalid_type(entity, "object", kind_of(other))),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    pub fn required_str(&self, key: &str) -> Result<&'a str> {
        match self.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(MelodyError::invalid_type(key, "string", kind_of(other))),
            None => Err(MelodyError::missing_field(self.entity, key)),
        }
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(MelodyError::invalid_type(key, "string", kind_of(other))),
            None => Ok(None),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(MelodyError::invalid_type(key, "bool", kind_of(other))),
            None => Ok(default),
        }
    }

    /// Raw list; absent means empty
    pub fn list(&self, key: &str) -> Result<&'a [Value]> {
        match self.get(key) {
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(MelodyError::invalid_type(key, "list", kind_of(other))),
            None => Ok(&[]),
        }
    }

    /// Homogeneous list of strings
    pub fn str_list(&self, key: &str) -> Result<Vec<String>> {
        self.list(key)?
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(MelodyError::invalid_element_type(key, "string")),
            })
            .collect()
    }

    /// Homogeneous list of enum tokens parsed by `parse`
    pub fn token_list<T>(&self, key: &str, parse: impl Fn(&str) -> Option<T>) -> Result<Vec<T>> {
        self.str_list(key)?
            .iter()
            .map(|token| {
                parse(token).ok_or_else(|| {
                    MelodyError::invalid_value(key, format!("unknown value \"{token}\""))
                })
            })
            .collect()
    }

    /// Homogeneous list of entity trees
    pub fn entity_list<E: Serializable>(&self, key: &str) -> Result<Vec<E>> {
        self.list(key)?.iter().map(E::deserialize).collect()
    }

    /// Required duration in seconds
    pub fn duration(&self, key: &str) -> Result<Duration> {
        match self.get(key) {
            Some(Value::Number(n)) => match n.as_u64() {
                Some(secs) => Ok(Duration::from_secs(secs)),
                None => duration_from_secs(key, n.as_f64().unwrap_or(f64::NAN)),
            },
            Some(other) => Err(MelodyError::invalid_type(key, "number", kind_of(other))),
            None => Err(MelodyError::missing_field(self.entity, key)),
        }
    }
}
