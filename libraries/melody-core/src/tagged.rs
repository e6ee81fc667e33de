//! Polymorphic resolution of `{ "type": <tag>, "data": <tree> }` records
//!
//! Sum-type fields (an artist's mixed track/chapter list, for example) are
//! written as tagged records. Reading them back builds a tag → constructor
//! table once per call and resolves each record through it.
//!
//! Unresolvable records (unknown tag, failed reconstruction, or not a
//! `{type, data}` mapping) are dropped with a warning so one bad element
//! never loses the rest of the batch. [`resolve_strict`] is available for
//! callers that want the first failure instead.

use crate::error::{MelodyError, Result};
use crate::tree::{kind_of, Tagged, Tree, TreeBuilder};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, warn};

/// Key holding the type tag of a wrapped record
pub const TYPE_KEY: &str = "type";

/// Key holding the entity tree of a wrapped record
pub const DATA_KEY: &str = "data";

type BuildFn<T> = Box<dyn Fn(&Tree) -> Result<T>>;

/// One concrete alternative of a tagged union
pub struct Candidate<T> {
    tag: &'static str,
    build: BuildFn<T>,
}

impl<T: 'static> Candidate<T> {
    /// Candidate for entity `E`, lifted into the union by `into`
    pub fn of<E: Tagged + 'static>(into: fn(E) -> T) -> Self {
        Self {
            tag: E::TYPE_TAG,
            build: Box::new(move |tree| E::deserialize(tree).map(into)),
        }
    }
}

impl<T> Candidate<T> {
    pub fn tag(&self) -> &'static str {
        self.tag
    }
}

impl<T> std::fmt::Debug for Candidate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate").field("tag", &self.tag).finish()
    }
}

/// A closed sum type whose variants are [`Tagged`] entities
pub trait TaggedUnion: Sized + 'static {
    /// Alternatives, in lookup-table order
    fn candidates() -> Vec<Candidate<Self>>;

    /// Tag of the active variant
    fn type_tag(&self) -> &'static str;

    /// Tree of the active variant
    fn data(&self) -> Tree;

    /// Wrapped `{type, data}` record for this value
    fn to_record(&self) -> Tree {
        wrap(self.type_tag(), self.data())
    }
}

/// Wrap an entity tree with its type tag
pub fn wrap(tag: &str, data: Tree) -> Tree {
    TreeBuilder::new()
        .field(TYPE_KEY, tag)
        .field(DATA_KEY, data)
        .build()
}

/// Wrapped records for every item of a union-typed sequence
pub fn records<U: TaggedUnion>(items: &[U]) -> Tree {
    Value::Array(items.iter().map(TaggedUnion::to_record).collect())
}

/// Resolve records against the alternatives of `U`, dropping failures
pub fn resolve_union<U: TaggedUnion>(records: &[Tree]) -> Vec<U> {
    resolve(records, &U::candidates())
}

/// Resolve records against an explicit candidate set, dropping failures
pub fn resolve<T>(records: &[Tree], candidates: &[Candidate<T>]) -> Vec<T> {
    let table = lookup_table(candidates);

    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match resolve_one(&table, record) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(index, error = %err, "Dropping unresolvable tagged record");
                None
            }
        })
        .collect()
}

/// Resolve records, failing on the first record that cannot be resolved
pub fn resolve_strict<T>(records: &[Tree], candidates: &[Candidate<T>]) -> Result<Vec<T>> {
    let table = lookup_table(candidates);
    records
        .iter()
        .map(|record| resolve_one(&table, record))
        .collect()
}

fn lookup_table<T>(candidates: &[Candidate<T>]) -> HashMap<&'static str, &Candidate<T>> {
    let mut table = HashMap::with_capacity(candidates.len());
    for candidate in candidates {
        if table.contains_key(candidate.tag) {
            error!(tag = candidate.tag, "Duplicate type tag in candidate set, keeping the first");
            continue;
        }
        table.insert(candidate.tag, candidate);
    }
    table
}

fn resolve_one<T>(table: &HashMap<&'static str, &Candidate<T>>, record: &Tree) -> Result<T> {
    let (tag, data) = split_record(record)?;
    let candidate = table
        .get(tag)
        .ok_or_else(|| MelodyError::UnknownTag(tag.to_string()))?;
    (candidate.build)(data)
}

/// Split a wrapped record into its tag and entity tree
pub fn split_record(record: &Tree) -> Result<(&str, &Tree)> {
    let fields = record.as_object().ok_or_else(|| {
        MelodyError::malformed_reference(format!(
            "expected a tagged record, got {}",
            kind_of(record)
        ))
    })?;

    let tag = fields
        .get(TYPE_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| MelodyError::malformed_reference("tagged record without a \"type\" string"))?;
    let data = fields
        .get(DATA_KEY)
        .ok_or_else(|| MelodyError::malformed_reference(format!("record \"{tag}\" has no \"data\"")))?;

    Ok((tag, data))
}
