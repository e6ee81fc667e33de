//! XML codec
//!
//! Documents have a `<data>` root holding one `<item>` element per tree.
//! Two layouts are supported, selected by [`XmlStrategy`]:
//!
//! - **Structural** (lossless). Scalars are written as JSON literals, lists
//!   as repeated `<item>` children, and mappings as children named by key.
//!   Empty lists and mappings are written as the text `[]` and `{}`, `null`
//!   as an empty element. Mappings that cannot be expressed as elements
//!   (a key that is not an XML name, or `item` as the only key) fall back to
//!   a JSON literal. Characters XML cannot carry (U+FFFE, U+FFFF) are written
//!   as `\uXXXX` escapes inside the literal.
//!
//! - **Flat** (lossy). Each top-level key becomes a child of the item holding
//!   plain text; lists are joined with commas. On read, an empty element is
//!   `null`, text containing a comma is split into a list of strings, and
//!   anything else is a string. Only trees whose values are strings or
//!   comma-free string lists survive a round trip: numbers and booleans come
//!   back as strings, empty and one-element lists do not come back as lists,
//!   and nested values are written as compact JSON text with a warning.
//!   Keys that are not valid XML element names are skipped with a warning,
//!   and characters XML cannot carry are replaced by U+FFFD with a warning.

use crate::codec::Codec;
use crate::config::{FileFormat, XmlStrategy};
use crate::error::{Result, StorageError};
use melody_core::Tree;
use roxmltree::{Document, Node};
use serde_json::{Map, Value};
use std::fmt::Write as _;
use tracing::{debug, warn};
use ::xml::escape::escape_str_attribute;

const ROOT: &str = "data";
const ITEM: &str = "item";
const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// XML codec with a configurable layout
#[derive(Debug, Clone)]
pub struct XmlCodec {
    strategy: XmlStrategy,
    indent: usize,
}

impl XmlCodec {
    pub fn new(strategy: XmlStrategy, indent: usize) -> Self {
        Self { strategy, indent }
    }

    pub fn structural() -> Self {
        Self::new(XmlStrategy::Structural, 4)
    }

    pub fn flat() -> Self {
        Self::new(XmlStrategy::Flat, 4)
    }

    pub fn strategy(&self) -> XmlStrategy {
        self.strategy
    }
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::structural()
    }
}

impl Codec for XmlCodec {
    fn format(&self) -> FileFormat {
        FileFormat::Xml
    }

    fn encode(&self, trees: &[Tree]) -> Result<String> {
        let mut writer = Writer::new(self.indent);
        writer.line(0, DECLARATION);

        if trees.is_empty() {
            writer.line(0, &format!("<{ROOT}/>"));
            return Ok(writer.finish());
        }

        writer.line(0, &format!("<{ROOT}>"));
        for tree in trees {
            match self.strategy {
                XmlStrategy::Structural => writer.structural(1, ITEM, tree),
                XmlStrategy::Flat => writer.flat_item(1, tree),
            }
        }
        writer.line(0, &format!("</{ROOT}>"));

        Ok(writer.finish())
    }

    fn decode(&self, text: &str) -> Result<Vec<Tree>> {
        let document = Document::parse(text)?;
        let root = document.root_element();

        if root.tag_name().name() != ROOT {
            return Err(StorageError::malformed(format!(
                "expected <{ROOT}> root, got <{}>",
                root.tag_name().name()
            )));
        }

        root.children()
            .filter(Node::is_element)
            .map(|node| {
                if node.tag_name().name() != ITEM {
                    return Err(StorageError::malformed(format!(
                        "expected <{ITEM}> under <{ROOT}>, got <{}>",
                        node.tag_name().name()
                    )));
                }
                Ok(match self.strategy {
                    XmlStrategy::Structural => read_structural(node),
                    XmlStrategy::Flat => read_flat_item(node),
                })
            })
            .collect()
    }
}

/// Whether `name` can be used as an element name and read back unchanged
///
/// Deliberately narrower than the XML grammar: ASCII only, no namespaces,
/// and nothing starting with the reserved `xml` prefix.
fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    valid_start
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.get(..3).is_some_and(|prefix| prefix.eq_ignore_ascii_case("xml"))
}

/// Whether a mapping can be written as child elements
fn is_element_map(map: &Map<String, Value>) -> bool {
    let only_item = map.len() == 1 && map.contains_key(ITEM);
    !only_item && map.keys().all(|key| is_element_name(key))
}

fn escape(text: &str) -> String {
    escape_str_attribute(text).into_owned()
}

/// Whether `c` matches the XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

/// JSON literal text that XML can carry
///
/// serde_json already escapes control characters, so only the BMP
/// noncharacters outside `Char` remain, and those are only legal inside
/// JSON strings where `\uXXXX` reads back as the same character.
fn literal_text(value: &Value) -> String {
    let literal = value.to_string();
    if literal.chars().all(is_xml_char) {
        return literal;
    }
    literal
        .chars()
        .map(|c| {
            if is_xml_char(c) {
                c.to_string()
            } else {
                format!("\\u{:04x}", u32::from(c))
            }
        })
        .collect()
}

/// Plain text with characters outside `Char` replaced
fn plain_text(key: &str, text: String) -> String {
    if text.chars().all(is_xml_char) {
        return text;
    }
    warn!(key, "Replacing characters XML cannot carry");
    text.chars()
        .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
        .collect()
}

struct Writer {
    out: String,
    indent: usize,
}

impl Writer {
    fn new(indent: usize) -> Self {
        Self {
            out: String::new(),
            indent,
        }
    }

    fn line(&mut self, depth: usize, content: &str) {
        let pad = depth * self.indent;
        let _ = writeln!(self.out, "{:pad$}{content}", "");
    }

    fn leaf(&mut self, depth: usize, name: &str, text: &str) {
        self.line(depth, &format!("<{name}>{}</{name}>", escape(text)));
    }

    fn empty(&mut self, depth: usize, name: &str) {
        self.line(depth, &format!("<{name}/>"));
    }

    fn finish(self) -> String {
        self.out
    }

    fn structural(&mut self, depth: usize, name: &str, value: &Value) {
        match value {
            Value::Null => self.empty(depth, name),
            Value::Array(items) if items.is_empty() => self.leaf(depth, name, "[]"),
            Value::Object(map) if map.is_empty() => self.leaf(depth, name, "{}"),
            Value::Array(items) => {
                self.line(depth, &format!("<{name}>"));
                for item in items {
                    self.structural(depth + 1, ITEM, item);
                }
                self.line(depth, &format!("</{name}>"));
            }
            Value::Object(map) if is_element_map(map) => {
                self.line(depth, &format!("<{name}>"));
                for (key, child) in map {
                    self.structural(depth + 1, key, child);
                }
                self.line(depth, &format!("</{name}>"));
            }
            literal => self.leaf(depth, name, &literal_text(literal)),
        }
    }

    fn flat_item(&mut self, depth: usize, tree: &Value) {
        let Value::Object(map) = tree else {
            warn!(kind = melody_core::tree::kind_of(tree), "Flat XML item is not a mapping, writing JSON text");
            self.leaf(depth, ITEM, &plain_text(ITEM, tree.to_string()));
            return;
        };

        if map.is_empty() {
            self.empty(depth, ITEM);
            return;
        }

        self.line(depth, &format!("<{ITEM}>"));
        for (key, value) in map {
            if !is_element_name(key) {
                warn!(key = %key, "Skipping key that is not a valid XML element name");
                continue;
            }
            match flat_text(key, value) {
                Some(text) if !text.is_empty() => self.leaf(depth + 1, key, &plain_text(key, text)),
                _ => self.empty(depth + 1, key),
            }
        }
        self.line(depth, &format!("</{ITEM}>"));
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Plain text for one flat field; `None` writes an empty element
fn flat_text(key: &str, value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Array(items) => {
            let tokens: Option<Vec<String>> = items.iter().map(scalar_text).collect();
            match tokens {
                Some(tokens) => Some(tokens.join(",")),
                None => {
                    warn!(key, "Flat XML cannot nest lists, writing JSON text");
                    Some(value.to_string())
                }
            }
        }
        Value::Object(_) => {
            warn!(key, "Flat XML cannot nest mappings, writing JSON text");
            Some(value.to_string())
        }
        scalar => scalar_text(scalar),
    }
}

fn element_children<'a, 'input>(node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    node.children().filter(Node::is_element).collect()
}

fn read_structural(node: Node<'_, '_>) -> Value {
    let children = element_children(node);

    if children.is_empty() {
        let text = node.text().unwrap_or_default().trim();
        if text.is_empty() {
            return Value::Null;
        }
        return serde_json::from_str(text).unwrap_or_else(|_| {
            debug!(element = node.tag_name().name(), "Text is not a JSON literal, reading as string");
            Value::String(text.to_string())
        });
    }

    if children.iter().all(|child| child.tag_name().name() == ITEM) {
        return Value::Array(children.into_iter().map(read_structural).collect());
    }

    Value::Object(
        children
            .into_iter()
            .map(|child| (child.tag_name().name().to_string(), read_structural(child)))
            .collect(),
    )
}

fn read_flat_item(node: Node<'_, '_>) -> Value {
    let children = element_children(node);

    if children.is_empty() {
        let text = node.text().unwrap_or_default().trim();
        if text.is_empty() {
            return Value::Object(Map::new());
        }
        return serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
    }

    Value::Object(
        children
            .into_iter()
            .map(|child| (child.tag_name().name().to_string(), read_flat_field(child)))
            .collect(),
    )
}

fn read_flat_field(node: Node<'_, '_>) -> Value {
    match node.text() {
        None | Some("") => Value::Null,
        Some(text) if text.contains(',') => Value::Array(
            text.split(',')
                .map(|token| Value::String(token.to_string()))
                .collect(),
        ),
        Some(text) => Value::String(text.to_string()),
    }
}
