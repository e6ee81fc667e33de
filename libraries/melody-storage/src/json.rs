//! JSON codec: one top-level array of entity trees

use crate::codec::Codec;
use crate::config::FileFormat;
use crate::error::{Result, StorageError};
use melody_core::tree::kind_of;
use melody_core::Tree;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Pretty-printed UTF-8 JSON, non-ASCII text written verbatim
#[derive(Debug, Clone)]
pub struct JsonCodec {
    indent: String,
}

impl JsonCodec {
    /// Codec indenting nested values by `indent` spaces
    pub fn new(indent: usize) -> Self {
        Self {
            indent: " ".repeat(indent),
        }
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Codec for JsonCodec {
    fn format(&self) -> FileFormat {
        FileFormat::Json
    }

    fn encode(&self, trees: &[Tree]) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        trees.serialize(&mut serializer)?;

        String::from_utf8(buffer).map_err(|e| StorageError::malformed(e.to_string()))
    }

    fn decode(&self, text: &str) -> Result<Vec<Tree>> {
        match serde_json::from_str::<Value>(text)? {
            Value::Array(trees) => Ok(trees),
            other => Err(StorageError::malformed(format!(
                "expected a top-level array, got {}",
                kind_of(&other)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_uses_configured_indent() {
        let codec = JsonCodec::new(2);
        let text = codec.encode(&[json!({ "id": "a" })]).unwrap();

        assert_eq!(text, "[\n  {\n    \"id\": \"a\"\n  }\n]");
    }

    #[test]
    fn non_ascii_is_written_verbatim() {
        let text = JsonCodec::default()
            .encode(&[json!({ "title": "Сплин ♫" })])
            .unwrap();

        assert!(text.contains("Сплин ♫"));
    }

    #[test]
    fn key_order_is_preserved() {
        let codec = JsonCodec::default();
        let tree = json!({ "zeta": 1, "alpha": 2, "mid": [] });

        let decoded = codec.decode(&codec.encode(&[tree.clone()]).unwrap()).unwrap();
        let keys: Vec<&String> = decoded[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn non_array_document_is_malformed() {
        let result = JsonCodec::default().decode("{\"id\": \"a\"}");
        assert!(matches!(result, Err(StorageError::MalformedDocument(_))));

        let result = JsonCodec::default().decode("not json");
        assert!(matches!(result, Err(StorageError::Json(_))));
    }

    #[test]
    fn empty_sequence_round_trips() {
        let codec = JsonCodec::default();
        assert_eq!(codec.encode(&[]).unwrap(), "[]");
        assert!(codec.decode("[]").unwrap().is_empty());
    }
}
