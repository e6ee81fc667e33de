//! The format codec contract and codec selection

use crate::config::{FileFormat, StorageConfig};
use crate::error::Result;
use crate::json::JsonCodec;
use crate::xml::XmlCodec;
use melody_core::{Serializable, Tree};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Writes sequences of entity trees to one format and reads them back
///
/// `decode` performs no type resolution: it returns raw trees, and callers
/// rebuild entities with `Serializable::deserialize` or the tagged-union
/// helpers.
pub trait Codec {
    fn format(&self) -> FileFormat;

    /// Render a complete document
    fn encode(&self, trees: &[Tree]) -> Result<String>;

    /// Parse a complete document back into trees
    fn decode(&self, text: &str) -> Result<Vec<Tree>>;

    /// Write already-flattened trees and flush
    fn save_trees(&self, trees: &[Tree], target: &mut dyn Write) -> Result<()> {
        let document = self.encode(trees)?;
        target.write_all(document.as_bytes())?;
        target.flush()?;
        Ok(())
    }

    /// Serialize every entity and write them as one document
    fn save(&self, entities: &[&dyn Serializable], target: &mut dyn Write) -> Result<()> {
        let trees: Vec<Tree> = entities.iter().map(|entity| entity.serialize()).collect();
        self.save_trees(&trees, target)
    }

    fn load(&self, source: &mut dyn Read) -> Result<Vec<Tree>> {
        let mut text = String::new();
        source.read_to_string(&mut text)?;
        self.decode(&text)
    }

    fn save_trees_file(&self, trees: &[Tree], path: &Path) -> Result<()> {
        debug!(path = %path.display(), format = %self.format(), count = trees.len(), "Saving trees");
        let mut writer = BufWriter::new(File::create(path)?);
        self.save_trees(trees, &mut writer)
    }

    fn save_file(&self, entities: &[&dyn Serializable], path: &Path) -> Result<()> {
        let trees: Vec<Tree> = entities.iter().map(|entity| entity.serialize()).collect();
        self.save_trees_file(&trees, path)
    }

    fn load_file(&self, path: &Path) -> Result<Vec<Tree>> {
        debug!(path = %path.display(), format = %self.format(), "Loading trees");
        let mut reader = BufReader::new(File::open(path)?);
        self.load(&mut reader)
    }
}

/// Serialize a homogeneous slice of entities
pub fn serialize_all<E: Serializable>(entities: &[E]) -> Vec<Tree> {
    entities.iter().map(Serializable::serialize).collect()
}

/// Codec for `format`, configured from `config`
pub fn handler_for(format: FileFormat, config: &StorageConfig) -> Box<dyn Codec> {
    match format {
        FileFormat::Json => Box::new(JsonCodec::new(config.indent)),
        FileFormat::Xml => Box::new(XmlCodec::new(config.xml_strategy, config.indent)),
    }
}
