/// Storage configuration
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "melody.toml";

/// Artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Json,
    Xml,
}

impl FileFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Xml => "xml",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "xml" => Some(FileFormat::Xml),
            _ => None,
        }
    }

    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Guess the format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_str)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How trees are laid out in XML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum XmlStrategy {
    /// One child element per top-level key, lists comma-joined (lossy)
    Flat,
    /// Fully nested elements with JSON literal leaves (lossless)
    #[default]
    Structural,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Indentation width in spaces
    #[serde(default = "default_indent")]
    pub indent: usize,

    #[serde(default = "default_format")]
    pub format: FileFormat,

    #[serde(default)]
    pub xml_strategy: XmlStrategy,
}

impl StorageConfig {
    /// Load configuration from `melody.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path` (if present) and environment
    ///
    /// Environment variables are prefixed with `MELODY_`, e.g.
    /// `MELODY_INDENT=2` or `MELODY_XML_STRATEGY=flat`. A double underscore
    /// separates nested keys.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(PathBuf::from(path)));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MELODY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Process-wide configuration, loaded once on first use
    ///
    /// A configuration that fails to load is logged and replaced by the
    /// defaults.
    pub fn global() -> &'static StorageConfig {
        static GLOBAL: OnceLock<StorageConfig> = OnceLock::new();

        GLOBAL.get_or_init(|| {
            Self::load().unwrap_or_else(|err| {
                warn!(error = %err, "Failed to load storage configuration, using defaults");
                Self::default()
            })
        })
    }
}

// Default values
fn default_indent() -> usize {
    4
}

fn default_format() -> FileFormat {
    FileFormat::Json
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            format: default_format(),
            xml_strategy: XmlStrategy::default(),
        }
    }
}
