//! Melody Storage
//!
//! Persists sequences of entity trees as JSON or XML documents.
//!
//! # Architecture
//!
//! - **Codec**: one `Codec` trait implemented by `JsonCodec` and `XmlCodec`;
//!   `handler_for` picks one for a `FileFormat`
//! - **Configuration**: `StorageConfig` (indentation, default format, XML
//!   layout) loaded from `melody.toml` and `MELODY_*` environment variables
//! - **Library Store**: saves and reloads a whole `Library` as tagged records
//!
//! # Example
//!
//! ```rust
//! use melody_storage::{Codec, JsonCodec};
//! use serde_json::json;
//!
//! let codec = JsonCodec::new(4);
//! let mut buffer = Vec::new();
//! codec.save_trees(&[json!({ "id": "track_001" })], &mut buffer)?;
//!
//! let trees = codec.load(&mut buffer.as_slice())?;
//! assert_eq!(trees[0]["id"], "track_001");
//! # Ok::<(), melody_storage::StorageError>(())
//! ```

#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod json;
pub mod store;
pub mod xml;

pub use codec::{handler_for, serialize_all, Codec};
pub use self::config::{FileFormat, StorageConfig, XmlStrategy};
pub use error::{Result, StorageError};
pub use json::JsonCodec;
pub use store::LibraryStore;
pub use self::xml::XmlCodec;
