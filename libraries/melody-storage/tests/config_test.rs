//! Environment overrides for storage configuration
//!
//! Kept in its own test binary: these tests mutate process environment.

use melody_storage::{FileFormat, StorageConfig, XmlStrategy};
use std::io::Write;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_single_underscore_prefix_overrides_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var("MELODY_INDENT", "2");
    std::env::set_var("MELODY_XML_STRATEGY", "flat");

    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::load_from(&dir.path().join("absent.toml"));

    std::env::remove_var("MELODY_INDENT");
    std::env::remove_var("MELODY_XML_STRATEGY");

    let config = config.unwrap();
    assert_eq!(config.indent, 2);
    assert_eq!(config.xml_strategy, XmlStrategy::Flat);
    assert_eq!(config.format, FileFormat::Json);
}

#[test]
fn test_environment_wins_over_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("melody.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "indent = 8\nformat = \"xml\"").unwrap();

    std::env::set_var("MELODY_FORMAT", "json");
    let config = StorageConfig::load_from(&path);
    std::env::remove_var("MELODY_FORMAT");

    let config = config.unwrap();
    assert_eq!(config.indent, 8);
    assert_eq!(config.format, FileFormat::Json);
}
