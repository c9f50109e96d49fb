//! Tests for the supported configuration file formats

use crate::{ConfigProvider, FileDiscovery, PromptSettings};
use serde_json::json;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn load(file_name: &str, contents: &str) -> PromptSettings {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join(".knobs");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join(file_name), contents).unwrap();

    ConfigProvider::new()
        .with_discovery(FileDiscovery::with_directories(
            Some(project),
            Some(temp.path().join("no-global")),
        ))
        .load_settings()
        .unwrap()
}

#[test]
#[serial]
fn test_toml_file() {
    let settings = load("knobs.toml", "retries = 5\n[values]\nreplicas = 3\n");
    assert_eq!(settings.retries, 5);
    assert_eq!(settings.values["replicas"], json!(3));
}

#[test]
#[serial]
fn test_yaml_file() {
    let settings = load("knobs.yml", "values:\n  dry_run: true\n");
    assert_eq!(settings.retries, 2);
    assert_eq!(settings.values["dry_run"], json!(true));
}

#[test]
#[serial]
fn test_json_file() {
    let settings = load("knobs.json", r#"{"retries": 0, "values": {"region": "eu"}}"#);
    assert_eq!(settings.retries, 0);
    assert_eq!(settings.values["region"], json!("eu"));
}
