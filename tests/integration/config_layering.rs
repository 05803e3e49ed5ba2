//! Integration tests for layered configuration loading

use super::test_utils::with_config_home;
use modelseal::config::ConfigLoader;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults_without_files() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let config = with_config_home(&home, || ConfigLoader::load(workspace.path()).unwrap());

    assert_eq!(config.system.store_path, PathBuf::from(".modelseal/store"));
    assert!(config.system.keep_traces);
    assert_eq!(config.extraction.fallback_encoding, "utf-8");
    assert!(config.registry.discard_on_mismatch);
    assert!(config.validate().is_ok());
}

#[test]
fn test_workspace_file_overrides_global_file() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    std::fs::create_dir_all(home.path().join("modelseal")).unwrap();
    std::fs::write(
        home.path().join("modelseal/config.toml"),
        "[system]\nkeep_traces = false\nstore_path = \"global-store\"\n",
    )
    .unwrap();

    std::fs::create_dir_all(workspace.path().join("config")).unwrap();
    std::fs::write(
        workspace.path().join("config/config.toml"),
        "[system]\nstore_path = \"workspace-store\"\n",
    )
    .unwrap();

    let config = with_config_home(&home, || ConfigLoader::load(workspace.path()).unwrap());
    assert_eq!(config.system.store_path, PathBuf::from("workspace-store"));
    assert!(!config.system.keep_traces);
    assert_eq!(
        config.system.store_path_in(workspace.path()),
        workspace.path().join("workspace-store")
    );
}

#[test]
fn test_environment_file_selected_by_modelseal_env() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    std::fs::create_dir_all(workspace.path().join("config")).unwrap();
    std::fs::write(
        workspace.path().join("config/production.toml"),
        "[system]\nkeep_traces = false\n",
    )
    .unwrap();

    let config = with_config_home(&home, || {
        std::env::set_var("MODELSEAL_ENV", "production");
        ConfigLoader::load(workspace.path()).unwrap()
    });
    assert!(!config.system.keep_traces);
}

#[test]
fn test_load_from_file_rejects_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&dir.path().join("nope.toml")).is_err());
}
