//! Integration tests for the fingerprint store and artifact registry

use super::test_utils::write_artifact;
use modelseal::config::SealConfig;
use modelseal::error::{ApiError, StorageError};
use modelseal::registry::{ArtifactRegistry, RecordMetadata};
use modelseal::store::{FingerprintStore, SledFingerprintStore};
use modelseal::tree::{build_root, LeafExtractor};
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> SealConfig {
    let mut config = SealConfig::default();
    config.system.store_path = dir.path().join("store");
    config.system.trace_dir = dir.path().join("traces");
    config
}

#[test]
fn test_registry_from_config_keeps_traces() {
    let dir = TempDir::new().unwrap();
    let registry = ArtifactRegistry::from_config(&config_in(&dir), dir.path()).unwrap();
    let model = write_artifact(&dir, "model.csv", "w1,w2,w3");

    let registration = registry
        .register(
            "bert base",
            "3",
            &model,
            &RecordMetadata::default().with_description("uncased"),
        )
        .unwrap();
    assert_eq!(registration.record.name, "bert_base");
    assert!(dir.path().join("traces/bert_base_v3_merkle.tree").exists());
    assert_eq!(registration.trace_path.as_deref(), Some(dir.path().join("traces/bert_base_v3_merkle.tree").as_path()));
}

#[test]
fn test_registry_without_traces() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.system.keep_traces = false;
    let registry = ArtifactRegistry::from_config(&config, dir.path()).unwrap();
    let model = write_artifact(&dir, "model.csv", "w1");

    let registration = registry.register("bert", "1", &model, &RecordMetadata::default()).unwrap();
    assert!(registration.trace_path.is_none());
    assert!(!dir.path().join("traces").exists());
}

#[test]
fn test_records_persist_across_registry_instances() {
    let dir = TempDir::new().unwrap();
    let model = write_artifact(&dir, "model.csv", "a,b,c");
    {
        let registry = ArtifactRegistry::from_config(&config_in(&dir), dir.path()).unwrap();
        let metadata = RecordMetadata::default()
            .with_accuracy(0.88)
            .with_change_log("first cut");
        registry.register("resnet", "1.0", &model, &metadata).unwrap();
    }

    let registry = ArtifactRegistry::from_config(&config_in(&dir), dir.path()).unwrap();
    let record = registry.get("resnet", "1.0").unwrap();
    assert_eq!(record.fingerprint.as_str(), build_root(&["a", "b", "c"]).unwrap());
    assert_eq!(record.accuracy, Some(0.88));
    assert_eq!(record.change_log.as_deref(), Some("first cut"));
    assert!(registry.check("resnet", "1.0", &model).unwrap().is_verified());
}

#[test]
fn test_discard_on_mismatch_from_config() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.registry.discard_on_mismatch = true;
    let registry = ArtifactRegistry::from_config(&config, dir.path()).unwrap();

    let model = write_artifact(&dir, "model.csv", "a,b,c");
    registry.register("resnet", "1.0", &model, &RecordMetadata::default()).unwrap();

    let download = write_artifact(&dir, "download.csv", "a,b,c,d");
    let outcome = registry.check("resnet", "1.0", &download).unwrap();
    assert!(!outcome.is_verified());
    assert!(outcome.discarded);
    assert!(!download.exists());
}

#[test]
fn test_duplicate_rejected_through_store_trait() {
    let dir = TempDir::new().unwrap();
    let store = SledFingerprintStore::new(dir.path().join("store")).unwrap();
    let registry = ArtifactRegistry::new(Box::new(store), LeafExtractor::default());
    let model = write_artifact(&dir, "model.csv", "a");

    registry.register("resnet", "1.0", &model, &RecordMetadata::default()).unwrap();
    assert!(matches!(
        registry.register("resnet", "1.0", &model, &RecordMetadata::default()),
        Err(ApiError::StorageError(StorageError::DuplicateRecord { .. }))
    ));
    assert!(registry.register("resnet", "1.1", &model, &RecordMetadata::default()).is_ok());
}

#[test]
fn test_invalid_name_rejected_before_reading() {
    let dir = TempDir::new().unwrap();
    let store = SledFingerprintStore::new(dir.path().join("store")).unwrap();
    let registry = ArtifactRegistry::new(Box::new(store), LeafExtractor::default());

    let result = registry.register(
        "/..",
        "1",
        &dir.path().join("missing.csv"),
        &RecordMetadata::default(),
    );
    assert!(matches!(result, Err(ApiError::InvalidArtifactName(_))));
}

#[test]
fn test_store_require_reports_missing() {
    let dir = TempDir::new().unwrap();
    let store = SledFingerprintStore::new(dir.path()).unwrap();
    assert!(matches!(
        store.require("ghost", "0"),
        Err(StorageError::RecordNotFound { .. })
    ));
}

#[test]
fn test_deprecated_version_persists() {
    let dir = TempDir::new().unwrap();
    let model = write_artifact(&dir, "model.csv", "a,b");
    {
        let registry = ArtifactRegistry::from_config(&config_in(&dir), dir.path()).unwrap();
        registry.register("resnet", "1.0", &model, &RecordMetadata::default()).unwrap();
        registry.register("resnet", "1.1", &model, &RecordMetadata::default()).unwrap();
        registry.deprecate("resnet", "1.0").unwrap();
    }

    let registry = ArtifactRegistry::from_config(&config_in(&dir), dir.path()).unwrap();
    let flags: Vec<(String, bool)> = registry
        .list()
        .unwrap()
        .into_iter()
        .map(|r| (r.version, r.deprecated))
        .collect();
    assert_eq!(flags, vec![("1.0".to_string(), true), ("1.1".to_string(), false)]);
}
