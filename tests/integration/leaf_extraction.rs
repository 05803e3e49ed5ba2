//! Integration tests for reading artifacts into leaf sequences

use super::test_utils::write_artifact;
use modelseal::config::ExtractionConfig;
use modelseal::error::EngineError;
use modelseal::tree::{build_root, extract_leaves, LeafExtractor};
use tempfile::TempDir;

#[test]
fn test_utf8_bom_is_not_part_of_first_leaf() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, "model.csv", b"\xEF\xBB\xBFw1,w2");
    assert_eq!(extract_leaves(&path).unwrap(), vec!["w1", "w2"]);
}

#[test]
fn test_trailing_newline_does_not_change_fingerprint() {
    let dir = TempDir::new().unwrap();
    let plain = write_artifact(&dir, "a.csv", "m1,m2,m3");
    let crlf = write_artifact(&dir, "b.csv", "m1,m2,m3\r\n");

    let plain_root = build_root(&extract_leaves(&plain).unwrap()).unwrap();
    let crlf_root = build_root(&extract_leaves(&crlf).unwrap()).unwrap();
    assert_eq!(plain_root, crlf_root);
}

#[test]
fn test_utf16_big_endian_bom() {
    let dir = TempDir::new().unwrap();
    let mut bytes = vec![0xFE, 0xFF];
    for unit in "x,y,z".encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    let path = write_artifact(&dir, "model.csv", bytes);
    assert_eq!(extract_leaves(&path).unwrap(), vec!["x", "y", "z"]);
}

#[test]
fn test_empty_file_yields_one_empty_leaf() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, "empty.csv", "");
    let leaves = extract_leaves(&path).unwrap();
    assert_eq!(leaves, vec![""]);
    assert!(build_root(&leaves).is_ok());
}

#[test]
fn test_extractor_from_config() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, "model.csv", "a,b,c,d,e,f");

    let config = ExtractionConfig {
        fallback_encoding: "utf-8".to_string(),
        max_artifact_bytes: Some(5),
    };
    let extractor = config.extractor().unwrap();
    assert_eq!(extractor.max_bytes(), Some(5));
    assert!(matches!(
        extractor.extract(&path),
        Err(EngineError::TooLarge { .. })
    ));
}

#[test]
fn test_unknown_fallback_label_is_config_error() {
    let config = ExtractionConfig {
        fallback_encoding: "klingon".to_string(),
        max_artifact_bytes: None,
    };
    assert!(config.extractor().is_err());
}

#[test]
fn test_default_extractor_matches_free_function() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, "model.csv", "p,q");
    assert_eq!(
        LeafExtractor::default().extract(&path).unwrap(),
        extract_leaves(&path).unwrap()
    );
}
