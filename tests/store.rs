use gapma::data::{DescriptionStore, COMPETITORS_KEY};
use gapma::engines::generation::Strategy;
use gapma::error::GapmaError;
use serde_json::json;

#[test]
fn test_merge_keeps_sibling_strategies() {
    let dir = tempfile::tempdir().unwrap();
    let store = DescriptionStore::new(dir.path().join("tool_descriptions.json"));

    store.set_description("Weather", "get-forecast", Strategy::Authority, "v1").unwrap();
    store.set_description("Weather", "get-forecast", Strategy::Emotion, "v2").unwrap();

    let doc = store.load().unwrap();
    assert_eq!(doc["Weather"]["get-forecast"]["Au"], json!("v1"));
    assert_eq!(doc["Weather"]["get-forecast"]["Em"], json!("v2"));
}

#[test]
fn test_competitors_live_beside_strategies() {
    let dir = tempfile::tempdir().unwrap();
    let store = DescriptionStore::new(dir.path().join("nested/out.json"));

    store.set_description("Weather", "get-alerts", Strategy::Subliminal, "s").unwrap();
    store
        .set_competitors("Weather", "get-alerts", &["c1".to_string(), "c2".to_string()])
        .unwrap();
    store.set_description("Weather", "get-forecast", Strategy::Exaggeration, "e").unwrap();
    store.set_description("Fetch", "fetch", Strategy::Authority, "f").unwrap();

    let doc = store.load().unwrap();
    assert_eq!(doc["Weather"]["get-alerts"]["Su"], json!("s"));
    assert_eq!(doc["Weather"]["get-alerts"][COMPETITORS_KEY], json!(["c1", "c2"]));
    assert_eq!(doc["Weather"]["get-forecast"]["Ex"], json!("e"));
    assert_eq!(doc["Fetch"]["fetch"]["Au"], json!("f"));

    assert_eq!(
        store.get("Weather", "get-alerts", "Su").unwrap(),
        Some(json!("s"))
    );
    assert_eq!(store.get("Weather", "missing", "Su").unwrap(), None);
}

#[test]
fn test_overwrite_replaces_only_target_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = DescriptionStore::new(dir.path().join("out.json"));

    store.set_description("Time", "now", Strategy::Emotion, "old").unwrap();
    store.set_description("Time", "now", Strategy::Authority, "keep").unwrap();
    store.set_description("Time", "now", Strategy::Emotion, "new").unwrap();

    let doc = store.load().unwrap();
    assert_eq!(doc["Time"]["now"], json!({"Au": "keep", "Em": "new"}));
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = DescriptionStore::new(dir.path().join("absent.json"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_refuses_to_clobber_non_object_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    std::fs::write(&path, r#"{"Weather": "not an object"}"#).unwrap();

    let store = DescriptionStore::new(&path);
    assert!(matches!(
        store.set_description("Weather", "get-forecast", Strategy::Authority, "v"),
        Err(GapmaError::Store(_))
    ));

    let untouched = std::fs::read_to_string(&path).unwrap();
    assert_eq!(untouched, r#"{"Weather": "not an object"}"#);
}
