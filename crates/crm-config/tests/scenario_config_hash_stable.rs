//! Config hash stability.
//!
//! GREEN when:
//! - Loading the same layers twice returns an identical config_hash.
//! - Reordering keys within YAML doesn't change the hash (canonicalization).
//! - Different values produce different hashes.
//! - Later layers override earlier ones and the typed settings follow.

use crm_config::{load_layered_yaml_from_strings, StoreKind, DEFAULT_ADDR};

const BASE_YAML: &str = r#"
server:
  addr: "0.0.0.0:8080"
links:
  base_url: "http://localhost"
store:
  kind: postgres
database:
  url_env: "CRM_DATABASE_URL"
  max_connections: 5
"#;

const BASE_YAML_REORDERED: &str = r#"
database:
  max_connections: 5
  url_env: "CRM_DATABASE_URL"
store:
  kind: postgres
links:
  base_url: "http://localhost"
server:
  addr: "0.0.0.0:8080"
"#;

const OVERLAY_YAML: &str = r#"
store:
  kind: memory
database:
  max_connections: 2
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let original = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let reordered = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();

    assert_eq!(
        original.config_hash, reordered.config_hash,
        "reordering keys in YAML must not change the hash"
    );
}

#[test]
fn different_values_produce_different_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();

    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_overrides_base_and_keeps_untouched_siblings() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let s = &loaded.settings;

    assert_eq!(s.store.kind, StoreKind::Memory);
    assert_eq!(s.database.max_connections, 2);
    assert_eq!(s.database.url_env, "CRM_DATABASE_URL");
    assert_eq!(s.server.addr, "0.0.0.0:8080");
    assert_eq!(s.links.base_url, "http://localhost");
}

#[test]
fn no_layers_yield_defaults() {
    let loaded = load_layered_yaml_from_strings(&[]).unwrap();
    let s = &loaded.settings;

    assert_eq!(s.server.addr, DEFAULT_ADDR);
    assert_eq!(s.links.base_url, "");
    assert_eq!(s.store.kind, StoreKind::Postgres);
    assert_eq!(s.database.url_env, "CRM_DATABASE_URL");
    assert_eq!(s.database.max_connections, 10);
    assert_eq!(loaded.config_hash.len(), 64);
}

#[test]
fn unknown_store_kind_is_rejected() {
    let res = load_layered_yaml_from_strings(&["store:\n  kind: redis\n"]);
    assert!(res.is_err(), "unknown store kind must fail to load");
}
