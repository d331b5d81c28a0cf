//! Layered YAML configuration for the crm service.
//!
//! Documents are merged in order (earlier = base, later = override), checked
//! for secret literals, hashed, then deserialized into [`AppConfig`]. Secrets
//! never live in YAML: the file names an env var and [`secrets`] resolves it.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::net::SocketAddr;

pub mod secrets;

/// Env var holding a comma-separated list of YAML paths, in merge order.
pub const ENV_CONFIG_PATHS: &str = "CRM_CONFIG";

/// Env var overriding `server.addr`.
pub const ENV_DAEMON_ADDR: &str = "CRM_DAEMON_ADDR";

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DATABASE_URL_ENV: &str = "CRM_DATABASE_URL";

// ---------------------------------------------------------------------------
// Typed settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub links: LinksConfig,
    pub store: StoreConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the daemon binds, e.g. "0.0.0.0:8080".
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

impl ServerConfig {
    /// Address to bind: `env_override` (the value of `CRM_DAEMON_ADDR`) wins
    /// over `addr`. A malformed value is an error naming its source.
    pub fn bind_addr(&self, env_override: Option<&str>) -> Result<SocketAddr> {
        match env_override.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid {ENV_DAEMON_ADDR} '{raw}'")),
            None => self
                .addr
                .parse()
                .with_context(|| format!("invalid server.addr '{}'", self.addr)),
        }
    }
}

/// Prefix prepended to every hypermedia link. Empty means links are
/// root-relative ("/customers/1").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Postgres,
    /// Process-local store; data is lost on restart. Dev and tests only.
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// NAME of the env var carrying the connection URL (not the URL itself).
    pub url_env: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url_env: DEFAULT_DATABASE_URL_ENV.to_string(),
            max_connections: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    pub settings: AppConfig,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        // An empty document parses as null; treat it as "no overrides".
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let settings: AppConfig =
        serde_json::from_value(merged.clone()).context("config does not match schema")?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
        settings,
    })
}

/// Load the files listed in `CRM_CONFIG`, or built-in defaults when unset.
pub fn load_from_env() -> Result<LoadedConfig> {
    match std::env::var(ENV_CONFIG_PATHS) {
        Ok(raw) if !raw.trim().is_empty() => {
            let paths: Vec<&str> = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            load_layered_yaml(&paths)
        }
        _ => load_layered_yaml_from_strings(&[]),
    }
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json's default Map is a BTreeMap, so key order is stable.
    let s = serde_json::to_string(v).context("canonical json serialize failed")?;
    Ok(s)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Secret-literal guard
// ---------------------------------------------------------------------------

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        if let Some(s) = v.pointer(&ptr).and_then(Value::as_str) {
            if looks_like_secret(s) {
                bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
            }
        }
    }
    Ok(())
}

/// A URL with a password in its userinfo (`postgres://u:p@host/db`) or a PEM
/// block.
fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.starts_with("-----BEGIN") {
        return true;
    }
    let Some((_, rest)) = t.split_once("://") else {
        return false;
    };
    let authority = rest.split('/').next().unwrap_or("");
    match authority.rsplit_once('@') {
        Some((userinfo, _)) => userinfo.contains(':'),
        None => false,
    }
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{}/{}", prefix, i);
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => out.push(prefix.to_string()),
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}
