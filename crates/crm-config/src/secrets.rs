//! Runtime secret resolution.
//!
//! # Contract
//! - Config YAML stores only **env var NAMES** (e.g. `"CRM_DATABASE_URL"`).
//! - At startup, callers invoke [`resolve_for_store`] once and pass the result
//!   into constructors; never scatter `std::env::var` calls across the code.
//! - `Debug` impls redact values.
//! - Error messages reference the env var **NAME**, never the value.

use anyhow::{bail, Result};

use crate::{AppConfig, DatabaseConfig, StoreKind};

/// Database connection secrets. **Values are redacted in `Debug` output.**
#[derive(Clone)]
pub struct ResolvedDatabaseSecrets {
    /// Full connection URL, credentials included.
    pub url: String,
}

impl std::fmt::Debug for ResolvedDatabaseSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedDatabaseSecrets")
            .field("url", &"<REDACTED>")
            .finish()
    }
}

/// Resolve a named environment variable.
/// Returns `None` if the variable is unset or its value is blank.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Resolve the database URL named by `cfg.url_env`.
///
/// # Errors
/// `SECRETS_MISSING` naming the env var when it is absent or blank.
pub fn resolve_database_secrets(cfg: &DatabaseConfig) -> Result<ResolvedDatabaseSecrets> {
    let var = cfg.url_env.trim();
    if var.is_empty() {
        bail!("SECRETS_MISSING: database.url_env is empty; name the env var holding the URL");
    }
    match resolve_env(var) {
        Some(url) => Ok(ResolvedDatabaseSecrets { url }),
        None => bail!(
            "SECRETS_MISSING: required env var '{}' (database url) is not set or empty",
            var
        ),
    }
}

/// Secrets required by the configured store: `Some` for Postgres, `None` for
/// the in-memory store, which needs nothing.
pub fn resolve_for_store(cfg: &AppConfig) -> Result<Option<ResolvedDatabaseSecrets>> {
    match cfg.store.kind {
        StoreKind::Postgres => resolve_database_secrets(&cfg.database).map(Some),
        StoreKind::Memory => Ok(None),
    }
}
