//! Wire representations for every crm-daemon HTTP endpoint.
//!
//! HAL-shaped: entity fields at the top level, links under `_links`,
//! collections under `_embedded.<kind>List`. No business logic lives here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Link relation → link.
pub type Links = BTreeMap<String, Link>;

// ---------------------------------------------------------------------------
// Entity / collection models
// ---------------------------------------------------------------------------

/// One entity plus its navigation links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// A list of entity models plus the collection's own links.
///
/// `_embedded` is omitted entirely for an empty collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionModel<T> {
    #[serde(
        rename = "_embedded",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub embedded: BTreeMap<String, Vec<EntityModel<T>>>,
    #[serde(rename = "_links")]
    pub links: Links,
}

// ---------------------------------------------------------------------------
// Problem details (application/problem+json)
// ---------------------------------------------------------------------------

pub const PROBLEM_JSON: &str = "application/problem+json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub title: String,
    pub detail: String,
}

impl Problem {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// /health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
    /// "postgres" | "memory"
    pub store: String,
}
