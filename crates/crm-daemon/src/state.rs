//! Shared runtime state for crm-daemon.
//!
//! Everything here is `Clone` (via `Arc`). Handlers receive
//! `State<Arc<AppState>>` from Axum and never hold a gateway across requests.

use std::sync::Arc;

use anyhow::{Context, Result};
use crm_config::{secrets::ResolvedDatabaseSecrets, AppConfig, StoreKind};
use crm_db::{Gateway, MemoryGateway, PgCustomerGateway, PgOrderGateway};
use crm_schemas::{Customer, Order};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assembler::RouteTable;

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            service: "crm-daemon",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    /// Which backing store the gateways talk to.
    pub store: StoreKind,
    pub customers: Arc<dyn Gateway<Customer>>,
    pub orders: Arc<dyn Gateway<Order>>,
    /// URI scheme used by the assembler.
    pub routes: RouteTable,
}

impl AppState {
    pub fn new(
        store: StoreKind,
        customers: Arc<dyn Gateway<Customer>>,
        orders: Arc<dyn Gateway<Order>>,
        routes: RouteTable,
    ) -> Self {
        Self {
            build: BuildInfo::current(),
            store,
            customers,
            orders,
            routes,
        }
    }

    /// Empty process-local store.
    pub fn in_memory(routes: RouteTable) -> Self {
        Self::new(
            StoreKind::Memory,
            Arc::new(MemoryGateway::<Customer>::new()),
            Arc::new(MemoryGateway::<Order>::new()),
            routes,
        )
    }

    /// Build state from loaded settings.
    ///
    /// For Postgres this connects and applies migrations before returning, so
    /// a bad URL or unreachable database fails startup rather than the first
    /// request.
    pub async fn from_settings(
        cfg: &AppConfig,
        secrets: Option<ResolvedDatabaseSecrets>,
    ) -> Result<Self> {
        let routes = RouteTable::new(cfg.links.base_url.clone());

        match cfg.store.kind {
            StoreKind::Memory => {
                info!("store=memory (data is lost on restart)");
                Ok(Self::in_memory(routes))
            }
            StoreKind::Postgres => {
                let secrets =
                    secrets.context("store.kind=postgres requires resolved database secrets")?;
                let pool = crm_db::connect(&secrets.url, cfg.database.max_connections).await?;
                crm_db::migrate(&pool).await?;
                info!(
                    max_connections = cfg.database.max_connections,
                    "store=postgres"
                );

                Ok(Self::new(
                    StoreKind::Postgres,
                    Arc::new(PgCustomerGateway::new(pool.clone())),
                    Arc::new(PgOrderGateway::new(pool)),
                    routes,
                ))
            }
        }
    }

    pub fn store_label(&self) -> &'static str {
        match self.store {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}
