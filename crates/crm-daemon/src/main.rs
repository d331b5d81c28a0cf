//! crm-daemon entry point.
//!
//! Thin on purpose: load config, resolve secrets, build state, wire
//! middleware, serve. Handlers live in `routes.rs`; state in `state.rs`.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use crm_config::{secrets, ENV_DAEMON_ADDR};
use crm_daemon::{routes, state::AppState};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let loaded = crm_config::load_from_env().context("config load failed")?;
    info!(config_hash = %loaded.config_hash, "config loaded");
    let cfg = loaded.settings;

    // Fail before binding a socket when a required secret is missing.
    let db_secrets = secrets::resolve_for_store(&cfg)?;

    let shared = Arc::new(
        AppState::from_settings(&cfg, db_secrets)
            .await
            .context("state init failed")?,
    );

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let env_addr = std::env::var(ENV_DAEMON_ADDR).ok();
    let addr = cfg.server.bind_addr(env_addr.as_deref())?;
    info!("crm-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            // No signal handler: keep serving until the process is killed.
            error!(error = %err, "ctrl-c handler unavailable; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(tower_http::cors::Any)
}
