// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use certledger::api::router;
use certledger::blockchain::RegistryClient;
use certledger::config::AppConfig;
use certledger::files::FileStore;
use certledger::state::AppState;
use certledger::storage::{DualStore, StoragePaths};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Storage: embedded primary store + JSON mirror + public file tree.
    let paths = StoragePaths::new(&config.data_dir, &config.public_dir);
    let store = DualStore::open(&paths).expect("Failed to open persistence backends");
    let files = FileStore::new(paths);
    files
        .initialize()
        .expect("Failed to create public file directories");

    // Registry contract client (gas estimation, signing, broadcast).
    let registry = RegistryClient::new(
        &config.rpc_url,
        &config.registry_address,
        &config.issuer_private_key,
    )
    .expect("Failed to connect registry client");

    let state = AppState::new(store, Arc::new(registry), files);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, rpc = %config.rpc_url, contract = %config.registry_address,
        "certledger listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
