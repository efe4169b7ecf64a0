// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

use std::{net::SocketAddr, sync::Arc};

use amoy_wallet_server::{
    analysis::GeminiClient,
    api::router,
    chain::{signer_from_hex, AmoyClient, NetworkConfig},
    config::{AppConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    explorer::EtherscanClient,
    service::WalletService,
    state::AppState,
};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env();

    // The signing key is loaded once here and reused for every transfer.
    let signer = config
        .server_wallet_private_key
        .as_deref()
        .map(|key| signer_from_hex(key).expect("SERVER_WALLET_PRIVATE_KEY is not a valid key"));
    if signer.is_none() {
        tracing::warn!(
            "SERVER_WALLET_PRIVATE_KEY is not set; the transfer endpoint will fail until it is"
        );
    }
    if config.etherscan_api_key.is_none() {
        tracing::warn!("ETHERSCAN_API_KEY is not set; history lookups will return empty lists");
    }
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; the analyze endpoint will fail until it is");
    }

    let network = NetworkConfig::amoy_with_rpc(config.rpc_url.clone());
    let chain = AmoyClient::new(network.clone(), signer).expect("Failed to build chain client");

    match chain.get_block_number().await {
        Ok(block) => tracing::info!("Connected to {}. Current block: {block}", network.name),
        Err(e) => tracing::warn!("Could not reach RPC endpoint {}: {e}", network.rpc_url),
    }

    let explorer = EtherscanClient::new(
        config.etherscan_api_url.clone(),
        config.etherscan_api_key.clone(),
        network.chain_id,
    )
    .expect("Failed to build explorer client");

    let gemini = GeminiClient::new(
        config.gemini_api_url.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    )
    .expect("Failed to build analysis client");

    let service = WalletService::new(Arc::new(chain), Arc::new(explorer), Arc::new(gemini));
    let state = AppState::new(service);
    let app = router(state, &config.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!("Amoy wallet server listening on http://{addr} (docs at /docs)");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    tracing::info!("Shutdown signal received, stopping server");
}
