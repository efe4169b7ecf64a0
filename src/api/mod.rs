// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{AnalysisResult, BalanceResult, TransferResult, Wallet},
    state::AppState,
};

pub mod health;
pub mod rate_limit;
pub mod wallet;

use rate_limit::RateLimiter;

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let wallet_routes = Router::new()
        .route("/wallet/create", post(wallet::create_wallet))
        .route("/wallet/balance/{address}", get(wallet::get_balance))
        .route("/wallet/transfer", post(wallet::simulate_transfer))
        .route("/wallet/analyze/{address}", get(wallet::analyze_wallet))
        .layer(middleware::from_fn_with_state(
            RateLimiter::default(),
            rate_limit::rate_limit_middleware,
        ))
        .with_state(state);

    Router::new()
        .nest("/api/v1", wallet_routes)
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Restrict CORS to the configured origins; fall back to permissive when
/// none are configured (local development).
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([CONTENT_TYPE])
            .allow_credentials(true)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        wallet::create_wallet,
        wallet::get_balance,
        wallet::simulate_transfer,
        wallet::analyze_wallet,
        health::health
    ),
    components(
        schemas(
            Wallet,
            BalanceResult,
            TransferResult,
            AnalysisResult,
            wallet::TransferRequest,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Wallet", description = "Wallet generation, balances, transfers and analysis"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;
