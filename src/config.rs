// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! # Runtime Configuration
//!
//! Configuration is read from the environment exactly once at startup and
//! collected into an immutable [`AppConfig`] that is handed to the adapters
//! at construction time. Nothing reads ambient environment state per request.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `RPC_URL` | Polygon Amoy JSON-RPC endpoint | `https://rpc-amoy.polygon.technology` |
//! | `ETHERSCAN_API_URL` | Etherscan v2 multichain API endpoint | `https://api.etherscan.io/v2/api` |
//! | `ETHERSCAN_API_KEY` | Block explorer API key | Optional; absence degrades history to empty |
//! | `GEMINI_API_URL` | Gemini API base URL | `https://generativelanguage.googleapis.com` |
//! | `GEMINI_API_KEY` | Gemini API key | Optional; absence fails only the analyze endpoint |
//! | `GEMINI_MODEL` | Gemini model name | `gemini-2.0-flash` |
//! | `SERVER_WALLET_PRIVATE_KEY` | Hex signing key for transfers | Optional; absence fails only the transfer endpoint |
//! | `ALLOWED_ORIGINS` | Comma-separated CORS origins | Empty (permissive CORS) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the Amoy JSON-RPC endpoint.
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Environment variable name for the Etherscan v2 API endpoint.
pub const ETHERSCAN_API_URL_ENV: &str = "ETHERSCAN_API_URL";

/// Environment variable name for the Etherscan API key.
pub const ETHERSCAN_API_KEY_ENV: &str = "ETHERSCAN_API_KEY";

/// Environment variable name for the Gemini API base URL.
pub const GEMINI_API_URL_ENV: &str = "GEMINI_API_URL";

/// Environment variable name for the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable name for the Gemini model.
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";

/// Environment variable name for the server signing key (hex, with or
/// without `0x` prefix).
pub const SERVER_WALLET_PRIVATE_KEY_ENV: &str = "SERVER_WALLET_PRIVATE_KEY";

/// Environment variable name for the comma-separated CORS origin list.
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RPC_URL: &str = "https://rpc-amoy.polygon.technology";
const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Immutable application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Polygon Amoy JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Etherscan v2 multichain API endpoint.
    pub etherscan_api_url: String,
    /// Etherscan API key. `None` degrades history lookups to empty lists.
    pub etherscan_api_key: Option<String>,
    /// Gemini API base URL.
    pub gemini_api_url: String,
    /// Gemini API key. `None` makes the analyze endpoint fail per request.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: String,
    /// Hex private key funding simulated transfers. `None` makes the
    /// transfer endpoint fail per request.
    pub server_wallet_private_key: Option<String>,
    /// Allowed CORS origins. Empty means permissive CORS.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        let port = env_or_default(PORT_ENV, &DEFAULT_PORT.to_string())
            .parse()
            .unwrap_or(DEFAULT_PORT);

        Self {
            host: env_or_default(HOST_ENV, DEFAULT_HOST),
            port,
            rpc_url: env_or_default(RPC_URL_ENV, DEFAULT_RPC_URL),
            etherscan_api_url: env_or_default(ETHERSCAN_API_URL_ENV, DEFAULT_ETHERSCAN_API_URL),
            etherscan_api_key: env_optional(ETHERSCAN_API_KEY_ENV),
            gemini_api_url: env_or_default(GEMINI_API_URL_ENV, DEFAULT_GEMINI_API_URL),
            gemini_api_key: env_optional(GEMINI_API_KEY_ENV),
            gemini_model: env_or_default(GEMINI_MODEL_ENV, DEFAULT_GEMINI_MODEL),
            server_wallet_private_key: env_optional(SERVER_WALLET_PRIVATE_KEY_ENV),
            allowed_origins: parse_origins(&env_or_default(ALLOWED_ORIGINS_ENV, "")),
        }
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Split a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
