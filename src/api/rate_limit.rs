// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Per-IP fixed-window rate limiting for the API prefix.
//!
//! 50 requests per 15-minute window per client IP. Excess traffic gets a
//! fixed message and status 429. Requests without a resolvable peer
//! address (e.g. in tests without connect info) share one bucket.

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Maximum requests per window per client IP.
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 50;

/// Window length.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Fixed rejection message.
pub const RATE_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again after 15 minutes";

struct Bucket {
    window_start: Instant,
    count: u32,
}

/// Shared fixed-window counter keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    buckets: Arc<Mutex<HashMap<IpAddr, Bucket>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            buckets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record one request for `ip` and report whether it is allowed.
    pub fn check(&self, ip: Option<IpAddr>) -> bool {
        let key = ip.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let now = Instant::now();

        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let bucket = buckets.entry(key).or_insert(Bucket {
            window_start: now,
            count: 0,
        });

        if now.duration_since(bucket.window_start) >= self.window {
            bucket.window_start = now;
            bucket.count = 0;
        }

        if bucket.count >= self.max_requests {
            false
        } else {
            bucket.count += 1;
            true
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW)
    }
}

/// Axum middleware enforcing the limiter on every request it wraps.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    if limiter.check(ip) {
        next.run(request).await
    } else {
        ApiError::too_many_requests(RATE_LIMIT_MESSAGE).into_response()
    }
}
