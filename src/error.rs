// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! HTTP error type and the classification of service failures.
//!
//! Every failure leaving a handler passes through [`ApiError`], which
//! guarantees the uniform `{ success: false, message, statusCode }` body.
//! Upstream causes are logged server-side here; the response only ever
//! carries the classified message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::service::ServiceError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(rename = "statusCode")]
    status_code: u16,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::SignerUnconfigured => {
                // Do not tell untrusted callers which key is missing.
                tracing::error!("Transfer rejected: server signing key is not configured");
                ApiError::internal("Server wallet is not configured.")
            }
            ServiceError::InsufficientFunds => {
                tracing::error!("Transfer rejected: server wallet has insufficient funds");
                ApiError::internal("Server wallet has insufficient funds.")
            }
            ServiceError::KeyGeneration(detail) => {
                tracing::error!("Key generation failed: {detail}");
                ApiError::internal("Error creating wallet")
            }
            ServiceError::Chain(detail) => {
                tracing::error!("Chain RPC failure: {detail}");
                ApiError::internal("Error communicating with the blockchain network")
            }
            ServiceError::Transfer(detail) => {
                tracing::error!("Transfer failed: {detail}");
                ApiError::internal(detail)
            }
            ServiceError::Analysis(detail) => {
                tracing::error!("Analysis failed: {detail}");
                ApiError::internal(detail)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            message: self.message,
            status_code: self.status.as_u16(),
        });
        (self.status, body).into_response()
    }
}
