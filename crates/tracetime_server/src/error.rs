//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracetime_replay::ReplayError;

/// Error returned by resource routes
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Replay could not produce the resource
    #[error(transparent)]
    Replay(#[from] ReplayError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Replay(err) = &self;
        match err {
            ReplayError::StoreUnavailable(reason) => {
                tracing::warn!("Store unavailable: {}", reason);
            }
            other => {
                tracing::debug!("Resource miss: {}", other);
            }
        }

        if err.is_not_found() {
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        } else {
            tracing::error!("Unmapped replay error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
