//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use vigil_engine::EngineError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("server error: {0}")]
    Server(String),
}

/// JSON body returned for every failed request.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl RpcError {
    /// HTTP status for this error.
    ///
    /// Engine variants map by class: sequencing misuse is a conflict,
    /// missing state is not-found, an open window is "too early", safety
    /// and authorization rejections are forbidden, and a failed delegated
    /// verification is a bad gateway.
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Engine(e) => match e {
                EngineError::NoSubmodule | EngineError::NotPreVerified => StatusCode::NOT_FOUND,
                EngineError::AlreadyPreVerified(_) | EngineError::AlreadyMarked { .. } => {
                    StatusCode::CONFLICT
                }
                EngineError::NotElapsed { .. } => StatusCode::TOO_EARLY,
                EngineError::FraudThresholdReached { .. } | EngineError::NotAWatcher(_) => {
                    StatusCode::FORBIDDEN
                }
                EngineError::UnderlyingVerificationFailed(_) => StatusCode::BAD_GATEWAY,
                EngineError::InvalidWatcherSet { .. } | EngineError::Other(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RpcError::InvalidRequest(_) => "invalid_request",
            RpcError::Engine(e) => match e {
                EngineError::NoSubmodule => "no_submodule",
                EngineError::AlreadyPreVerified(_) => "already_pre_verified",
                EngineError::NotPreVerified => "not_pre_verified",
                EngineError::NotElapsed { .. } => "not_elapsed",
                EngineError::FraudThresholdReached { .. } => "fraud_threshold_reached",
                EngineError::NotAWatcher(_) => "not_a_watcher",
                EngineError::AlreadyMarked { .. } => "already_marked",
                EngineError::UnderlyingVerificationFailed(_) => "underlying_verification_failed",
                EngineError::InvalidWatcherSet { .. } | EngineError::Other(_) => "internal",
            },
            RpcError::Server(_) => "server",
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}
