//! RPC request handlers.
//!
//! Messages and metadata travel hex-encoded; the engine itself only ever
//! sees raw bytes. Identities use the 64-character hex form of
//! [`SubmoduleId`] and [`WatcherId`].

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use vigil_types::{SubmoduleId, Timestamp, WatcherId};

use crate::error::RpcError;
use crate::server::RpcState;

// ── Pre-verification ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct PreVerifyRequest {
    /// Hex-encoded metadata passed through to the submodule.
    pub metadata: String,
    /// Hex-encoded message bytes.
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PreVerifyResponse {
    pub verified: bool,
    /// Unix seconds at which the pre-verification was recorded.
    pub recorded_at: u64,
}

pub async fn pre_verify(
    State(state): State<Arc<RpcState>>,
    Json(req): Json<PreVerifyRequest>,
) -> Result<Json<PreVerifyResponse>, RpcError> {
    let metadata = decode_hex("metadata", &req.metadata)?;
    let message = decode_hex("message", &req.message)?;
    let now = Timestamp::now();
    let verified = state.engine.pre_verify(&metadata, &message, now)?;
    Ok(Json(PreVerifyResponse {
        verified,
        recorded_at: now.as_secs(),
    }))
}

// ── Verification ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyRequest {
    /// Hex-encoded message bytes. Metadata is ignored at this phase.
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

pub async fn verify(
    State(state): State<Arc<RpcState>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, RpcError> {
    let message = decode_hex("message", &req.message)?;
    let verified = state.engine.verify(&[], &message, Timestamp::now())?;
    Ok(Json(VerifyResponse { verified }))
}

// ── Fraud marking ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct MarkFraudulentRequest {
    /// Hex identity of the flagging watcher.
    pub watcher: String,
    /// Hex identity of the submodule being flagged.
    pub submodule: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MarkFraudulentResponse {
    /// Distinct-watcher flag count after this mark.
    pub flag_count: u32,
}

pub async fn mark_fraudulent(
    State(state): State<Arc<RpcState>>,
    Json(req): Json<MarkFraudulentRequest>,
) -> Result<Json<MarkFraudulentResponse>, RpcError> {
    let watcher = parse_watcher(&req.watcher)?;
    let submodule = parse_submodule(&req.submodule)?;
    state
        .engine
        .mark_fraudulent(&watcher, &submodule, Timestamp::now())?;
    Ok(Json(MarkFraudulentResponse {
        flag_count: state.engine.fraud_count(&submodule),
    }))
}

// ── Read-only queries ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct PreVerifiedRequest {
    pub message: String,
    pub submodule: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PreVerifiedResponse {
    pub pre_verified: bool,
    /// Unix seconds of the recorded pre-verification, if any.
    pub recorded_at: Option<u64>,
}

pub async fn pre_verified(
    State(state): State<Arc<RpcState>>,
    Json(req): Json<PreVerifiedRequest>,
) -> Result<Json<PreVerifiedResponse>, RpcError> {
    let message = decode_hex("message", &req.message)?;
    let submodule = parse_submodule(&req.submodule)?;
    let recorded_at = state.engine.pre_verified_at(&message, &submodule);
    Ok(Json(PreVerifiedResponse {
        pre_verified: recorded_at.is_some(),
        recorded_at: recorded_at.map(|ts| ts.as_secs()),
    }))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IsWatcherResponse {
    pub watcher: String,
    pub is_watcher: bool,
}

pub async fn is_watcher(
    State(state): State<Arc<RpcState>>,
    Path(watcher): Path<String>,
) -> Result<Json<IsWatcherResponse>, RpcError> {
    let id = parse_watcher(&watcher)?;
    Ok(Json(IsWatcherResponse {
        watcher: id.to_string(),
        is_watcher: state.engine.is_watcher(&id),
    }))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FraudCountResponse {
    pub submodule: String,
    pub count: u32,
}

pub async fn fraud_count(
    State(state): State<Arc<RpcState>>,
    Path(submodule): Path<String>,
) -> Result<Json<FraudCountResponse>, RpcError> {
    let id = parse_submodule(&submodule)?;
    Ok(Json(FraudCountResponse {
        submodule: id.to_string(),
        count: state.engine.fraud_count(&id),
    }))
}

// ── Operations ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus text exposition of the node's metric registry.
pub async fn metrics(State(state): State<Arc<RpcState>>) -> Result<String, RpcError> {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&state.registry.gather(), &mut buffer)
        .map_err(|e| RpcError::Server(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| RpcError::Server(e.to_string()))
}

// ── Parsing helpers ──────────────────────────────────────────────────────

fn decode_hex(field: &str, s: &str) -> Result<Vec<u8>, RpcError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| RpcError::InvalidRequest(format!("{field}: {e}")))
}

fn parse_watcher(s: &str) -> Result<WatcherId, RpcError> {
    WatcherId::from_hex(s).map_err(|e| RpcError::InvalidRequest(e.to_string()))
}

fn parse_submodule(s: &str) -> Result<SubmoduleId, RpcError> {
    SubmoduleId::from_hex(s).map_err(|e| RpcError::InvalidRequest(e.to_string()))
}
