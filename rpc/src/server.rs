//! Axum-based RPC server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use vigil_engine::VerificationEngine;

use crate::error::RpcError;
use crate::handlers;

/// Shared state handed to every handler.
pub struct RpcState {
    pub engine: Arc<VerificationEngine>,
    /// Registry encoded by the `/metrics` endpoint. The node passes its own;
    /// standalone use gets an empty one.
    pub registry: prometheus::Registry,
}

pub struct RpcServer {
    addr: SocketAddr,
    state: Arc<RpcState>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, state: Arc<RpcState>) -> Self {
        Self { addr, state }
    }

    /// Build the API router.
    pub fn router(state: Arc<RpcState>) -> Router {
        Router::new()
            .route("/pre_verify", post(handlers::pre_verify))
            .route("/verify", post(handlers::verify))
            .route("/mark_fraudulent", post(handlers::mark_fraudulent))
            .route("/pre_verified", post(handlers::pre_verified))
            .route("/watchers/:id", get(handlers::is_watcher))
            .route("/fraud_count/:submodule", get(handlers::fraud_count))
            .route("/health", get(handlers::health))
            .route("/metrics", get(handlers::metrics))
            .with_state(state)
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = Self::router(self.state);
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.addr)))?;
        let local = listener
            .local_addr()
            .map_err(|e| RpcError::Server(e.to_string()))?;
        tracing::info!(addr = %local, "RPC server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;

        tracing::info!("RPC server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_engine::{StaticRouting, WatcherSet};
    use vigil_nullables::NullSubmodule;
    use vigil_types::{FraudWindow, SubmoduleId, WatcherId};

    fn test_state() -> Arc<RpcState> {
        let submodule = Arc::new(NullSubmodule::accepting(SubmoduleId::new([1; 32])));
        let watchers =
            WatcherSet::new([WatcherId::new([2; 32])].into_iter().collect(), 1).unwrap();
        let routing = StaticRouting::new(submodule, watchers, FraudWindow::default());
        Arc::new(RpcState {
            engine: Arc::new(VerificationEngine::new(Arc::new(routing))),
            registry: prometheus::Registry::new(),
        })
    }

    #[test]
    fn router_builds_with_all_routes() {
        let _router = RpcServer::router(test_state());
    }

    #[tokio::test]
    async fn serve_binds_and_shuts_down() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let server = RpcServer::new(addr, test_state());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve(async move {
            let _ = rx.await;
        }));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
