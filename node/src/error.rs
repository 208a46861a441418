use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("engine error: {0}")]
    Engine(#[from] vigil_engine::EngineError),

    #[error("ledger error: {0}")]
    Ledger(#[from] vigil_ledger::LedgerError),

    #[error("invalid configuration value: {0}")]
    Identity(#[from] vigil_types::VigilError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RPC server error: {0}")]
    Rpc(String),

    #[error("{0}")]
    Other(String),
}
