//! Vigil daemon — entry point for running a Vigil node.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use vigil_node::{init_logging, LogFormat, NodeConfig, VigilNode};
use vigil_rpc::{RpcServer, RpcState};

#[derive(Parser)]
#[command(name = "vigil-daemon", about = "Vigil optimistic verification node daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VIGIL_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for ledger snapshots.
    #[arg(long, env = "VIGIL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Identity of the underlying verification submodule (hex).
    #[arg(long, env = "VIGIL_SUBMODULE_ID")]
    submodule_id: Option<String>,

    /// Watcher identities (comma-separated hex).
    #[arg(long, env = "VIGIL_WATCHERS", value_delimiter = ',')]
    watchers: Vec<String>,

    /// Fraud quorum threshold.
    #[arg(long, env = "VIGIL_WATCHER_THRESHOLD")]
    watcher_threshold: Option<u32>,

    /// Fraud window in seconds.
    #[arg(long, env = "VIGIL_FRAUD_WINDOW_SECS")]
    fraud_window_secs: Option<u64>,

    /// Disable the RPC server.
    #[arg(long, env = "VIGIL_DISABLE_RPC")]
    disable_rpc: bool,

    /// Address the RPC server binds to.
    #[arg(long, env = "VIGIL_RPC_LISTEN")]
    rpc_listen: Option<String>,

    /// RPC server port.
    #[arg(long, env = "VIGIL_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Enable the Prometheus metrics endpoint.
    #[arg(long, env = "VIGIL_ENABLE_METRICS")]
    metrics: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "VIGIL_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "VIGIL_LOG_FORMAT")]
    log_format: String,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Start the node.
    #[command(name = "node")]
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
}

#[derive(clap::Subcommand)]
enum NodeAction {
    /// Run the node.
    Run,
}

/// Apply CLI flags on top of the file (or default) configuration.
fn merge_config(cli: &Cli, base: NodeConfig) -> NodeConfig {
    NodeConfig {
        data_dir: cli.data_dir.clone().unwrap_or(base.data_dir),
        submodule_id: cli.submodule_id.clone().unwrap_or(base.submodule_id),
        watchers: if cli.watchers.is_empty() {
            base.watchers
        } else {
            cli.watchers.clone()
        },
        watcher_threshold: cli.watcher_threshold.unwrap_or(base.watcher_threshold),
        fraud_window_secs: cli.fraud_window_secs.unwrap_or(base.fraud_window_secs),
        enable_rpc: base.enable_rpc && !cli.disable_rpc,
        rpc_listen: cli.rpc_listen.clone().unwrap_or(base.rpc_listen),
        rpc_port: cli.rpc_port.unwrap_or(base.rpc_port),
        enable_metrics: cli.metrics || base.enable_metrics,
        log_level: cli.log_level.clone(),
        log_format: cli.log_format.clone(),
        ..base
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match cli.config {
        Some(ref path) => NodeConfig::from_toml_file(path)?,
        None => NodeConfig::default(),
    };
    let config = merge_config(&cli, base);

    init_logging(LogFormat::from_config(&config.log_format), &config.log_level);
    if cli.config.is_some() {
        tracing::info!(path = %cli.config.as_ref().unwrap().display(), "loaded config file");
    }

    match cli.command {
        Command::Node { action } => match action {
            NodeAction::Run => run_node(config).await?,
        },
    }

    Ok(())
}

async fn run_node(config: NodeConfig) -> anyhow::Result<()> {
    tracing::info!(
        data_dir = %config.data_dir.display(),
        rpc = if config.enable_rpc {
            format!("{}:{}", config.rpc_listen, config.rpc_port)
        } else {
            "off".into()
        },
        "starting vigil node"
    );

    let node = Arc::new(VigilNode::new(config.clone())?);

    let rpc_handle = if config.enable_rpc {
        let addr: SocketAddr = format!("{}:{}", config.rpc_listen, config.rpc_port).parse()?;
        let state = Arc::new(RpcState {
            engine: Arc::clone(&node.engine),
            registry: node.metrics.registry.clone(),
        });
        let server = RpcServer::new(addr, state);
        let mut shutdown_rx = node.shutdown.subscribe();
        Some(tokio::spawn(server.serve(async move {
            let _ = shutdown_rx.recv().await;
        })))
    } else {
        None
    };

    let node_handle = tokio::spawn(Arc::clone(&node).run());

    node.shutdown.wait_for_signal().await;

    node_handle.await??;
    if let Some(handle) = rpc_handle {
        handle.await??;
    }

    tracing::info!("vigil daemon exited cleanly");
    Ok(())
}
