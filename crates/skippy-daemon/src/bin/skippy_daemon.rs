//! Skippy Daemon - keeps capability labels on the local node up to date.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use skippy_daemon::config::{DEFAULT_INTERVAL, NODE_NAME_ENV};
use skippy_daemon::detectors::cuda::DEFAULT_VERSION_FILE;
use skippy_daemon::{
    default_detectors, telemetry, DaemonConfig, KubeNodeApi, LogFormat, NodeIdentity, Reconciler,
};

/// Skippy Daemon - doing the dirty work away from the spotlight.
#[derive(Parser, Debug)]
#[command(name = "skippy-daemon", version)]
#[command(about = "Labels the local Kubernetes node with its detected capabilities")]
struct Cli {
    /// Load kube config from the home directory instead of the in-cluster config.
    #[arg(short = 'c', long = "kube-config", default_value = "false")]
    kube_config: bool,

    /// Node name to use (instead of environment variable NODE_NAME).
    #[arg(short = 'n', long = "node")]
    node_name: Option<String>,

    /// Enable debug logs.
    #[arg(short, long, default_value = "false")]
    debug: bool,

    /// Log output format (text or json).
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Seconds between two label checks (at least 1).
    #[arg(
        long,
        env = "SKIPPY_INTERVAL_SECS",
        default_value_t = DEFAULT_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval_secs: u64,

    /// CUDA toolkit version file.
    #[arg(long, default_value = DEFAULT_VERSION_FILE)]
    cuda_version_file: PathBuf,

    /// Run a single cycle and exit.
    #[arg(long, default_value = "false")]
    once: bool,
}

impl From<Cli> for DaemonConfig {
    fn from(cli: Cli) -> Self {
        Self {
            use_kube_config: cli.kube_config,
            node_name: cli.node_name,
            node_name_env: NODE_NAME_ENV.to_string(),
            debug: cli.debug,
            log_format: cli.log_format,
            interval: Duration::from_secs(cli.interval_secs),
            cuda_version_file: cli.cuda_version_file,
            once: cli.once,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = DaemonConfig::from(Cli::parse());
    telemetry::init(&config);

    info!(
        node = config.node_name.as_deref().unwrap_or("<from env>"),
        interval_secs = config.interval.as_secs(),
        "Starting skippy-daemon"
    );

    let api = KubeNodeApi::connect(config.use_kube_config)
        .await
        .context("Failed to connect to the Kubernetes API")?;

    let identity = NodeIdentity::new(config.node_name.clone(), &config.node_name_env);
    let mut reconciler = Reconciler::new(Arc::new(api), default_detectors(&config), identity);

    if config.once {
        let outcome = reconciler
            .run_cycle()
            .await
            .context("Reconciliation cycle failed")?;
        info!(?outcome, "Single cycle complete");
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.cancel();
    });

    reconciler.run(config.interval, shutdown).await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
