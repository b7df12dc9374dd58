//! Node labeling daemon.
//!
//! Runs on every node of a cluster, inspects local capabilities (CUDA, NVIDIA
//! GPU tooling) and cluster state (locality, storage pods), and keeps a set of
//! labels on the node's own `Node` object up to date so the scheduler can
//! place workloads by capability.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌──────────┐   ┌─────────┐
//! │  Detectors   │──►│ Aggregator │──►│ DiffGate │──►│ Applier │──► PATCH node
//! └──────────────┘   └────────────┘   └──────────┘   └─────────┘
//!         ▲                 Reconciler (every interval)
//!         └── NodeApi (read node labels, list pods)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use skippy_daemon::{default_detectors, DaemonConfig, KubeNodeApi, NodeIdentity, Reconciler};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = DaemonConfig::default();
//! let api = Arc::new(KubeNodeApi::connect(config.use_kube_config).await?);
//! let identity = NodeIdentity::new(config.node_name.clone(), &config.node_name_env);
//! let mut reconciler = Reconciler::new(api, default_detectors(&config), identity);
//! reconciler.run(config.interval, CancellationToken::new()).await;
//! ```

pub mod aggregator;
pub mod applier;
pub mod cluster;
pub mod config;
pub mod detectors;
pub mod error;
pub mod gate;
pub mod identity;
pub mod labels;
pub mod scheduler;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use aggregator::aggregate;
pub use applier::Applier;
pub use cluster::{KubeNodeApi, NodeApi, PodRecord};
pub use config::{DaemonConfig, LogFormat};
pub use detectors::{default_detectors, DetectContext, Detector};
pub use error::{ApplyError, ClusterError, CycleError, DetectorError, IdentityError};
pub use gate::DiffGate;
pub use identity::NodeIdentity;
pub use labels::{Detection, DetectorResult, LabelSet};
pub use scheduler::{CycleOutcome, Reconciler};
