//! The reconciliation loop.
//!
//! Each cycle resolves the node name, aggregates detector output, and
//! patches the node only when the label set changed since the last
//! successful apply. Failures are logged and never end the loop; only the
//! shutdown token does.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::aggregator::aggregate;
use crate::applier::Applier;
use crate::cluster::NodeApi;
use crate::detectors::{DetectContext, Detector};
use crate::error::CycleError;
use crate::gate::DiffGate;
use crate::identity::NodeIdentity;
use crate::labels::LabelSet;

/// What a completed cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The label set changed and was patched onto the node.
    Applied(LabelSet),
    /// Nothing changed since the last successful apply.
    Unchanged,
}

/// Drives detectors, the diff gate and the applier for one node.
pub struct Reconciler {
    api: Arc<dyn NodeApi>,
    detectors: Vec<Box<dyn Detector>>,
    identity: NodeIdentity,
    gate: DiffGate,
    applier: Applier,
}

impl Reconciler {
    pub fn new(
        api: Arc<dyn NodeApi>,
        detectors: Vec<Box<dyn Detector>>,
        identity: NodeIdentity,
    ) -> Self {
        Self {
            applier: Applier::new(api.clone()),
            api,
            detectors,
            identity,
            gate: DiffGate::new(),
        }
    }

    /// The last label set applied by this instance.
    pub fn last_applied(&self) -> Option<&LabelSet> {
        self.gate.last_applied()
    }

    /// Run one reconciliation cycle.
    #[instrument(skip(self))]
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        let node = self.identity.resolve()?.to_string();

        let ctx = DetectContext {
            node_name: &node,
            api: self.api.as_ref(),
        };
        let labels = aggregate(&self.detectors, &ctx).await;

        if !self.gate.should_apply(&labels) {
            debug!(node = %node, "Labels have not changed, no update necessary");
            return Ok(CycleOutcome::Unchanged);
        }

        self.applier
            .apply(&node, labels.clone(), &mut self.gate)
            .await?;
        Ok(CycleOutcome::Applied(labels))
    }

    /// Run exactly `cycles` cycles back to back, without sleeping.
    pub async fn run_cycles(&mut self, cycles: usize) -> Vec<Result<CycleOutcome, CycleError>> {
        let mut outcomes = Vec::with_capacity(cycles);
        for _ in 0..cycles {
            outcomes.push(self.run_cycle().await);
        }
        outcomes
    }

    /// Reconcile every `interval` until `shutdown` is cancelled.
    pub async fn run(&mut self, interval: Duration, shutdown: CancellationToken) {
        info!(interval_secs = interval.as_secs(), "Starting reconciliation loop");

        while !shutdown.is_cancelled() {
            match self.run_cycle().await {
                Ok(outcome) => debug!(?outcome, "Cycle complete"),
                Err(CycleError::Identity(e)) => {
                    error!(error = %e, "The name of the node could not be found");
                }
                Err(e) => error!(error = ?e, "Reconciliation cycle failed"),
            }

            debug!(interval_secs = interval.as_secs(), "Waiting until re-check");
            tokio::select! {
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(interval) => {}
            }
        }

        info!("Reconciliation loop stopped");
    }
}
