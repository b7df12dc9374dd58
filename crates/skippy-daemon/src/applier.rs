//! Writes the label set to the node.

use std::sync::Arc;

use tracing::{error, info};

use crate::cluster::NodeApi;
use crate::error::ApplyError;
use crate::gate::DiffGate;
use crate::labels::LabelSet;

/// Issues the label patch and records what was applied.
#[derive(Clone)]
pub struct Applier {
    api: Arc<dyn NodeApi>,
}

impl Applier {
    pub fn new(api: Arc<dyn NodeApi>) -> Self {
        Self { api }
    }

    /// Patch `labels` onto `node` with merge semantics.
    ///
    /// On success the gate remembers `labels`; on failure the gate is left
    /// as it was so the next cycle compares against the same baseline.
    pub async fn apply(
        &self,
        node: &str,
        labels: LabelSet,
        gate: &mut DiffGate,
    ) -> Result<(), ApplyError> {
        info!(node = %node, labels = ?labels, "Updating node labels");

        match self.api.patch_node_labels(node, &labels).await {
            Ok(()) => {
                info!(node = %node, "Label update successful");
                gate.record_applied(labels);
                Ok(())
            }
            Err(source) => {
                if let Some(message) = source.message() {
                    error!(node = %node, message = %message, "Label update rejected by API server");
                } else {
                    error!(node = %node, error = %source, "Label update failed");
                }
                Err(ApplyError {
                    node: node.to_string(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeNodeApi;

    fn labels() -> LabelSet {
        LabelSet::from([("capability.skippy.io/nvidia-cuda".to_string(), "11".to_string())])
    }

    #[tokio::test]
    async fn test_successful_apply_records_labels() {
        let api = Arc::new(FakeNodeApi::new());
        let applier = Applier::new(api.clone());
        let mut gate = DiffGate::new();

        applier.apply("node-1", labels(), &mut gate).await.unwrap();

        assert_eq!(api.patches(), vec![("node-1".to_string(), labels())]);
        assert_eq!(gate.last_applied(), Some(&labels()));
    }

    #[tokio::test]
    async fn test_failed_apply_keeps_baseline() {
        let api = Arc::new(FakeNodeApi::new());
        api.fail_next_patches(1);
        let applier = Applier::new(api.clone());
        let mut gate = DiffGate::new();

        let err = applier.apply("node-1", labels(), &mut gate).await.unwrap_err();

        assert_eq!(err.node, "node-1");
        assert_eq!(err.source.message(), Some("Node is invalid"));
        assert!(api.patches().is_empty());
        assert_eq!(gate.last_applied(), None);
    }

    #[tokio::test]
    async fn test_patch_does_not_remove_unlisted_labels() {
        let api = Arc::new(FakeNodeApi::new().with_node_label("locality.skippy.io/type", "cloud"));
        let applier = Applier::new(api.clone());
        let mut gate = DiffGate::new();

        applier.apply("node-1", labels(), &mut gate).await.unwrap();

        let remote = api.node_labels();
        assert_eq!(remote["locality.skippy.io/type"], "cloud");
        assert_eq!(remote["capability.skippy.io/nvidia-cuda"], "11");
    }
}
