//! Network locality role.
//!
//! Proposes a default locality only while the node has none. A value that is
//! already on the node, whether operator-set or written by an earlier cycle,
//! is never overridden.

use async_trait::async_trait;
use tracing::debug;

use super::{DetectContext, Detector};
use crate::error::DetectorError;
use crate::labels::{keys, DetectorResult};

pub struct LocalityDetector {
    default_value: String,
}

impl LocalityDetector {
    pub fn new(default_value: impl Into<String>) -> Self {
        Self {
            default_value: default_value.into(),
        }
    }
}

impl Default for LocalityDetector {
    fn default() -> Self {
        Self::new(keys::DEFAULT_LOCALITY)
    }
}

#[async_trait]
impl Detector for LocalityDetector {
    fn key(&self) -> &str {
        keys::LOCALITY_TYPE
    }

    async fn detect(&self, ctx: &DetectContext<'_>) -> Result<DetectorResult, DetectorError> {
        let labels = ctx.api.read_node_labels(ctx.node_name).await?;

        if let Some(current) = labels.get(keys::LOCALITY_TYPE) {
            debug!(
                label = keys::LOCALITY_TYPE,
                value = %current,
                "Locality already present, not doing anything"
            );
            return Ok(DetectorResult::abstain(self.key()));
        }

        debug!(
            label = keys::LOCALITY_TYPE,
            value = %self.default_value,
            "Locality not yet set, using default"
        );
        Ok(DetectorResult::present(self.key(), self.default_value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeNodeApi;

    #[tokio::test]
    async fn test_unset_locality_proposes_default() {
        let api = FakeNodeApi::new();
        let ctx = DetectContext {
            node_name: "node-1",
            api: &api,
        };

        let result = LocalityDetector::default().detect(&ctx).await.unwrap();
        assert_eq!(result, DetectorResult::present(keys::LOCALITY_TYPE, "edge"));
    }

    #[tokio::test]
    async fn test_existing_locality_abstains() {
        let api = FakeNodeApi::new().with_node_label(keys::LOCALITY_TYPE, "cloud");
        let ctx = DetectContext {
            node_name: "node-1",
            api: &api,
        };

        let result = LocalityDetector::default().detect(&ctx).await.unwrap();
        assert_eq!(result, DetectorResult::abstain(keys::LOCALITY_TYPE));
    }

    #[tokio::test]
    async fn test_read_failure_is_an_error() {
        let api = FakeNodeApi::new().failing_reads();
        let ctx = DetectContext {
            node_name: "node-1",
            api: &api,
        };

        let err = LocalityDetector::default().detect(&ctx).await.unwrap_err();
        assert!(matches!(err, DetectorError::Cluster(_)));
    }
}
