//! Storage role: marks nodes that host a storage pod.

use async_trait::async_trait;
use tracing::debug;

use super::{DetectContext, Detector};
use crate::error::DetectorError;
use crate::labels::{keys, DetectorResult};

pub struct StorageNodeDetector {
    pod_selector: String,
}

impl StorageNodeDetector {
    pub fn new(pod_selector: impl Into<String>) -> Self {
        Self {
            pod_selector: pod_selector.into(),
        }
    }
}

impl Default for StorageNodeDetector {
    fn default() -> Self {
        Self::new(keys::STORAGE_POD_SELECTOR)
    }
}

#[async_trait]
impl Detector for StorageNodeDetector {
    fn key(&self) -> &str {
        keys::STORAGE_NODE
    }

    async fn detect(&self, ctx: &DetectContext<'_>) -> Result<DetectorResult, DetectorError> {
        let pods = ctx
            .api
            .list_pods_on_node(ctx.node_name, &self.pod_selector)
            .await?;

        if let Some(pod) = pods.first() {
            debug!(
                label = keys::STORAGE_NODE,
                pod = %pod.name,
                count = pods.len(),
                "Found a storage pod on the node"
            );
            Ok(DetectorResult::present(self.key(), keys::PRESENT))
        } else {
            debug!(
                label = keys::STORAGE_NODE,
                selector = %self.pod_selector,
                "No storage pod found on the node"
            );
            Ok(DetectorResult::absent(self.key()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeNodeApi;

    #[tokio::test]
    async fn test_storage_pod_on_node_is_present() {
        let api = FakeNodeApi::new().with_pod("node-1", "app=minio", "minio-0");
        let ctx = DetectContext {
            node_name: "node-1",
            api: &api,
        };

        let result = StorageNodeDetector::default().detect(&ctx).await.unwrap();
        assert_eq!(result, DetectorResult::present(keys::STORAGE_NODE, ""));
    }

    #[tokio::test]
    async fn test_storage_pod_on_other_node_is_absent() {
        let api = FakeNodeApi::new().with_pod("node-2", "app=minio", "minio-0");
        let ctx = DetectContext {
            node_name: "node-1",
            api: &api,
        };

        let result = StorageNodeDetector::default().detect(&ctx).await.unwrap();
        assert_eq!(result, DetectorResult::absent(keys::STORAGE_NODE));
    }

    #[tokio::test]
    async fn test_custom_selector() {
        let api = FakeNodeApi::new().with_pod("node-1", "app=ceph", "ceph-osd-0");
        let ctx = DetectContext {
            node_name: "node-1",
            api: &api,
        };

        let minio = StorageNodeDetector::default().detect(&ctx).await.unwrap();
        assert_eq!(minio, DetectorResult::absent(keys::STORAGE_NODE));

        let ceph = StorageNodeDetector::new("app=ceph").detect(&ctx).await.unwrap();
        assert_eq!(ceph, DetectorResult::present(keys::STORAGE_NODE, ""));
    }

    #[tokio::test]
    async fn test_list_failure_is_an_error() {
        let api = FakeNodeApi::new().failing_lists();
        let ctx = DetectContext {
            node_name: "node-1",
            api: &api,
        };

        assert!(StorageNodeDetector::default().detect(&ctx).await.is_err());
    }
}
