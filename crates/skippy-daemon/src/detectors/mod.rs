//! Capability detectors.
//!
//! Each [`Detector`] owns exactly one label key and recommends a value for it
//! on every cycle. "Capability not present" is a normal result
//! ([`Detection::Absent`](crate::labels::Detection::Absent)); only real
//! failures such as permission errors surface as [`DetectorError`].

pub mod cuda;
pub mod gpu;
pub mod locality;
pub mod storage;

use async_trait::async_trait;

use crate::cluster::NodeApi;
use crate::config::DaemonConfig;
use crate::error::DetectorError;
use crate::labels::DetectorResult;

pub use cuda::CudaVersionDetector;
pub use gpu::NvidiaGpuDetector;
pub use locality::LocalityDetector;
pub use storage::StorageNodeDetector;

/// Everything a detector may look at besides the local machine.
#[derive(Clone, Copy)]
pub struct DetectContext<'a> {
    /// Name of the node being labeled.
    pub node_name: &'a str,
    /// Read access to the cluster.
    pub api: &'a dyn NodeApi,
}

/// A unit of logic producing one label recommendation.
#[async_trait]
pub trait Detector: Send + Sync {
    /// The label key this detector manages.
    fn key(&self) -> &str;

    /// Inspect the node and recommend a value for [`Detector::key`].
    async fn detect(&self, ctx: &DetectContext<'_>) -> Result<DetectorResult, DetectorError>;
}

/// The detectors the daemon runs, in evaluation order.
pub fn default_detectors(config: &DaemonConfig) -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(CudaVersionDetector::new(config.cuda_version_file.clone())),
        Box::new(NvidiaGpuDetector::default()),
        Box::new(LocalityDetector::default()),
        Box::new(StorageNodeDetector::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::keys;

    #[test]
    fn test_default_detectors_order_and_keys() {
        let detectors = default_detectors(&DaemonConfig::default());
        let keys: Vec<&str> = detectors.iter().map(|d| d.key()).collect();
        assert_eq!(
            keys,
            vec![
                keys::NVIDIA_CUDA,
                keys::NVIDIA_GPU,
                keys::LOCALITY_TYPE,
                keys::STORAGE_NODE
            ]
        );
    }
}
