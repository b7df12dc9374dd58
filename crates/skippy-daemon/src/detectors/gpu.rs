//! NVIDIA GPU detection via the presence of `nvidia-smi`.

use std::ffi::OsString;

use async_trait::async_trait;
use tracing::debug;

use super::{DetectContext, Detector};
use crate::error::DetectorError;
use crate::labels::{keys, DetectorResult};

/// Tool shipped with the NVIDIA driver.
pub const NVIDIA_SMI: &str = "nvidia-smi";

/// Marks the node as having an NVIDIA GPU when a named executable is on the search path.
pub struct NvidiaGpuDetector {
    executable: String,
    /// Overrides `PATH` when set.
    search_path: Option<OsString>,
}

impl NvidiaGpuDetector {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            search_path: None,
        }
    }

    #[must_use]
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    fn is_resolvable(&self) -> bool {
        match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_default();
                which::which_in(&self.executable, Some(paths), cwd).is_ok()
            }
            None => which::which(&self.executable).is_ok(),
        }
    }
}

impl Default for NvidiaGpuDetector {
    fn default() -> Self {
        Self::new(NVIDIA_SMI)
    }
}

#[async_trait]
impl Detector for NvidiaGpuDetector {
    fn key(&self) -> &str {
        keys::NVIDIA_GPU
    }

    async fn detect(&self, _ctx: &DetectContext<'_>) -> Result<DetectorResult, DetectorError> {
        if self.is_resolvable() {
            debug!(label = keys::NVIDIA_GPU, executable = %self.executable, "Found executable");
            Ok(DetectorResult::present(self.key(), keys::PRESENT))
        } else {
            debug!(
                label = keys::NVIDIA_GPU,
                executable = %self.executable,
                "Executable not available, assuming no NVIDIA GPU"
            );
            Ok(DetectorResult::absent(self.key()))
        }
    }
}
