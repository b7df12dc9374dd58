//! CUDA driver version detection.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::{DetectContext, Detector};
use crate::error::DetectorError;
use crate::labels::{keys, DetectorResult};

/// Default location of the CUDA toolkit version file.
pub const DEFAULT_VERSION_FILE: &str = "/usr/local/cuda/version.txt";

/// Matches `CUDA Version <major>.<minor>.<patch>` at the start of the file.
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\ACUDA Version ([0-9]+)\.[0-9]+\.[0-9]+").expect("valid CUDA version regex")
});

/// Labels the node with the major CUDA version read from the toolkit's version file.
pub struct CudaVersionDetector {
    version_file: PathBuf,
}

impl CudaVersionDetector {
    pub fn new(version_file: impl Into<PathBuf>) -> Self {
        Self {
            version_file: version_file.into(),
        }
    }
}

impl Default for CudaVersionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_FILE)
    }
}

/// Extract the major version from the contents of a CUDA version file.
pub fn parse_major_version(contents: &str) -> Option<&str> {
    VERSION_PATTERN
        .captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|major| major.as_str())
}

#[async_trait]
impl Detector for CudaVersionDetector {
    fn key(&self) -> &str {
        keys::NVIDIA_CUDA
    }

    async fn detect(&self, _ctx: &DetectContext<'_>) -> Result<DetectorResult, DetectorError> {
        let bytes = match tokio::fs::read(&self.version_file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    label = keys::NVIDIA_CUDA,
                    path = %self.version_file.display(),
                    "No CUDA version file found, assuming no CUDA installed"
                );
                return Ok(DetectorResult::absent(self.key()));
            }
            Err(source) => {
                return Err(DetectorError::Io {
                    path: self.version_file.clone(),
                    source,
                });
            }
        };

        let contents = String::from_utf8_lossy(&bytes);
        if let Some(major) = parse_major_version(&contents) {
            debug!(label = keys::NVIDIA_CUDA, version = major, "Found NVIDIA CUDA version");
            Ok(DetectorResult::present(self.key(), major))
        } else {
            debug!(
                label = keys::NVIDIA_CUDA,
                path = %self.version_file.display(),
                "CUDA version file has no valid version, assuming no CUDA installed"
            );
            Ok(DetectorResult::absent(self.key()))
        }
    }
}
