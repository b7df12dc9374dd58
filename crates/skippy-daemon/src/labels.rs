//! Label data model.
//!
//! A [`LabelSet`] is rebuilt from scratch on every cycle. Only labels with a
//! present value end up in it; "absent" and "abstain" recommendations never
//! turn into delete markers.

use std::collections::BTreeMap;
use std::fmt;

/// Mapping from label key to label value, as patched onto the node.
pub type LabelSet = BTreeMap<String, String>;

/// Well-known label keys and related constants.
pub mod keys {
    /// Major CUDA version installed on the node.
    pub const NVIDIA_CUDA: &str = "capability.skippy.io/nvidia-cuda";

    /// Presence marker for an NVIDIA GPU (`nvidia-smi` is on the search path).
    pub const NVIDIA_GPU: &str = "capability.skippy.io/nvidia-gpu";

    /// Network locality of the node (`edge`, `cloud`, ...).
    pub const LOCALITY_TYPE: &str = "locality.skippy.io/type";

    /// Presence marker for nodes hosting a storage pod.
    pub const STORAGE_NODE: &str = "data.skippy.io/storage-node";

    /// Locality proposed when an operator has not set one.
    pub const DEFAULT_LOCALITY: &str = "edge";

    /// Selector matching the storage pods.
    pub const STORAGE_POD_SELECTOR: &str = "app=minio";

    /// Value used by boolean presence labels.
    pub const PRESENT: &str = "";
}

/// What a detector recommends for its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// The label should be set to this value (an empty string is a valid value).
    Present(String),
    /// The label should not exist.
    Absent,
    /// No opinion: leave whatever is on the node alone.
    Abstain,
}

/// Outcome of one detector invocation. Always carries exactly one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorResult {
    pub key: String,
    pub detection: Detection,
}

impl DetectorResult {
    pub fn present(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            detection: Detection::Present(value.into()),
        }
    }

    pub fn absent(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            detection: Detection::Absent,
        }
    }

    pub fn abstain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            detection: Detection::Abstain,
        }
    }
}

impl fmt::Display for DetectorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detection {
            Detection::Present(value) => write!(f, "{}={value:?}", self.key),
            Detection::Absent => write!(f, "{} (absent)", self.key),
            Detection::Abstain => write!(f, "{} (abstain)", self.key),
        }
    }
}
