//! Daemon configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::detectors::cuda::DEFAULT_VERSION_FILE;

/// Environment variable holding the node name when `--node` is not given.
pub const NODE_NAME_ENV: &str = "NODE_NAME";

/// Time between two reconciliation cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3600);

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

/// Runtime settings of the daemon, as resolved from CLI flags and environment.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Use local kube config instead of in-cluster credentials.
    pub use_kube_config: bool,
    /// Explicit node name; falls back to [`DaemonConfig::node_name_env`] when unset.
    pub node_name: Option<String>,
    /// Environment variable consulted for the node name.
    pub node_name_env: String,
    pub debug: bool,
    pub log_format: LogFormat,
    pub interval: Duration,
    pub cuda_version_file: PathBuf,
    /// Run one cycle and exit.
    pub once: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            use_kube_config: false,
            node_name: None,
            node_name_env: NODE_NAME_ENV.to_string(),
            debug: false,
            log_format: LogFormat::default(),
            interval: DEFAULT_INTERVAL,
            cuda_version_file: PathBuf::from(DEFAULT_VERSION_FILE),
            once: false,
        }
    }
}

impl DaemonConfig {
    /// Base log directive for the configured verbosity.
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
