//! Error types for the node labeling daemon.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the cluster API.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The API server rejected the request with a status payload.
    #[error("API error: {code} - {message}")]
    Api { code: u16, message: String },

    /// Transport, auth or decoding failure below the API layer.
    #[error("Kubernetes client error: {0}")]
    Kube(#[source] kube::Error),
}

impl ClusterError {
    /// The `message` field of the remote status payload, if the server sent one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl From<kube::Error> for ClusterError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) => Self::Api {
                code: response.code,
                message: response.message,
            },
            other => Self::Kube(other),
        }
    }
}

/// Errors a detector can fail with. "Capability not present" is never one of these.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Reading a local file failed for a reason other than it not existing.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A read-only cluster query failed.
    #[error("Cluster query failed: {0}")]
    Cluster(#[from] ClusterError),
}

/// The node name could not be determined.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Node name not set: expose spec.nodeName as env var {var} or pass --node")]
    Missing { var: String },
}

/// The label patch was not applied.
#[derive(Debug, Error)]
#[error("Failed to update labels of node {node}: {source}")]
pub struct ApplyError {
    pub node: String,
    #[source]
    pub source: ClusterError,
}

/// Errors that abandon a reconciliation cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Detection and apply were skipped because the node name is unknown.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Apply(#[from] ApplyError),
}
