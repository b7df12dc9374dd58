//! Cluster API access.
//!
//! The reconciliation core only needs three capabilities from the cluster,
//! captured by [`NodeApi`]. [`KubeNodeApi`] implements them with a shared
//! `kube::Client`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use serde_json::json;
use tracing::debug;

use crate::error::ClusterError;
use crate::labels::LabelSet;

/// A pod scheduled onto the local node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodRecord {
    pub name: String,
    pub namespace: Option<String>,
}

/// Cluster capabilities consumed by detectors and the applier.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Current labels of the named node.
    async fn read_node_labels(&self, name: &str) -> Result<LabelSet, ClusterError>;

    /// Merge-patch `metadata.labels` of the named node with `labels`.
    ///
    /// Keys not in `labels` are left untouched on the node.
    async fn patch_node_labels(&self, name: &str, labels: &LabelSet) -> Result<(), ClusterError>;

    /// Pods in any namespace scheduled onto `node_name` and matching `label_selector`.
    async fn list_pods_on_node(
        &self,
        node_name: &str,
        label_selector: &str,
    ) -> Result<Vec<PodRecord>, ClusterError>;
}

/// [`NodeApi`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeNodeApi {
    client: Client,
}

impl KubeNodeApi {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from local developer credentials (`~/.kube/config` or
    /// `KUBECONFIG`) when `use_kube_config` is set, otherwise from the
    /// in-cluster service account.
    pub async fn connect(use_kube_config: bool) -> Result<Self> {
        let config = if use_kube_config {
            debug!("Loading kube config...");
            Config::from_kubeconfig(&KubeConfigOptions::default())
                .await
                .context("Failed to load kube config")?
        } else {
            debug!("Loading in-cluster config...");
            Config::incluster().context("Failed to load in-cluster config")?
        };

        let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
        Ok(Self::new(client))
    }

    fn nodes(&self) -> Api<Node> {
        Api::all(self.client.clone())
    }
}

/// Body of a merge patch that sets exactly `labels` under `metadata.labels`.
pub fn label_patch(labels: &LabelSet) -> serde_json::Value {
    json!({
        "metadata": {
            "labels": labels
        }
    })
}

#[async_trait]
impl NodeApi for KubeNodeApi {
    async fn read_node_labels(&self, name: &str) -> Result<LabelSet, ClusterError> {
        let node = self.nodes().get(name).await?;
        Ok(node.metadata.labels.unwrap_or_default())
    }

    async fn patch_node_labels(&self, name: &str, labels: &LabelSet) -> Result<(), ClusterError> {
        let patch = label_patch(labels);
        self.nodes()
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }

    async fn list_pods_on_node(
        &self,
        node_name: &str,
        label_selector: &str,
    ) -> Result<Vec<PodRecord>, ClusterError> {
        let pods: Api<Pod> = Api::all(self.client.clone());
        let lp = ListParams::default()
            .fields(&format!("spec.nodeName={node_name}"))
            .labels(label_selector);

        let list = pods.list(&lp).await?;
        Ok(list
            .items
            .into_iter()
            .map(|pod| PodRecord {
                name: pod.metadata.name.unwrap_or_default(),
                namespace: pod.metadata.namespace,
            })
            .collect())
    }
}
