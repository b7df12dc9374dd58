//! In-memory [`NodeApi`] for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::cluster::{NodeApi, PodRecord};
use crate::error::ClusterError;
use crate::labels::LabelSet;

#[derive(Default)]
struct State {
    node_labels: LabelSet,
    pods: Vec<(String, String, PodRecord)>,
    patches: Vec<(String, LabelSet)>,
    fail_reads: bool,
    fail_lists: bool,
    fail_patches: u32,
}

/// Serves canned node labels and pods, records patches, and can be told to fail.
#[derive(Default)]
pub struct FakeNodeApi {
    state: Mutex<State>,
}

impl FakeNodeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_label(self, key: &str, value: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .node_labels
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_pod(self, node: &str, selector: &str, name: &str) -> Self {
        self.state.lock().unwrap().pods.push((
            node.to_string(),
            selector.to_string(),
            PodRecord {
                name: name.to_string(),
                namespace: Some("default".to_string()),
            },
        ));
        self
    }

    pub fn failing_reads(self) -> Self {
        self.state.lock().unwrap().fail_reads = true;
        self
    }

    pub fn failing_lists(self) -> Self {
        self.state.lock().unwrap().fail_lists = true;
        self
    }

    /// Reject the next `count` patch requests.
    pub fn fail_next_patches(&self, count: u32) {
        self.state.lock().unwrap().fail_patches = count;
    }

    pub fn patches(&self) -> Vec<(String, LabelSet)> {
        self.state.lock().unwrap().patches.clone()
    }

    pub fn node_labels(&self) -> LabelSet {
        self.state.lock().unwrap().node_labels.clone()
    }
}

#[async_trait]
impl NodeApi for FakeNodeApi {
    async fn read_node_labels(&self, _name: &str) -> Result<LabelSet, ClusterError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(ClusterError::Api {
                code: 403,
                message: "nodes is forbidden".to_string(),
            });
        }
        Ok(state.node_labels.clone())
    }

    async fn patch_node_labels(&self, name: &str, labels: &LabelSet) -> Result<(), ClusterError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_patches > 0 {
            state.fail_patches -= 1;
            return Err(ClusterError::Api {
                code: 422,
                message: "Node is invalid".to_string(),
            });
        }
        state.patches.push((name.to_string(), labels.clone()));
        for (key, value) in labels {
            state.node_labels.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn list_pods_on_node(
        &self,
        node_name: &str,
        label_selector: &str,
    ) -> Result<Vec<PodRecord>, ClusterError> {
        let state = self.state.lock().unwrap();
        if state.fail_lists {
            return Err(ClusterError::Api {
                code: 500,
                message: "etcdserver: request timed out".to_string(),
            });
        }
        Ok(state
            .pods
            .iter()
            .filter(|(node, selector, _)| node == node_name && selector == label_selector)
            .map(|(_, _, pod)| pod.clone())
            .collect())
    }
}
