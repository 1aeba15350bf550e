//! Node (worker instance) models

use serde::{Deserialize, Serialize};

use super::{Cluster, Scheduler};

/// A worker/compute instance registered to a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable identifier within the cluster
    pub name: String,
    /// Resource ARN (empty for kube-style nodes)
    pub arn: String,
    /// Underlying compute instance id
    pub instance_id: String,
    pub scheduler: Scheduler,
    /// Backend-native status for ECS; a [`NodeReadiness`] value for EKS
    pub status: String,
    /// Owning cluster, fixed at normalization
    pub cluster: Cluster,
}

/// Readiness of a kube-style node, derived from its `Ready` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeReadiness {
    Ready,
    NotReady,
    Unknown,
}

impl NodeReadiness {
    /// Derive readiness from `(type, status)` condition pairs.
    ///
    /// `Ready=True` is ready, any other `Ready` value is not ready, and a
    /// missing `Ready` condition is unknown.
    pub fn from_conditions<'a>(conditions: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut readiness = NodeReadiness::Unknown;
        for (kind, status) in conditions {
            if kind == "Ready" {
                readiness = if status == "True" {
                    NodeReadiness::Ready
                } else {
                    NodeReadiness::NotReady
                };
            }
        }
        readiness
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeReadiness::Ready => "Ready",
            NodeReadiness::NotReady => "NotReady",
            NodeReadiness::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for NodeReadiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
