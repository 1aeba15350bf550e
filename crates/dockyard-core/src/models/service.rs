//! Service (workload) models

use serde::{Deserialize, Serialize};

use super::{Cluster, Scheduler};

/// A deployed workload within a cluster (and namespace, for kube-style)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    /// Resource ARN (empty for kube-style services)
    pub arn: String,
    pub status: String,
    pub cluster: Cluster,
    pub scheduler: Scheduler,
    /// Lower-cased deployment mode
    pub launch_type: String,
    /// Namespace (empty for ECS, which has none)
    pub namespace: String,
}
