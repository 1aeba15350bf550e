//! Cluster models

use serde::{Deserialize, Serialize};

use super::{AggregationWarning, Scheduler};

/// One logical orchestration cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Backend-native cluster name
    pub name: String,
    /// Globally unique resource identifier
    pub arn: String,
    /// Backend that owns this cluster
    pub scheduler: Scheduler,
    /// Backend-native lifecycle status (ACTIVE, CREATING, FAILED, ...)
    pub status: String,
}

impl Cluster {
    /// The stable external lookup key for this cluster
    pub fn lookup_key(&self) -> (Scheduler, &str) {
        (self.scheduler, &self.name)
    }
}

/// Raw connection metadata for a kube-style cluster.
///
/// Needed to derive credentials for node and service queries; it cannot be
/// reconstructed from a normalized [`Cluster`] alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConnection {
    pub name: String,
    pub arn: String,
    /// API server endpoint URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Base64-encoded certificate authority bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<String>,
}

/// Clusters from one or more backends, plus the connection metadata that
/// kube-style clusters need for follow-up queries
#[derive(Debug, Clone, Default)]
pub struct ClusterInventory {
    pub clusters: Vec<Cluster>,
    pub connections: Vec<ClusterConnection>,
    /// Clusters that were enumerated but could not be described
    pub warnings: Vec<AggregationWarning>,
}

impl ClusterInventory {
    pub fn new(clusters: Vec<Cluster>, connections: Vec<ClusterConnection>) -> Self {
        Self {
            clusters,
            connections,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<AggregationWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Append another inventory, keeping registration order
    pub fn extend(&mut self, other: ClusterInventory) {
        self.clusters.extend(other.clusters);
        self.connections.extend(other.connections);
        self.warnings.extend(other.warnings);
    }

    /// Locate the raw connection metadata for a kube-style cluster by ARN
    pub fn connection_for(&self, cluster: &Cluster) -> Option<&ClusterConnection> {
        if cluster.scheduler != Scheduler::Eks {
            return None;
        }
        self.connections.iter().find(|c| c.arn == cluster.arn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cluster(scheduler: Scheduler, name: &str) -> Cluster {
        Cluster {
            name: name.to_string(),
            arn: format!("arn:aws:{}:us-east-1:123456789012:cluster/{}", scheduler, name),
            scheduler,
            status: "ACTIVE".to_string(),
        }
    }

    #[test]
    fn test_serializes_as_plain_record() {
        let c = Cluster {
            name: "prod".to_string(),
            arn: "arn:aws:ecs:us-east-1:123456789012:cluster/prod".to_string(),
            scheduler: Scheduler::Ecs,
            status: "ACTIVE".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            serde_json::json!({
                "name": "prod",
                "arn": "arn:aws:ecs:us-east-1:123456789012:cluster/prod",
                "scheduler": "ecs",
                "status": "ACTIVE",
            })
        );
        assert_eq!(c.lookup_key(), (Scheduler::Ecs, "prod"));
    }

    #[test]
    fn test_connection_for_matches_eks_arn_only() {
        let eks = cluster(Scheduler::Eks, "blue");
        let ecs = cluster(Scheduler::Ecs, "blue");
        let inventory = ClusterInventory::new(
            vec![ecs.clone(), eks.clone()],
            vec![ClusterConnection {
                name: "blue".to_string(),
                arn: eks.arn.clone(),
                endpoint: Some("https://blue.example".to_string()),
                certificate_authority: None,
            }],
        );

        let found = inventory.connection_for(&eks).unwrap();
        assert_eq!(found.endpoint.as_deref(), Some("https://blue.example"));
        assert!(inventory.connection_for(&ecs).is_none());
        assert!(inventory
            .connection_for(&cluster(Scheduler::Eks, "green"))
            .is_none());
    }
}
