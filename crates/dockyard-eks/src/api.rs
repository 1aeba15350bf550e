//! The EKS control-plane call surface used by the backend

use async_trait::async_trait;
use aws_sdk_eks::types::Cluster;
use dockyard_core::BackendResult;

/// Native EKS calls
#[async_trait]
pub trait EksApi: Send + Sync {
    /// Every cluster name in the account and region (all pages)
    async fn list_cluster_names(&self) -> BackendResult<Vec<String>>;

    /// Full description of one cluster, including endpoint and CA data
    async fn describe_cluster(&self, name: &str) -> BackendResult<Cluster>;
}
