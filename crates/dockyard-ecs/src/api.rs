//! The ECS call surface used by the backend

use async_trait::async_trait;
use aws_sdk_ecs::types::{Cluster, ContainerInstance, Failure, Service};
use dockyard_core::BackendResult;

/// An identifier the backend could not describe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeFailure {
    pub arn: String,
    /// ECS failure reason, e.g. `MISSING`
    pub reason: String,
}

impl From<&Failure> for DescribeFailure {
    fn from(failure: &Failure) -> Self {
        Self {
            arn: failure.arn().unwrap_or_default().to_string(),
            reason: failure.reason().unwrap_or_default().to_string(),
        }
    }
}

/// Result of one batch describe call
#[derive(Debug, Clone)]
pub struct Described<T> {
    pub found: Vec<T>,
    pub failures: Vec<DescribeFailure>,
}

impl<T> Default for Described<T> {
    fn default() -> Self {
        Self {
            found: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Native ECS list/describe calls.
///
/// `list_*` methods return the complete identifier set (all pages).
/// `describe_*` methods take at most one API batch of identifiers; batching
/// is the caller's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EcsApi: Send + Sync {
    async fn list_cluster_arns(&self) -> BackendResult<Vec<String>>;

    async fn describe_clusters(&self, ids: &[String]) -> BackendResult<Described<Cluster>>;

    async fn list_container_instance_arns(&self, cluster: &str) -> BackendResult<Vec<String>>;

    async fn describe_container_instances(
        &self,
        cluster: &str,
        ids: &[String],
    ) -> BackendResult<Described<ContainerInstance>>;

    async fn list_service_arns(&self, cluster: &str) -> BackendResult<Vec<String>>;

    async fn describe_services(
        &self,
        cluster: &str,
        ids: &[String],
    ) -> BackendResult<Described<Service>>;
}
