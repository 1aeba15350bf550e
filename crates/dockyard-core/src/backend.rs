//! SchedulerBackend trait - the core abstraction for orchestration backends

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BackendResult;
use crate::models::{
    Aggregated, Cluster, ClusterConnection, ClusterInventory, Node, Scheduler, Service,
};

/// The capability interface that every orchestration backend implements.
///
/// Two implementations exist:
/// - `EcsBackend` - the managed task scheduler
/// - `EksBackend` - the managed Kubernetes control plane
///
/// The aggregator selects an implementation by [`Scheduler`] discriminator;
/// nothing downstream inspects the concrete type.
#[async_trait]
pub trait SchedulerBackend: Send + Sync {
    /// Which scheduler this backend serves
    fn scheduler(&self) -> Scheduler;

    /// List every cluster this backend can see.
    ///
    /// An empty enumeration is a valid result, not an error. Kube-style
    /// backends also return the raw connection metadata of each cluster.
    async fn list_clusters(&self) -> BackendResult<ClusterInventory>;

    /// Describe one cluster by name.
    ///
    /// Returns `ResourceNotFound` when no cluster of that name exists.
    async fn describe_cluster(&self, name: &str) -> BackendResult<ClusterInventory>;

    /// List the nodes registered to `cluster`.
    ///
    /// `connection` is the cluster's raw metadata; backends that need
    /// per-cluster credentials fail with `AuthDerivation` when it is absent.
    /// Nodes that were enumerated but could not be described are reported as
    /// warnings.
    async fn list_nodes(
        &self,
        cluster: &Cluster,
        connection: Option<&ClusterConnection>,
    ) -> BackendResult<Aggregated<Node>>;

    /// List the services deployed in `cluster`.
    ///
    /// Sub-query failures that do not invalidate the whole listing (for
    /// example a single unreadable namespace) are reported as warnings.
    async fn list_services(
        &self,
        cluster: &Cluster,
        connection: Option<&ClusterConnection>,
    ) -> BackendResult<Aggregated<Service>>;
}

/// Supplies freshly authenticated backends for a single request.
///
/// Implementations build new client handles on every call; nothing returned
/// here may be cached across requests. The returned order is the list-all
/// registration order.
#[async_trait]
pub trait BackendProvider: Send + Sync {
    async fn backends(&self) -> BackendResult<Vec<Arc<dyn SchedulerBackend>>>;
}
