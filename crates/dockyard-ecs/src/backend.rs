//! EcsBackend - SchedulerBackend for the managed task scheduler

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ecs::types;
use dockyard_core::ident::{batches, trailing_segment};
use dockyard_core::{
    Aggregated, AggregationWarning, BackendError, BackendResult, Cluster, ClusterConnection, ClusterInventory, Node,
    Scheduler, SchedulerBackend, Service,
};
use tracing::{debug, warn};

use crate::api::{Described, EcsApi};
use crate::sdk::SdkEcsApi;

/// DescribeClusters accepts at most 100 identifiers per call
const CLUSTER_BATCH: usize = 100;
/// DescribeContainerInstances accepts at most 100 identifiers per call
const CONTAINER_INSTANCE_BATCH: usize = 100;
/// DescribeServices accepts at most 10 identifiers per call
const SERVICE_BATCH: usize = 10;

/// Map a described ECS cluster into the common model
pub fn normalize_cluster(raw: &types::Cluster) -> Cluster {
    Cluster {
        name: raw.cluster_name().unwrap_or_default().to_string(),
        arn: raw.cluster_arn().unwrap_or_default().to_string(),
        scheduler: Scheduler::Ecs,
        status: raw.status().unwrap_or_default().to_string(),
    }
}

/// Map a described container instance into the common model.
///
/// The node name is the trailing segment of the container instance ARN.
pub fn normalize_node(raw: &types::ContainerInstance, cluster: &Cluster) -> Node {
    let arn = raw.container_instance_arn().unwrap_or_default();
    Node {
        name: trailing_segment(arn).to_string(),
        arn: arn.to_string(),
        instance_id: raw.ec2_instance_id().unwrap_or_default().to_string(),
        scheduler: Scheduler::Ecs,
        status: raw.status().unwrap_or_default().to_string(),
        cluster: cluster.clone(),
    }
}

/// Map a described ECS service into the common model
pub fn normalize_service(raw: &types::Service, cluster: &Cluster) -> Service {
    Service {
        name: raw.service_name().unwrap_or_default().to_string(),
        arn: raw.service_arn().unwrap_or_default().to_string(),
        status: raw.status().unwrap_or_default().to_string(),
        cluster: cluster.clone(),
        scheduler: Scheduler::Ecs,
        launch_type: raw
            .launch_type()
            .map(|t| t.as_str().to_lowercase())
            .unwrap_or_default(),
        namespace: String::new(),
    }
}

/// Task-scheduler backend
pub struct EcsBackend {
    api: Arc<dyn EcsApi>,
}

impl EcsBackend {
    /// Create a backend over any [`EcsApi`] implementation
    pub fn new(api: Arc<dyn EcsApi>) -> Self {
        Self { api }
    }

    /// Create a backend with a fresh SDK client for the given session
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(Arc::new(SdkEcsApi::new(config)))
    }

    /// Describe `ids` in API-sized batches and concatenate the results.
    ///
    /// Identifiers the API reports as failures (e.g. `MISSING`) are skipped
    /// and come back as warnings, scoped to `cluster` when one is given.
    async fn describe_all<T, F, Fut>(
        &self,
        ids: &[String],
        batch: usize,
        cluster: Option<&str>,
        describe: F,
    ) -> BackendResult<Aggregated<T>>
    where
        F: Fn(Vec<String>) -> Fut,
        Fut: std::future::Future<Output = BackendResult<Described<T>>>,
    {
        let mut result = Aggregated {
            items: Vec::with_capacity(ids.len()),
            warnings: Vec::new(),
        };
        for chunk in batches(ids, batch) {
            let described = describe(chunk.to_vec()).await?;
            for failure in &described.failures {
                warn!(
                    cluster = ?cluster,
                    arn = %failure.arn,
                    reason = %failure.reason,
                    "ECS describe skipped resource"
                );
                let warning = AggregationWarning::partial(
                    Scheduler::Ecs,
                    format!("{} could not be described: {}", failure.arn, failure.reason),
                );
                result.warn(match cluster {
                    Some(name) => warning.with_cluster(name),
                    None => warning,
                });
            }
            result.items.extend(described.found);
        }
        Ok(result)
    }
}

#[async_trait]
impl SchedulerBackend for EcsBackend {
    fn scheduler(&self) -> Scheduler {
        Scheduler::Ecs
    }

    async fn list_clusters(&self) -> BackendResult<ClusterInventory> {
        let arns = self.api.list_cluster_arns().await?;
        if arns.is_empty() {
            debug!("No ECS clusters");
            return Ok(ClusterInventory::default());
        }

        let api = &self.api;
        let raw = self
            .describe_all(&arns, CLUSTER_BATCH, None, |chunk| async move {
                api.describe_clusters(&chunk).await
            })
            .await?;

        let clusters = raw.items.iter().map(normalize_cluster).collect::<Vec<_>>();
        debug!(count = clusters.len(), "Listed ECS clusters");
        Ok(ClusterInventory::new(clusters, Vec::new()).with_warnings(raw.warnings))
    }

    async fn describe_cluster(&self, name: &str) -> BackendResult<ClusterInventory> {
        let described = self.api.describe_clusters(&[name.to_string()]).await?;
        let raw = described.found.first().ok_or_else(|| {
            BackendError::ResourceNotFound(format!("ecs cluster '{}'", name))
        })?;
        Ok(ClusterInventory::new(vec![normalize_cluster(raw)], Vec::new()))
    }

    async fn list_nodes(
        &self,
        cluster: &Cluster,
        _connection: Option<&ClusterConnection>,
    ) -> BackendResult<Aggregated<Node>> {
        let arns = self.api.list_container_instance_arns(&cluster.arn).await?;
        if arns.is_empty() {
            return Ok(Aggregated::default());
        }

        let api = &self.api;
        let cluster_arn = cluster.arn.as_str();
        let raw = self
            .describe_all(
                &arns,
                CONTAINER_INSTANCE_BATCH,
                Some(&cluster.name),
                |chunk| async move { api.describe_container_instances(cluster_arn, &chunk).await },
            )
            .await?;

        Ok(Aggregated {
            items: raw.items.iter().map(|n| normalize_node(n, cluster)).collect(),
            warnings: raw.warnings,
        })
    }

    async fn list_services(
        &self,
        cluster: &Cluster,
        _connection: Option<&ClusterConnection>,
    ) -> BackendResult<Aggregated<Service>> {
        let arns = self.api.list_service_arns(&cluster.arn).await?;
        if arns.is_empty() {
            return Ok(Aggregated::default());
        }

        let api = &self.api;
        let cluster_arn = cluster.arn.as_str();
        let raw = self
            .describe_all(&arns, SERVICE_BATCH, Some(&cluster.name), |chunk| async move {
                api.describe_services(cluster_arn, &chunk).await
            })
            .await?;

        Ok(Aggregated {
            items: raw.items.iter().map(|s| normalize_service(s, cluster)).collect(),
            warnings: raw.warnings,
        })
    }
}
