//! Aggregator - best-effort merge across scheduler backends
//!
//! Backends are queried in registration order and their results are
//! concatenated in that order. A failing backend or cluster only costs its
//! own contribution: the failure is recorded as a `partial_aggregation`
//! warning and everything else is still returned.
//!
//! The request deadline is shared by every sub-query of a merged listing.
//! A sub-query still running when it passes is dropped and reported like
//! any other failure, so finished results survive a hung backend.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dockyard_core::{
    Aggregated, AggregationWarning, BackendError, BackendResult, Cluster, ClusterConnection,
    ClusterInventory, Node, Scheduler, SchedulerBackend, Service,
};
use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Aggregator tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Per-cluster queries allowed in flight at once (1 = sequential)
    pub max_concurrency: usize,
    /// Deadline for one aggregator operation
    pub request_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Per-request view over an ordered set of backends
pub struct Aggregator {
    backends: Vec<Arc<dyn SchedulerBackend>>,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(backends: Vec<Arc<dyn SchedulerBackend>>, config: AggregatorConfig) -> Self {
        Self { backends, config }
    }

    fn backend_for(&self, scheduler: Scheduler) -> Option<&Arc<dyn SchedulerBackend>> {
        self.backends.iter().find(|b| b.scheduler() == scheduler)
    }

    /// Parse a caller-supplied scheduler and find its backend.
    ///
    /// Unknown and unregistered schedulers are both `InvalidScheduler`.
    fn resolve(&self, scheduler: &str) -> BackendResult<&Arc<dyn SchedulerBackend>> {
        let parsed: Scheduler = scheduler.parse()?;
        self.backend_for(parsed).ok_or_else(|| {
            BackendError::InvalidScheduler(format!("{} backend is not enabled", parsed))
        })
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.config.request_timeout
    }

    /// Run a single-backend operation under the request deadline. Expiry is
    /// fatal.
    async fn with_deadline<T>(
        &self,
        op: &str,
        fut: impl Future<Output = BackendResult<T>>,
    ) -> BackendResult<T> {
        match tokio::time::timeout(self.config.request_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation = %op,
                    timeout_ms = self.config.request_timeout.as_millis() as u64,
                    "Aggregator deadline expired"
                );
                Err(BackendError::Timeout)
            }
        }
    }

    /// Every cluster of every backend.
    ///
    /// Fails only when all registered backends fail; the first failure is
    /// returned then. No backends is an empty success.
    pub async fn list_clusters(&self) -> BackendResult<Aggregated<Cluster>> {
        let inventory = self.merged_inventory(self.deadline()).await?;
        Ok(Aggregated {
            items: inventory.clusters,
            warnings: inventory.warnings,
        })
    }

    /// Every cluster of one backend. Failure is fatal.
    pub async fn list_clusters_for(&self, scheduler: &str) -> BackendResult<Aggregated<Cluster>> {
        let backend = self.resolve(scheduler)?;
        self.with_deadline("list_clusters_for", async {
            let inventory = backend.list_clusters().await?;
            Ok(Aggregated {
                items: inventory.clusters,
                warnings: inventory.warnings,
            })
        })
        .await
    }

    /// One cluster by its lookup key. Only the owning backend is called.
    pub async fn describe_cluster(&self, scheduler: &str, name: &str) -> BackendResult<Cluster> {
        let backend = self.resolve(scheduler)?;
        self.with_deadline("describe_cluster", async {
            let inventory = Self::describe_in(backend, name).await?;
            inventory
                .clusters
                .into_iter()
                .next()
                .ok_or_else(|| not_found(backend.scheduler(), name))
        })
        .await
    }

    /// Nodes of every cluster of every backend
    pub async fn list_nodes(&self) -> BackendResult<Aggregated<Node>> {
        let deadline = self.deadline();
        let mut inventory = self.merged_inventory(deadline).await?;
        let warnings = std::mem::take(&mut inventory.warnings);
        let outcomes = self
            .per_cluster(&inventory, deadline, |backend, cluster, connection| async move {
                backend.list_nodes(cluster, connection).await
            })
            .await;
        Ok(collect_outcomes(warnings, outcomes))
    }

    /// Services of every cluster of every backend
    pub async fn list_services(&self) -> BackendResult<Aggregated<Service>> {
        let deadline = self.deadline();
        let mut inventory = self.merged_inventory(deadline).await?;
        let warnings = std::mem::take(&mut inventory.warnings);
        let outcomes = self
            .per_cluster(&inventory, deadline, |backend, cluster, connection| async move {
                backend.list_services(cluster, connection).await
            })
            .await;
        Ok(collect_outcomes(warnings, outcomes))
    }

    /// Nodes of one named cluster. Every failure is fatal.
    pub async fn list_nodes_in(&self, scheduler: &str, name: &str) -> BackendResult<Aggregated<Node>> {
        let backend = self.resolve(scheduler)?;
        self.with_deadline("list_nodes_in", async {
            let inventory = Self::describe_in(backend, name).await?;
            let cluster = inventory
                .clusters
                .first()
                .ok_or_else(|| not_found(backend.scheduler(), name))?;
            backend
                .list_nodes(cluster, inventory.connection_for(cluster))
                .await
        })
        .await
    }

    /// Services of one named cluster. Namespace skips still surface as
    /// warnings; any other failure is fatal.
    pub async fn list_services_in(
        &self,
        scheduler: &str,
        name: &str,
    ) -> BackendResult<Aggregated<Service>> {
        let backend = self.resolve(scheduler)?;
        self.with_deadline("list_services_in", async {
            let inventory = Self::describe_in(backend, name).await?;
            let cluster = inventory
                .clusters
                .first()
                .ok_or_else(|| not_found(backend.scheduler(), name))?;
            backend
                .list_services(cluster, inventory.connection_for(cluster))
                .await
        })
        .await
    }

    async fn describe_in(
        backend: &Arc<dyn SchedulerBackend>,
        name: &str,
    ) -> BackendResult<ClusterInventory> {
        debug!(scheduler = %backend.scheduler(), cluster = %name, "Describing cluster");
        backend.describe_cluster(name).await
    }

    /// Query every backend's clusters concurrently and concatenate them in
    /// registration order. A backend still listing at `deadline` counts as
    /// failed with `Timeout`.
    async fn merged_inventory(&self, deadline: Instant) -> BackendResult<ClusterInventory> {
        let results = futures::future::join_all(
            self.backends
                .iter()
                .map(|b| within(deadline, b.list_clusters())),
        )
        .await;

        let mut merged = ClusterInventory::default();
        let mut first_error = None;
        let mut succeeded = 0usize;

        for (backend, result) in self.backends.iter().zip(results) {
            let scheduler = backend.scheduler();
            match result {
                Ok(inventory) => {
                    debug!(scheduler = %scheduler, count = inventory.clusters.len(), "Backend listed clusters");
                    succeeded += 1;
                    merged.extend(inventory);
                }
                Err(e) => {
                    warn!(scheduler = %scheduler, error = %e, "Backend failed to list clusters");
                    merged
                        .warnings
                        .push(AggregationWarning::partial(scheduler, e.to_string()));
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if succeeded == 0 => Err(e),
            _ => Ok(merged),
        }
    }

    /// Run `query` for every cluster of `inventory` through an ordered,
    /// bounded stream. Output order equals cluster order. Queries still
    /// running at `deadline` fail with `Timeout`.
    async fn per_cluster<'a, T, F, Fut>(
        &'a self,
        inventory: &'a ClusterInventory,
        deadline: Instant,
        query: F,
    ) -> Vec<(&'a Cluster, BackendResult<Aggregated<T>>)>
    where
        F: Fn(&'a Arc<dyn SchedulerBackend>, &'a Cluster, Option<&'a ClusterConnection>) -> Fut,
        Fut: Future<Output = BackendResult<Aggregated<T>>> + 'a,
    {
        let pending: Vec<_> = inventory
            .clusters
            .iter()
            .map(|cluster| {
                let started = self
                    .backend_for(cluster.scheduler)
                    .map(|backend| query(backend, cluster, inventory.connection_for(cluster)));
                async move {
                    let result = match started {
                        Some(fut) => within(deadline, fut).await,
                        None => Err(BackendError::InvalidScheduler(format!(
                            "{} backend is not enabled",
                            cluster.scheduler
                        ))),
                    };
                    (cluster, result)
                }
            })
            .collect();

        stream::iter(pending)
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await
    }
}

async fn within<T>(
    deadline: Instant,
    fut: impl Future<Output = BackendResult<T>>,
) -> BackendResult<T> {
    tokio::time::timeout_at(deadline, fut)
        .await
        .unwrap_or(Err(BackendError::Timeout))
}

fn not_found(scheduler: Scheduler, name: &str) -> BackendError {
    BackendError::ResourceNotFound(format!("{} cluster '{}'", scheduler, name))
}

/// Concatenate per-cluster results; failures become warnings
fn collect_outcomes<T>(
    warnings: Vec<AggregationWarning>,
    outcomes: Vec<(&Cluster, BackendResult<Aggregated<T>>)>,
) -> Aggregated<T> {
    let mut result = Aggregated {
        items: Vec::new(),
        warnings,
    };
    for (cluster, outcome) in outcomes {
        match outcome {
            Ok(part) => result.merge(part),
            Err(e) => {
                warn!(
                    scheduler = %cluster.scheduler,
                    cluster = %cluster.name,
                    error = %e,
                    "Cluster query failed"
                );
                result.warn(
                    AggregationWarning::partial(cluster.scheduler, e.to_string())
                        .with_cluster(cluster.name.as_str()),
                );
            }
        }
    }
    result
}
