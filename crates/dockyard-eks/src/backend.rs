//! EksBackend - SchedulerBackend for the managed Kubernetes control plane

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_eks::types;
use dockyard_core::ident::trailing_segment;
use dockyard_core::{
    Aggregated, AggregationWarning, BackendError, BackendResult, Cluster, ClusterConnection,
    ClusterInventory, Node, NodeReadiness, Scheduler, SchedulerBackend, Service,
};
use k8s_openapi::api::core::v1;
use tracing::{debug, warn};

use crate::api::EksApi;
use crate::credentials::derive_credentials;
use crate::kube_api::{KubeApi, KubeClientConnector, KubeConnector};
use crate::sdk::SdkEksApi;
use crate::token::{StsTokenSource, TokenSource};

/// Kube-style services always run on EC2 worker nodes
const EKS_LAUNCH_TYPE: &str = "ec2";

pub fn normalize_cluster(raw: &types::Cluster) -> Cluster {
    Cluster {
        name: raw.name().unwrap_or_default().to_string(),
        arn: raw.arn().unwrap_or_default().to_string(),
        scheduler: Scheduler::Eks,
        status: raw.status().map(|s| s.as_str()).unwrap_or_default().to_string(),
    }
}

/// Extract the raw connection metadata needed for credential derivation
pub fn connection_from(raw: &types::Cluster) -> ClusterConnection {
    ClusterConnection {
        name: raw.name().unwrap_or_default().to_string(),
        arn: raw.arn().unwrap_or_default().to_string(),
        endpoint: raw.endpoint().map(str::to_string),
        certificate_authority: raw
            .certificate_authority()
            .and_then(|ca| ca.data())
            .map(str::to_string),
    }
}

/// Map a kube node into the common model.
///
/// The node name is its UID; the instance id is the last segment of
/// `spec.providerID`.
pub fn normalize_node(raw: &v1::Node, cluster: &Cluster) -> Node {
    let provider_id = raw
        .spec
        .as_ref()
        .and_then(|spec| spec.provider_id.as_deref())
        .unwrap_or_default();

    let conditions = raw
        .status
        .as_ref()
        .and_then(|status| status.conditions.as_ref())
        .map(|c| c.as_slice())
        .unwrap_or_default();
    let readiness = NodeReadiness::from_conditions(
        conditions
            .iter()
            .map(|c| (c.type_.as_str(), c.status.as_str())),
    );

    Node {
        name: raw.metadata.uid.clone().unwrap_or_default(),
        arn: String::new(),
        instance_id: trailing_segment(provider_id).to_string(),
        scheduler: Scheduler::Eks,
        status: readiness.to_string(),
        cluster: cluster.clone(),
    }
}

/// Map a kube service into the common model; `status` is the service
/// status object as compact JSON
pub fn normalize_service(raw: &v1::Service, namespace: &str, cluster: &Cluster) -> Service {
    let status = raw.status.clone().unwrap_or_default();
    Service {
        name: raw.metadata.name.clone().unwrap_or_default(),
        arn: String::new(),
        status: serde_json::to_string(&status).unwrap_or_default(),
        cluster: cluster.clone(),
        scheduler: Scheduler::Eks,
        launch_type: EKS_LAUNCH_TYPE.to_string(),
        namespace: namespace.to_string(),
    }
}

/// Managed Kubernetes backend
pub struct EksBackend {
    api: Arc<dyn EksApi>,
    tokens: Arc<dyn TokenSource>,
    connector: Arc<dyn KubeConnector>,
}

impl EksBackend {
    pub fn new(
        api: Arc<dyn EksApi>,
        tokens: Arc<dyn TokenSource>,
        connector: Arc<dyn KubeConnector>,
    ) -> Self {
        Self {
            api,
            tokens,
            connector,
        }
    }

    /// Create a backend with fresh SDK and kube clients for the given session
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(
            Arc::new(SdkEksApi::new(config)),
            Arc::new(StsTokenSource::from_sdk_config(config)),
            Arc::new(KubeClientConnector),
        )
    }

    /// Derive credentials for `cluster` and open its API server
    async fn connect(
        &self,
        cluster: &Cluster,
        connection: Option<&ClusterConnection>,
    ) -> BackendResult<Box<dyn KubeApi>> {
        let connection = connection.ok_or_else(|| {
            BackendError::auth(cluster.name.as_str(), "no connection metadata for cluster")
        })?;
        let config = derive_credentials(connection, self.tokens.as_ref()).await?;
        self.connector.connect(config).await.map_err(|e| match e {
            BackendError::AuthDerivation { message, .. } => {
                BackendError::auth(cluster.name.as_str(), message)
            }
            other => other,
        })
    }
}

#[async_trait]
impl SchedulerBackend for EksBackend {
    fn scheduler(&self) -> Scheduler {
        Scheduler::Eks
    }

    async fn list_clusters(&self) -> BackendResult<ClusterInventory> {
        let names = self.api.list_cluster_names().await?;

        let mut inventory = ClusterInventory::default();
        for name in &names {
            match self.api.describe_cluster(name).await {
                Ok(raw) => {
                    inventory.clusters.push(normalize_cluster(&raw));
                    inventory.connections.push(connection_from(&raw));
                }
                Err(e) => {
                    warn!(cluster = %name, error = %e, "Skipping undescribable EKS cluster");
                    inventory.warnings.push(
                        AggregationWarning::partial(Scheduler::Eks, e.to_string())
                            .with_cluster(name.as_str()),
                    );
                }
            }
        }

        debug!(count = inventory.clusters.len(), "Listed EKS clusters");
        Ok(inventory)
    }

    async fn describe_cluster(&self, name: &str) -> BackendResult<ClusterInventory> {
        let raw = self.api.describe_cluster(name).await?;
        Ok(ClusterInventory::new(
            vec![normalize_cluster(&raw)],
            vec![connection_from(&raw)],
        ))
    }

    async fn list_nodes(
        &self,
        cluster: &Cluster,
        connection: Option<&ClusterConnection>,
    ) -> BackendResult<Aggregated<Node>> {
        let kube = self.connect(cluster, connection).await?;
        let nodes = kube.list_nodes().await?;
        debug!(cluster = %cluster.name, count = nodes.len(), "Listed EKS nodes");
        Ok(Aggregated::complete(
            nodes.iter().map(|n| normalize_node(n, cluster)).collect(),
        ))
    }

    async fn list_services(
        &self,
        cluster: &Cluster,
        connection: Option<&ClusterConnection>,
    ) -> BackendResult<Aggregated<Service>> {
        let kube = self.connect(cluster, connection).await?;
        let namespaces = kube.list_namespaces().await?;

        let mut result = Aggregated::default();
        for namespace in &namespaces {
            match kube.list_services(namespace).await {
                Ok(services) => result.items.extend(
                    services
                        .iter()
                        .map(|s| normalize_service(s, namespace, cluster)),
                ),
                Err(e) => {
                    warn!(
                        cluster = %cluster.name,
                        namespace = %namespace,
                        error = %e,
                        "Skipping namespace"
                    );
                    result.warn(
                        AggregationWarning::partial(Scheduler::Eks, e.to_string())
                            .with_cluster(cluster.name.as_str())
                            .with_namespace(namespace.as_str()),
                    );
                }
            }
        }
        Ok(result)
    }
}
