//! Router tests for the dockyard API
//!
//! Drives the full axum router with `tower::ServiceExt::oneshot` over
//! in-memory backends, checking status codes and JSON bodies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dockyard_api::{create_router, AppState};
use dockyard_core::{
    classify_fault, Aggregated, AggregationWarning, BackendError, BackendProvider, BackendResult,
    Cluster, ClusterConnection, ClusterInventory, Node, Scheduler, SchedulerBackend, Service,
};
use dockyard_gateway::AggregatorConfig;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Mock Backends
// =============================================================================

/// In-memory backend with a fixed set of clusters
struct MockBackend {
    scheduler: Scheduler,
    clusters: Vec<Cluster>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockBackend {
    fn new(scheduler: Scheduler, names: &[&str]) -> Self {
        Self {
            scheduler,
            clusters: names
                .iter()
                .map(|name| Cluster {
                    name: name.to_string(),
                    arn: format!("arn:aws:{}:us-east-1:123456789012:cluster/{}", scheduler, name),
                    scheduler,
                    status: "ACTIVE".to_string(),
                })
                .collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn inventory(&self, clusters: Vec<Cluster>) -> ClusterInventory {
        let connections = clusters
            .iter()
            .filter(|c| c.scheduler == Scheduler::Eks)
            .map(|c| ClusterConnection {
                name: c.name.clone(),
                arn: c.arn.clone(),
                endpoint: Some(format!("https://{}.eks.example", c.name)),
                certificate_authority: None,
            })
            .collect();
        ClusterInventory::new(clusters, connections)
    }

    fn fault(&self) -> BackendError {
        classify_fault(self.scheduler, Some("ServerException"), "service unavailable")
    }
}

#[async_trait::async_trait]
impl SchedulerBackend for MockBackend {
    fn scheduler(&self) -> Scheduler {
        self.scheduler
    }

    async fn list_clusters(&self) -> BackendResult<ClusterInventory> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(self.fault());
        }
        Ok(self.inventory(self.clusters.clone()))
    }

    async fn describe_cluster(&self, name: &str) -> BackendResult<ClusterInventory> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(self.fault());
        }
        let found: Vec<_> = self.clusters.iter().filter(|c| c.name == name).cloned().collect();
        if found.is_empty() {
            return Err(BackendError::ResourceNotFound(format!("cluster {}", name)));
        }
        Ok(self.inventory(found))
    }

    async fn list_nodes(
        &self,
        cluster: &Cluster,
        connection: Option<&ClusterConnection>,
    ) -> BackendResult<Aggregated<Node>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.scheduler == Scheduler::Eks && connection.is_none() {
            return Err(BackendError::auth(cluster.name.as_str(), "no connection"));
        }
        Ok(Aggregated::complete(vec![Node {
            name: format!("{}-node", cluster.name),
            arn: String::new(),
            instance_id: "i-0abc123".to_string(),
            scheduler: self.scheduler,
            status: "Ready".to_string(),
            cluster: cluster.clone(),
        }]))
    }

    async fn list_services(
        &self,
        cluster: &Cluster,
        _connection: Option<&ClusterConnection>,
    ) -> BackendResult<Aggregated<Service>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut result = Aggregated::complete(vec![Service {
            name: "web".to_string(),
            arn: String::new(),
            status: "{}".to_string(),
            cluster: cluster.clone(),
            scheduler: self.scheduler,
            launch_type: "ec2".to_string(),
            namespace: "default".to_string(),
        }]);
        if self.scheduler == Scheduler::Eks {
            result.warn(
                AggregationWarning::partial(self.scheduler, "forbidden")
                    .with_cluster(cluster.name.as_str())
                    .with_namespace("locked"),
            );
        }
        Ok(result)
    }
}

struct MockProvider {
    backends: Vec<Arc<MockBackend>>,
}

#[async_trait::async_trait]
impl BackendProvider for MockProvider {
    async fn backends(&self) -> BackendResult<Vec<Arc<dyn SchedulerBackend>>> {
        Ok(self
            .backends
            .iter()
            .map(|b| b.clone() as Arc<dyn SchedulerBackend>)
            .collect())
    }
}

struct BrokenProvider;

#[async_trait::async_trait]
impl BackendProvider for BrokenProvider {
    async fn backends(&self) -> BackendResult<Vec<Arc<dyn SchedulerBackend>>> {
        Err(BackendError::Internal("no AWS session".to_string()))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app(backends: &[&Arc<MockBackend>]) -> axum::Router {
    let provider = MockProvider {
        backends: backends.iter().map(|b| Arc::clone(b)).collect(),
    };
    create_router(AppState::new(Arc::new(provider), AggregatorConfig::default()))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn names(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let response = app(&[])
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_clusters_merges_backends() {
    let ecs = Arc::new(MockBackend::new(Scheduler::Ecs, &["prod"]));
    let eks = Arc::new(MockBackend::new(Scheduler::Eks, &["blue"]));

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/clusters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "items": [
                {
                    "name": "prod",
                    "arn": "arn:aws:ecs:us-east-1:123456789012:cluster/prod",
                    "scheduler": "ecs",
                    "status": "ACTIVE"
                },
                {
                    "name": "blue",
                    "arn": "arn:aws:eks:us-east-1:123456789012:cluster/blue",
                    "scheduler": "eks",
                    "status": "ACTIVE"
                }
            ],
            "warnings": []
        })
    );
}

#[tokio::test]
async fn test_list_clusters_empty_is_empty_array() {
    let ecs = Arc::new(MockBackend::new(Scheduler::Ecs, &[]));
    let (status, body) = get(app(&[&ecs]), "/v1/clusters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_partial_failure_is_200_with_warning() {
    let ecs = Arc::new(MockBackend::new(Scheduler::Ecs, &["prod"]).failing());
    let eks = Arc::new(MockBackend::new(Scheduler::Eks, &["blue", "green"]));

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/clusters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["blue", "green"]);
    assert_eq!(body["warnings"][0]["kind"], "partial_aggregation");
    assert_eq!(body["warnings"][0]["scheduler"], "ecs");
}

#[tokio::test]
async fn test_all_failing_is_backend_fault() {
    let ecs = Arc::new(MockBackend::new(Scheduler::Ecs, &[]).failing());
    let eks = Arc::new(MockBackend::new(Scheduler::Eks, &[]).failing());

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/clusters").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "backend_fault");
    assert_eq!(body["fault"], "server_fault");
}

#[tokio::test]
async fn test_scheduler_filter() {
    let ecs = Arc::new(MockBackend::new(Scheduler::Ecs, &["prod"]));
    let eks = Arc::new(MockBackend::new(Scheduler::Eks, &["blue"]));

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/clusters?scheduler=eks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["blue"]);
    assert_eq!(ecs.calls.load(Ordering::SeqCst), 0);

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/clusters?scheduler=mesos").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_scheduler");
}

#[tokio::test]
async fn test_get_cluster() {
    let ecs = Arc::new(MockBackend::new(Scheduler::Ecs, &["prod"]));
    let eks = Arc::new(MockBackend::new(Scheduler::Eks, &["blue"]));

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/clusters/ecs/prod").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "prod");
    assert_eq!(body["scheduler"], "ecs");
    assert_eq!(eks.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_cluster_errors() {
    let ecs = Arc::new(MockBackend::new(Scheduler::Ecs, &["prod"]));
    let eks = Arc::new(MockBackend::new(Scheduler::Eks, &["blue"]));

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/clusters/kubernetes/prod").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_scheduler");
    assert_eq!(ecs.calls.load(Ordering::SeqCst), 0);
    assert_eq!(eks.calls.load(Ordering::SeqCst), 0);

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/clusters/eks/red").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "resource_not_found");
}

#[tokio::test]
async fn test_list_nodes_across_schedulers() {
    let ecs = Arc::new(MockBackend::new(Scheduler::Ecs, &["prod"]));
    let eks = Arc::new(MockBackend::new(Scheduler::Eks, &["blue"]));

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/nodes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["prod-node", "blue-node"]);
    assert_eq!(body["items"][1]["instanceId"], "i-0abc123");
    assert_eq!(body["items"][1]["cluster"]["name"], "blue");
    assert_eq!(body["warnings"], json!([]));
}

#[tokio::test]
async fn test_cluster_scoped_listings() {
    let eks = Arc::new(MockBackend::new(Scheduler::Eks, &["blue"]));

    let (status, body) = get(app(&[&eks]), "/v1/clusters/eks/blue/nodes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["blue-node"]);

    let (status, body) = get(app(&[&eks]), "/v1/clusters/eks/blue/services").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["launchType"], "ec2");
    assert_eq!(body["items"][0]["namespace"], "default");
    assert_eq!(body["warnings"][0]["namespace"], "locked");

    let (status, _) = get(app(&[&eks]), "/v1/clusters/ecs/blue/nodes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_services_carries_namespace_warnings() {
    let ecs = Arc::new(MockBackend::new(Scheduler::Ecs, &["prod"]));
    let eks = Arc::new(MockBackend::new(Scheduler::Eks, &["blue"]));

    let (status, body) = get(app(&[&ecs, &eks]), "/v1/services").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
    assert_eq!(body["warnings"][0]["cluster"], "blue");
}

#[tokio::test]
async fn test_provider_failure_is_internal_error() {
    let router = create_router(AppState::new(
        Arc::new(BrokenProvider),
        AggregatorConfig::default(),
    ));
    let (status, body) = get(router, "/v1/clusters").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert!(body.get("fault").is_none());
}
