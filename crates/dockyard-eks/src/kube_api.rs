//! Kubernetes API server access for one cluster

use async_trait::async_trait;
use dockyard_core::{classify_fault, BackendError, BackendResult, Scheduler};
use k8s_openapi::api::core::v1::{Namespace, Node, Service};
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use serde_json::json;

use crate::credentials::ConnectionConfig;

/// Name of the single cluster, user and context in the in-memory kubeconfig
const CONTEXT: &str = "dockyard";

/// Read-only calls against one cluster's API server
#[async_trait]
pub trait KubeApi: Send + Sync {
    async fn list_nodes(&self) -> BackendResult<Vec<Node>>;

    /// Names of every namespace
    async fn list_namespaces(&self) -> BackendResult<Vec<String>>;

    async fn list_services(&self, namespace: &str) -> BackendResult<Vec<Service>>;
}

/// Opens a [`KubeApi`] from derived credentials
#[async_trait]
pub trait KubeConnector: Send + Sync {
    async fn connect(&self, config: ConnectionConfig) -> BackendResult<Box<dyn KubeApi>>;
}

/// [`KubeConnector`] that builds a `kube::Client` per connection
#[derive(Debug, Default, Clone, Copy)]
pub struct KubeClientConnector;

impl KubeClientConnector {
    /// Render `config` as a one-context kubeconfig and let kube resolve it.
    ///
    /// kube decodes and parses `certificate-authority-data` and validates the
    /// server URL; the bearer token is set on the resolved config so it never
    /// passes through the kubeconfig document.
    async fn client_config(config: ConnectionConfig) -> Result<Config, String> {
        let kubeconfig: Kubeconfig = serde_json::from_value(json!({
            "clusters": [{
                "name": CONTEXT,
                "cluster": {
                    "server": config.endpoint,
                    "certificate-authority-data": config.ca_data,
                },
            }],
            "users": [{ "name": CONTEXT, "user": {} }],
            "contexts": [{
                "name": CONTEXT,
                "context": { "cluster": CONTEXT, "user": CONTEXT },
            }],
            "current-context": CONTEXT,
        }))
        .map_err(|e| format!("invalid kubeconfig: {}", e))?;

        let mut kube_config =
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| e.to_string())?;
        kube_config.auth_info.token = Some(config.token);
        Ok(kube_config)
    }
}

#[async_trait]
impl KubeConnector for KubeClientConnector {
    async fn connect(&self, config: ConnectionConfig) -> BackendResult<Box<dyn KubeApi>> {
        let endpoint = config.endpoint.clone();
        let kube_config = Self::client_config(config)
            .await
            .map_err(|e| BackendError::auth(endpoint.as_str(), e))?;
        let client = Client::try_from(kube_config)
            .map_err(|e| BackendError::Internal(format!("kube client for {}: {}", endpoint, e)))?;
        Ok(Box::new(KubeClientApi { client }))
    }
}

/// [`KubeApi`] over a live `kube::Client`
struct KubeClientApi {
    client: Client,
}

/// API server rejections keep their status reason (`Forbidden`,
/// `NotFound`, ...) as the fault code
fn kube_fault(err: kube::Error) -> BackendError {
    match &err {
        kube::Error::Api(status) => {
            classify_fault(Scheduler::Eks, Some(status.reason.as_str()), err.to_string())
        }
        _ => classify_fault(Scheduler::Eks, None, err.to_string()),
    }
}

#[async_trait]
impl KubeApi for KubeClientApi {
    async fn list_nodes(&self) -> BackendResult<Vec<Node>> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes.list(&ListParams::default()).await.map_err(kube_fault)?;
        Ok(list.items)
    }

    async fn list_namespaces(&self) -> BackendResult<Vec<String>> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces
            .list(&ListParams::default())
            .await
            .map_err(kube_fault)?;
        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }

    async fn list_services(&self, namespace: &str) -> BackendResult<Vec<Service>> {
        let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let list = services
            .list(&ListParams::default())
            .await
            .map_err(kube_fault)?;
        Ok(list.items)
    }
}
