//! Per-cluster credential derivation

use dockyard_core::{BackendError, BackendResult, ClusterConnection};
use secrecy::SecretString;
use tracing::debug;

use crate::token::TokenSource;

/// Everything needed to open an authenticated connection to one API server
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// API server URL
    pub endpoint: String,
    pub token: SecretString,
    /// Certificate authority bundle as reported by the control plane
    /// (base64 of the PEM), in kubeconfig `certificate-authority-data` form
    pub ca_data: String,
}

/// Assemble a [`ConnectionConfig`] for `connection`.
///
/// A fresh token is generated on every call. A missing endpoint, missing CA
/// data or a token failure is an `AuthDerivation` error. The CA itself is
/// decoded and parsed when the client is built.
pub async fn derive_credentials(
    connection: &ClusterConnection,
    tokens: &dyn TokenSource,
) -> BackendResult<ConnectionConfig> {
    let cluster = connection.name.as_str();

    let endpoint = connection
        .endpoint
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| BackendError::auth(cluster, "cluster has no API server endpoint"))?;

    let ca_data = connection
        .certificate_authority
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| BackendError::auth(cluster, "cluster has no certificate authority data"))?;

    let token = tokens.token_for(cluster).await.map_err(|e| match e {
        BackendError::AuthDerivation { .. } => e,
        other => BackendError::auth(cluster, other.to_string()),
    })?;

    debug!(cluster = %cluster, endpoint = %endpoint, "Derived cluster credentials");
    Ok(ConnectionConfig {
        endpoint: endpoint.to_string(),
        token,
        ca_data: ca_data.trim().to_string(),
    })
}
