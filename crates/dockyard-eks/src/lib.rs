//! dockyard-eks - Managed Kubernetes backend
//!
//! Implements [`SchedulerBackend`](dockyard_core::SchedulerBackend) for
//! Amazon EKS. Cluster metadata comes from the EKS control-plane API; nodes
//! and services come from each cluster's own Kubernetes API server, reached
//! with credentials derived per cluster on every request.
//!
//! ```text
//! ┌──────────┐ ListClusters/DescribeCluster ┌─────────────┐
//! │ EksApi   │◄─────────────────────────────│             │
//! └──────────┘                              │             │
//! ┌──────────┐ presigned GetCallerIdentity  │ EksBackend  │
//! │ TokenSrc │◄─────────────────────────────│             │
//! └──────────┘                              │             │
//! ┌──────────┐ nodes / namespaces / services│             │
//! │ KubeApi  │◄─────────────────────────────│             │
//! └──────────┘                              └─────────────┘
//! ```
//!
//! Each collaborator sits behind a trait so the normalization and credential
//! logic can be exercised without a live cluster.

pub mod api;
mod backend;
pub mod credentials;
pub mod kube_api;
mod sdk;
pub mod token;

pub use api::EksApi;
pub use backend::{connection_from, normalize_cluster, normalize_node, normalize_service, EksBackend};
pub use credentials::{derive_credentials, ConnectionConfig};
pub use kube_api::{KubeApi, KubeClientConnector, KubeConnector};
pub use sdk::SdkEksApi;
pub use token::{StsTokenSource, TokenSource};
