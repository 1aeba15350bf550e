//! dockyard-ecs - Task-scheduler backend
//!
//! Implements [`SchedulerBackend`](dockyard_core::SchedulerBackend) for
//! Amazon ECS. Every listing is a two-phase call sequence: enumerate
//! identifiers, then batch-describe them.
//!
//! ```text
//! ListClusters ──► DescribeClusters (≤100 per call)
//! ListContainerInstances ──► DescribeContainerInstances (≤100 per call)
//! ListServices ──► DescribeServices (≤10 per call)
//! ```
//!
//! The SDK sits behind the [`EcsApi`] trait so the normalization logic can
//! be exercised without a live account.

pub mod api;
mod backend;
mod sdk;

pub use api::{DescribeFailure, Described, EcsApi};
pub use backend::{normalize_cluster, normalize_node, normalize_service, EcsBackend};
pub use sdk::SdkEcsApi;
