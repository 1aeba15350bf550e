//! dockyard-gateway - Aggregation across scheduler backends
//!
//! The [`Aggregator`] answers every inventory query. It fans a request out
//! to the registered backends, merges what succeeds and reports what fails.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Aggregator                        │
//! │  - merges clusters in registration order                 │
//! │  - routes (scheduler, name) lookups to one backend       │
//! │  - re-locates connection metadata for kube-style nodes   │
//! │  - turns per-cluster failures into warnings              │
//! └─────────────────────────────┬────────────────────────────┘
//!                               │
//!               ┌───────────────┴───────────────┐
//!               ▼                               ▼
//!       ┌───────────────┐               ┌───────────────┐
//!       │  EcsBackend   │               │  EksBackend   │
//!       └───────────────┘               └───────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use dockyard_gateway::{Aggregator, AggregatorConfig};
//!
//! let backends = provider.backends().await?;
//! let aggregator = Aggregator::new(backends, AggregatorConfig::default());
//!
//! let clusters = aggregator.list_clusters().await?;
//! let prod = aggregator.describe_cluster("ecs", "prod").await?;
//! ```

mod aggregator;

pub use aggregator::{Aggregator, AggregatorConfig};

// Re-export core types for convenience
pub use dockyard_core::{Aggregated, BackendError, BackendResult, SchedulerBackend};
