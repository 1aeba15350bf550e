//! dockyard-core - Core traits and types for the dockyard cluster inventory
//!
//! This crate provides the backend-agnostic entity model (clusters, nodes,
//! services) and the [`SchedulerBackend`] abstraction that lets different
//! orchestration backends (ECS, EKS) feed the same aggregated view.

pub mod backend;
pub mod error;
pub mod ident;
pub mod models;

pub use backend::{BackendProvider, SchedulerBackend};
pub use error::{classify_fault, BackendError, BackendResult, FaultKind};
pub use models::*;
