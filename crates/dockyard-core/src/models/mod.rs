//! Normalized entity models shared by every backend

mod cluster;
mod listing;
mod node;
mod scheduler;
mod service;

pub use cluster::*;
pub use listing::*;
pub use node::*;
pub use scheduler::*;
pub use service::*;
