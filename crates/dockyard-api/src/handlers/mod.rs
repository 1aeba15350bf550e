//! HTTP request handlers for the dockyard API
//!
//! Handlers only extract path/query parameters and serialize results; all
//! routing between backends happens in the aggregator.

pub mod clusters;
pub mod nodes;
pub mod services;
