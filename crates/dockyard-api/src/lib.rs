//! dockyard-api - REST API layer for the cluster inventory
//!
//! Serves the aggregated cluster, node and service views as JSON. The
//! crate is backend-agnostic: it only sees a
//! [`BackendProvider`](dockyard_core::BackendProvider).
//!
//! # Usage
//!
//! ```ignore
//! use dockyard_api::{create_router, AppState};
//! use dockyard_gateway::AggregatorConfig;
//!
//! let state = AppState::new(Arc::new(provider), AggregatorConfig::default());
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the dockyard REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Cluster routes
        .route("/v1/clusters", get(handlers::clusters::list_clusters))
        .route(
            "/v1/clusters/{scheduler}/{name}",
            get(handlers::clusters::get_cluster),
        )
        .route(
            "/v1/clusters/{scheduler}/{name}/nodes",
            get(handlers::nodes::list_cluster_nodes),
        )
        .route(
            "/v1/clusters/{scheduler}/{name}/services",
            get(handlers::services::list_cluster_services),
        )
        // Cross-cluster routes
        .route("/v1/nodes", get(handlers::nodes::list_nodes))
        .route("/v1/services", get(handlers::services::list_services))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
