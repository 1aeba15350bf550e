//! Node handlers

use axum::extract::{Path, State};
use axum::Json;
use dockyard_core::{Aggregated, Node};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /v1/nodes
pub async fn list_nodes(State(state): State<AppState>) -> Result<Json<Aggregated<Node>>, ApiError> {
    Ok(Json(state.aggregator().await?.list_nodes().await?))
}

/// GET /v1/clusters/{scheduler}/{name}/nodes
pub async fn list_cluster_nodes(
    State(state): State<AppState>,
    Path((scheduler, name)): Path<(String, String)>,
) -> Result<Json<Aggregated<Node>>, ApiError> {
    let nodes = state
        .aggregator()
        .await?
        .list_nodes_in(&scheduler, &name)
        .await?;
    Ok(Json(nodes))
}
