//! Cluster handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use dockyard_core::{Aggregated, Cluster};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClusterQuery {
    /// Restrict the listing to one scheduler
    pub scheduler: Option<String>,
}

/// GET /v1/clusters
pub async fn list_clusters(
    State(state): State<AppState>,
    Query(query): Query<ClusterQuery>,
) -> Result<Json<Aggregated<Cluster>>, ApiError> {
    let aggregator = state.aggregator().await?;
    let clusters = match query.scheduler.as_deref() {
        Some(scheduler) => aggregator.list_clusters_for(scheduler).await?,
        None => aggregator.list_clusters().await?,
    };
    Ok(Json(clusters))
}

/// GET /v1/clusters/{scheduler}/{name}
pub async fn get_cluster(
    State(state): State<AppState>,
    Path((scheduler, name)): Path<(String, String)>,
) -> Result<Json<Cluster>, ApiError> {
    let cluster = state
        .aggregator()
        .await?
        .describe_cluster(&scheduler, &name)
        .await?;
    Ok(Json(cluster))
}
