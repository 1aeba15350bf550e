//! Service handlers

use axum::extract::{Path, State};
use axum::Json;
use dockyard_core::{Aggregated, Service};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /v1/services
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Aggregated<Service>>, ApiError> {
    Ok(Json(state.aggregator().await?.list_services().await?))
}

/// GET /v1/clusters/{scheduler}/{name}/services
pub async fn list_cluster_services(
    State(state): State<AppState>,
    Path((scheduler, name)): Path<(String, String)>,
) -> Result<Json<Aggregated<Service>>, ApiError> {
    let services = state
        .aggregator()
        .await?
        .list_services_in(&scheduler, &name)
        .await?;
    Ok(Json(services))
}
