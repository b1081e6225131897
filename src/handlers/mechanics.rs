use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{MechanicSearch, NearbySearch};
use crate::services::geo::NearbyMechanic;
use crate::services::mechanics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SearchResponse<T> {
    pub data: Vec<T>,
}

// GET /search-mechanics
pub async fn search_mechanics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MechanicSearch>,
) -> Result<Json<SearchResponse<Value>>, AppError> {
    let data = mechanics::search(state.store.as_ref(), &params).await?;
    Ok(Json(SearchResponse { data }))
}

// GET /nearby-mechanics
pub async fn nearby_mechanics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbySearch>,
) -> Result<Json<SearchResponse<NearbyMechanic>>, AppError> {
    let data = mechanics::nearby(state.store.as_ref(), &params).await?;
    tracing::debug!(lat = params.lat, lng = params.lng, hits = data.len(), "nearby search");
    Ok(Json(SearchResponse { data }))
}
