use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{CustomerProfileUpdate, MechanicProfileUpdate};
use crate::services::profiles;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: Value,
}

// GET /mechanic-profile/:mechanic_id
pub async fn get_mechanic_profile(
    State(state): State<Arc<AppState>>,
    Path(mechanic_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = profiles::get_mechanic_profile(state.store.as_ref(), &mechanic_id).await?;
    Ok(Json(ProfileResponse { profile }))
}

// PUT /mechanic-profile
pub async fn update_mechanic_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<MechanicProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = profiles::update_mechanic_profile(state.store.as_ref(), &update).await?;
    Ok(Json(ProfileResponse { profile }))
}

// GET /customer-profile/:user_id
pub async fn get_customer_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = profiles::get_customer_profile(state.store.as_ref(), &user_id).await?;
    Ok(Json(ProfileResponse { profile }))
}

// PUT /customer-profile
pub async fn update_customer_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<CustomerProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = profiles::update_customer_profile(state.store.as_ref(), &update).await?;
    Ok(Json(ProfileResponse { profile }))
}
