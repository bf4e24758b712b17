//! Axum route handlers for the Profiles API.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, ProfileSummary};
use crate::profiles::registry::{
    create_profile, delete_profile, list_profiles, update_profile, DeleteConfirmation,
    NewProfile, ProfileUpdate,
};
use crate::state::AppState;

/// GET /profiles/fetch_profiles
pub async fn handle_fetch_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileSummary>>, AppError> {
    Ok(Json(list_profiles(state.store.as_ref()).await?))
}

/// POST /profiles/add_profiles
pub async fn handle_add_profile(
    State(state): State<AppState>,
    Json(request): Json<NewProfile>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(create_profile(state.store.as_ref(), request).await?))
}

/// PUT /profiles/update_profile/:id
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ProfileUpdate>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(update_profile(state.store.as_ref(), id, request).await?))
}

/// DELETE /profiles/delete_profile/:id
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteConfirmation>, AppError> {
    Ok(Json(delete_profile(state.store.as_ref(), id).await?))
}
