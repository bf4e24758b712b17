//! Axum route handlers for the Reviews API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::reviews::service::{get_review, list_reviews, BusinessReviews, ReviewView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FetchReviewsRequest {
    pub business_key: String,
}

/// POST /reviews/fetch
pub async fn handle_fetch_reviews(
    State(state): State<AppState>,
    Json(request): Json<FetchReviewsRequest>,
) -> Result<Json<BusinessReviews>, AppError> {
    if request.business_key.trim().is_empty() {
        return Err(AppError::BadRequest(
            "business_key cannot be empty".to_string(),
        ));
    }

    let reviews = list_reviews(state.store.as_ref(), &request.business_key).await?;
    Ok(Json(reviews))
}

/// GET /reviews/:review_id
pub async fn handle_get_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Json<ReviewView>, AppError> {
    Ok(Json(get_review(state.store.as_ref(), &review_id).await?))
}
