pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::profiles::handlers as profiles;
use crate::replies::handlers as replies;
use crate::reviews::handlers as reviews;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Reply generation
        .route("/message/get_response", post(replies::handle_get_response))
        // Reviews
        .route("/reviews/fetch", post(reviews::handle_fetch_reviews))
        .route("/reviews/:review_id", get(reviews::handle_get_review))
        // Profiles
        .route(
            "/profiles/fetch_profiles",
            get(profiles::handle_fetch_profiles),
        )
        .route("/profiles/add_profiles", post(profiles::handle_add_profile))
        .route(
            "/profiles/update_profile/:id",
            put(profiles::handle_update_profile),
        )
        .route(
            "/profiles/delete_profile/:id",
            delete(profiles::handle_delete_profile),
        )
        .with_state(state)
}
