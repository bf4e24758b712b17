//! Reply generation — orchestrates one reply for one review.
//!
//! Flow: availability check → load profile + review → build prompt →
//!       completion call → best-effort persist → return text.
//!
//! The persist step is the only one whose failure is swallowed. When it fails
//! the caller still gets the text and `persisted` is false; stored state and
//! the returned reply may then diverge until the next successful generation.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::errors::{AppError, Dependency};
use crate::llm_client::CompletionClient;
use crate::replies::prompts::{build_system_instruction, build_user_content};
use crate::store::{ReplySources, Store};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeneratedReply {
    pub response: String,
    /// Whether the reply was written to the review row.
    pub persisted: bool,
}

/// Generates a reply for `review_id` in the voice of profile `profile_id`.
///
/// No external call is made unless both rows exist.
pub async fn generate_reply(
    store: &dyn Store,
    llm: &dyn CompletionClient,
    profile_id: i32,
    review_id: &str,
) -> Result<GeneratedReply, AppError> {
    if !llm.is_configured() {
        return Err(AppError::ServiceUnavailable(Dependency::Completion));
    }
    if !store.is_available() {
        error!("Database connection pool not available");
        return Err(AppError::ServiceUnavailable(Dependency::Store));
    }

    info!("Generating reply for review {review_id} with profile {profile_id}");

    let (profile, review) = match store.load_reply_sources(profile_id, review_id).await? {
        ReplySources::Found { profile, review } => (profile, review),
        ReplySources::MissingProfile => {
            return Err(AppError::NotFound(format!(
                "Profile with ID {profile_id} not found"
            )))
        }
        ReplySources::MissingReview => {
            return Err(AppError::NotFound(format!(
                "Review with ID {review_id} not found"
            )))
        }
    };

    let system_instruction = build_system_instruction(&profile);
    let user_content = build_user_content(&review);

    let response = llm.complete(&system_instruction, &user_content).await?;

    let persisted = match store.save_reply(review_id, &response).await {
        Ok(true) => {
            info!("Saved reply for review {review_id}");
            true
        }
        Ok(false) => {
            warn!("Review {review_id} disappeared before its reply could be saved");
            false
        }
        Err(e) => {
            error!("Database error while saving reply for review {review_id}: {e}");
            false
        }
    };

    Ok(GeneratedReply {
        response,
        persisted,
    })
}
