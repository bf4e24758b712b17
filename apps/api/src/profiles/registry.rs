use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{ProfileChanges, ProfileRow, ProfileSummary};
use crate::profiles::prompts::PROFILE_TEXT_BASE;
use crate::store::Store;

#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub profile_name: String,
    pub profile_text_addon: String,
}

/// Partial update. Any base text sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub profile_name: Option<String>,
    pub profile_text_addon: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// All profiles ordered by id, without their base text.
pub async fn list_profiles(store: &dyn Store) -> Result<Vec<ProfileSummary>, AppError> {
    Ok(store.list_profiles().await?)
}

pub async fn create_profile(store: &dyn Store, profile: NewProfile) -> Result<ProfileRow, AppError> {
    let row = store
        .insert_profile(
            &profile.profile_name,
            PROFILE_TEXT_BASE,
            &profile.profile_text_addon,
        )
        .await?;

    info!("Created profile {} ({})", row.id, row.profile_name);
    Ok(row)
}

pub async fn update_profile(
    store: &dyn Store,
    id: i32,
    update: ProfileUpdate,
) -> Result<ProfileRow, AppError> {
    let not_found = || AppError::NotFound(format!("Profile with ID {id} not found"));

    // A missing profile is reported before an empty update.
    let Some(changes) = ProfileChanges::from_parts(update.profile_name, update.profile_text_addon)
    else {
        if !store.profile_exists(id).await? {
            return Err(not_found());
        }
        return Err(AppError::BadRequest(
            "No fields provided for update".to_string(),
        ));
    };

    let row = store
        .update_profile(id, &changes)
        .await?
        .ok_or_else(not_found)?;

    info!("Updated profile {id}");
    Ok(row)
}

pub async fn delete_profile(store: &dyn Store, id: i32) -> Result<DeleteConfirmation, AppError> {
    if !store.delete_profile(id).await? {
        return Err(AppError::NotFound(format!("Profile with ID {id} not found")));
    }

    info!("Deleted profile {id}");
    Ok(DeleteConfirmation {
        message: format!("Profile with ID {id} was successfully deleted"),
    })
}
