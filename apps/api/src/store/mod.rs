//! Data store gateway: the one seam between request handling and PostgreSQL.
//!
//! Handlers and services only see `Arc<dyn Store>`. `PgStore` is the production
//! backend; `MemoryStore` backs the unit tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::profile::{ProfileChanges, ProfileRow, ProfileSummary};
use crate::models::review::{ReviewRow, ReviewStats};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The pool is closed or no connection could be acquired.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// A bound statement failed. Zero rows is never reported here.
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Outcome of looking up the two rows a reply is generated from.
/// The review is only looked up once the profile is known to exist.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplySources {
    MissingProfile,
    MissingReview,
    Found {
        profile: ProfileRow,
        review: ReviewRow,
    },
}

#[async_trait]
pub trait Store: Send + Sync {
    /// `false` once the underlying pool has been shut down.
    fn is_available(&self) -> bool;

    async fn load_reply_sources(
        &self,
        profile_id: i32,
        review_id: &str,
    ) -> Result<ReplySources, StoreError>;

    /// Overwrites the stored reply. Returns whether a row was updated.
    async fn save_reply(&self, review_id: &str, reply: &str) -> Result<bool, StoreError>;

    async fn find_review(&self, review_id: &str) -> Result<Option<ReviewRow>, StoreError>;

    /// Reviews for one business, most recent first, with aggregate statistics.
    async fn reviews_for_business(
        &self,
        business_key: &str,
    ) -> Result<(Vec<ReviewRow>, ReviewStats), StoreError>;

    async fn list_profiles(&self) -> Result<Vec<ProfileSummary>, StoreError>;

    async fn insert_profile(
        &self,
        profile_name: &str,
        profile_text_base: &str,
        profile_text_addon: &str,
    ) -> Result<ProfileRow, StoreError>;

    /// Returns `None` when no profile has this id.
    async fn update_profile(
        &self,
        id: i32,
        changes: &ProfileChanges,
    ) -> Result<Option<ProfileRow>, StoreError>;

    async fn profile_exists(&self, id: i32) -> Result<bool, StoreError>;

    /// Returns whether a row was removed.
    async fn delete_profile(&self, id: i32) -> Result<bool, StoreError>;
}
