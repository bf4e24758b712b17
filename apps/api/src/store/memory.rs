//! In-memory `Store` used by unit tests. Supports failure injection.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::profile::{ProfileChanges, ProfileRow, ProfileSummary};
use crate::models::review::{ReviewRow, ReviewStats};
use crate::store::{ReplySources, Store, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<Vec<ProfileRow>>,
    reviews: Mutex<Vec<ReviewRow>>,
    next_profile_id: AtomicI32,
    closed: AtomicBool,
    fail_reply_writes: AtomicBool,
    fail_queries: AtomicBool,
    drop_review_before_write: AtomicBool,
    review_reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, base: &str, addon: &str) -> Self {
        let id = self.next_profile_id();
        self.profiles.lock().unwrap().push(ProfileRow {
            id,
            profile_name: format!("Profile {id}"),
            profile_text_base: base.to_string(),
            profile_text_addon: addon.to_string(),
        });
        self
    }

    pub fn with_review(self, review: ReviewRow) -> Self {
        self.reviews.lock().unwrap().push(review);
        self
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn fail_reply_writes(&self) {
        self.fail_reply_writes.store(true, Ordering::SeqCst);
    }

    /// Removes the target review just before a reply write, as a concurrent delete would.
    pub fn drop_review_before_write(&self) {
        self.drop_review_before_write.store(true, Ordering::SeqCst);
    }

    pub fn fail_queries(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }

    pub fn review_reads(&self) -> usize {
        self.review_reads.load(Ordering::SeqCst)
    }

    pub fn stored_reply(&self, review_id: &str) -> Option<String> {
        self.reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.review_id == review_id)
            .and_then(|r| r.replies.clone())
    }

    pub fn profile(&self, id: i32) -> Option<ProfileRow> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    // Ids are never reused, like a SERIAL column.
    fn next_profile_id(&self) -> i32 {
        self.next_profile_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "connection pool is closed".to_string(),
            ));
        }
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Query(sqlx::Error::Protocol(
                "injected query failure".to_string(),
            )));
        }
        Ok(())
    }

    fn review(&self, review_id: &str) -> Option<ReviewRow> {
        self.review_reads.fetch_add(1, Ordering::SeqCst);
        self.reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.review_id == review_id)
            .cloned()
    }
}

/// A review row with sensible defaults for tests.
pub fn review(review_id: &str, business_key: &str, author: &str, rating: f64) -> ReviewRow {
    ReviewRow {
        id: 0,
        review_id: review_id.to_string(),
        business_key: business_key.to_string(),
        author_name: author.to_string(),
        rating,
        reviewed_at: None,
        review_text: Some(String::new()),
        author_reviews_count: 1,
        replies: None,
        review_timestamp: None,
        author_link: None,
        relative_date: None,
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn is_available(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    async fn load_reply_sources(
        &self,
        profile_id: i32,
        review_id: &str,
    ) -> Result<ReplySources, StoreError> {
        self.check()?;
        let Some(profile) = self.profile(profile_id) else {
            return Ok(ReplySources::MissingProfile);
        };
        Ok(match self.review(review_id) {
            Some(review) => ReplySources::Found { profile, review },
            None => ReplySources::MissingReview,
        })
    }

    async fn save_reply(&self, review_id: &str, reply: &str) -> Result<bool, StoreError> {
        self.check()?;
        if self.fail_reply_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Query(sqlx::Error::Protocol(
                "injected write failure".to_string(),
            )));
        }
        let mut reviews = self.reviews.lock().unwrap();
        if self.drop_review_before_write.load(Ordering::SeqCst) {
            reviews.retain(|r| r.review_id != review_id);
        }
        match reviews.iter_mut().find(|r| r.review_id == review_id) {
            Some(row) => {
                row.replies = Some(reply.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_review(&self, review_id: &str) -> Result<Option<ReviewRow>, StoreError> {
        self.check()?;
        Ok(self.review(review_id))
    }

    async fn reviews_for_business(
        &self,
        business_key: &str,
    ) -> Result<(Vec<ReviewRow>, ReviewStats), StoreError> {
        self.check()?;
        let mut rows: Vec<ReviewRow> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.business_key == business_key)
            .cloned()
            .collect();
        // Same order as the SQL: newest first, undated last, then id descending.
        rows.sort_by(|a, b| match (a.reviewed_at, b.reviewed_at) {
            (Some(x), Some(y)) => y.cmp(&x).then(b.id.cmp(&a.id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.id.cmp(&a.id),
        });

        let total_reviews = rows.len() as i64;
        let average_rating = if rows.is_empty() {
            None
        } else {
            Some(rows.iter().map(|r| r.rating).sum::<f64>() / rows.len() as f64)
        };

        Ok((
            rows,
            ReviewStats {
                total_reviews,
                average_rating,
            },
        ))
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileSummary>, StoreError> {
        self.check()?;
        let mut profiles: Vec<ProfileSummary> = self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .map(ProfileSummary::from)
            .collect();
        profiles.sort_by_key(|p| p.id);
        Ok(profiles)
    }

    async fn insert_profile(
        &self,
        profile_name: &str,
        profile_text_base: &str,
        profile_text_addon: &str,
    ) -> Result<ProfileRow, StoreError> {
        self.check()?;
        let id = self.next_profile_id();
        let row = ProfileRow {
            id,
            profile_name: profile_name.to_string(),
            profile_text_base: profile_text_base.to_string(),
            profile_text_addon: profile_text_addon.to_string(),
        };
        self.profiles.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_profile(
        &self,
        id: i32,
        changes: &ProfileChanges,
    ) -> Result<Option<ProfileRow>, StoreError> {
        self.check()?;
        let mut profiles = self.profiles.lock().unwrap();
        Ok(profiles.iter_mut().find(|p| p.id == id).map(|row| {
            match changes {
                ProfileChanges::Name(name) => row.profile_name = name.clone(),
                ProfileChanges::Addon(addon) => row.profile_text_addon = addon.clone(),
                ProfileChanges::Both { name, addon } => {
                    row.profile_name = name.clone();
                    row.profile_text_addon = addon.clone();
                }
            }
            row.clone()
        }))
    }

    async fn profile_exists(&self, id: i32) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.profile(id).is_some())
    }

    async fn delete_profile(&self, id: i32) -> Result<bool, StoreError> {
        self.check()?;
        let mut profiles = self.profiles.lock().unwrap();
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        Ok(profiles.len() < before)
    }
}
