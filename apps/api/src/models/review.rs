use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ReviewRow {
    pub id: i64,
    pub review_id: String,
    pub business_key: String,
    pub author_name: String,
    pub rating: f64,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_text: Option<String>,
    pub author_reviews_count: i32,
    /// Last generated reply. Overwritten on every successful generation.
    pub replies: Option<String>,
    pub review_timestamp: Option<i64>,
    pub author_link: Option<String>,
    pub relative_date: Option<String>,
}

/// Aggregate statistics for one business, as computed by the store.
#[derive(Debug, Clone, Copy, FromRow, PartialEq)]
pub struct ReviewStats {
    pub total_reviews: i64,
    /// `None` when the business has no reviews.
    pub average_rating: Option<f64>,
}
