use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::review::{ReviewRow, ReviewStats};
use crate::store::Store;

/// API view of a review. A missing body is reported as an empty string.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewView {
    pub id: i64,
    pub review_id: String,
    pub business_key: String,
    pub author_name: String,
    pub rating: f64,
    pub timestamp: Option<DateTime<Utc>>,
    pub review_text: String,
    pub author_reviews_count: i32,
    pub replies: Option<String>,
    pub review_timestamp: Option<i64>,
    pub author_link: Option<String>,
    pub relative_date: Option<String>,
}

impl From<ReviewRow> for ReviewView {
    fn from(row: ReviewRow) -> Self {
        ReviewView {
            id: row.id,
            review_id: row.review_id,
            business_key: row.business_key,
            author_name: row.author_name,
            rating: row.rating,
            timestamp: row.reviewed_at,
            review_text: row.review_text.unwrap_or_default(),
            author_reviews_count: row.author_reviews_count,
            replies: row.replies,
            review_timestamp: row.review_timestamp,
            author_link: row.author_link,
            relative_date: row.relative_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BusinessReviews {
    pub business_key: String,
    pub reviews: Vec<ReviewView>,
    pub total_reviews: i64,
    /// Mean rating rounded to 2 decimals; 0.0 when there are no reviews.
    pub average_rating: f64,
}

/// Lists the reviews of one business, most recent first, with count and average rating.
pub async fn list_reviews(store: &dyn Store, business_key: &str) -> Result<BusinessReviews, AppError> {
    info!("Fetching reviews for business {business_key}");

    let (rows, stats) = store.reviews_for_business(business_key).await?;

    info!("Found {} reviews for business {business_key}", rows.len());

    if rows.is_empty() {
        return Ok(BusinessReviews {
            business_key: business_key.to_string(),
            reviews: Vec::new(),
            total_reviews: 0,
            average_rating: 0.0,
        });
    }

    Ok(BusinessReviews {
        business_key: business_key.to_string(),
        reviews: rows.into_iter().map(ReviewView::from).collect(),
        total_reviews: stats.total_reviews,
        average_rating: rounded_average(&stats),
    })
}

/// Fetches a single review, e.g. to check whether a generated reply was stored.
pub async fn get_review(store: &dyn Store, review_id: &str) -> Result<ReviewView, AppError> {
    store
        .find_review(review_id)
        .await?
        .map(ReviewView::from)
        .ok_or_else(|| AppError::NotFound(format!("Review with ID {review_id} not found")))
}

fn rounded_average(stats: &ReviewStats) -> f64 {
    stats
        .average_rating
        .map(|avg| (avg * 100.0).round() / 100.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{review, MemoryStore};
    use chrono::TimeZone;

    fn dated(review_id: &str, business_key: &str, rating: f64, day: u32) -> ReviewRow {
        let mut r = review(review_id, business_key, "Sam Smith", rating);
        r.reviewed_at = Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap());
        r
    }

    #[tokio::test]
    async fn test_unknown_business_returns_empty_listing() {
        let store = MemoryStore::new().with_review(dated("a", "other", 4.0, 1));

        let result = list_reviews(&store, "nobody").await.unwrap();

        assert!(result.reviews.is_empty());
        assert_eq!(result.total_reviews, 0);
        assert_eq!(result.average_rating, 0.0);
        assert_eq!(result.business_key, "nobody");
    }

    #[tokio::test]
    async fn test_reviews_are_newest_first_with_rounded_average() {
        let store = MemoryStore::new()
            .with_review(dated("old", "biz", 5.0, 1))
            .with_review(dated("new", "biz", 4.0, 20))
            .with_review(dated("mid", "biz", 4.0, 10))
            .with_review(dated("elsewhere", "other", 1.0, 15));

        let result = list_reviews(&store, "biz").await.unwrap();

        let ids: Vec<&str> = result.reviews.iter().map(|r| r.review_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(result.total_reviews, 3);
        assert_eq!(result.average_rating, 4.33);
    }

    #[tokio::test]
    async fn test_undated_reviews_sort_last() {
        let store = MemoryStore::new()
            .with_review(review("undated", "biz", "Kim", 3.0))
            .with_review(dated("dated", "biz", 5.0, 5));

        let result = list_reviews(&store, "biz").await.unwrap();

        assert_eq!(result.reviews[0].review_id, "dated");
        assert_eq!(result.reviews[1].review_id, "undated");
    }

    #[tokio::test]
    async fn test_missing_review_text_becomes_empty_string() {
        let mut r = dated("a", "biz", 2.0, 3);
        r.review_text = None;
        let store = MemoryStore::new().with_review(r);

        let result = list_reviews(&store, "biz").await.unwrap();

        assert_eq!(result.reviews[0].review_text, "");
    }

    #[tokio::test]
    async fn test_get_review_not_found() {
        let store = MemoryStore::new();
        let err = get_review(&store, "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_rounding_policy() {
        let stats = ReviewStats {
            total_reviews: 3,
            average_rating: Some(3.666_666),
        };
        assert_eq!(rounded_average(&stats), 3.67);

        let empty = ReviewStats {
            total_reviews: 0,
            average_rating: None,
        };
        assert_eq!(rounded_average(&empty), 0.0);
    }
}
