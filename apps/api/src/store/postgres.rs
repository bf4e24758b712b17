use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};

use crate::models::profile::{ProfileChanges, ProfileRow, ProfileSummary};
use crate::models::review::{ReviewRow, ReviewStats};
use crate::store::{ReplySources, Store, StoreError};

const REVIEW_COLUMNS: &str = "id, review_id, business_key, author_name, rating, reviewed_at, \
    review_text, author_reviews_count, replies, review_timestamp, author_link, relative_date";

const UPDATE_PROFILE_NAME: &str = r#"
    UPDATE profiles SET profile_name = $1
    WHERE id = $2
    RETURNING id, profile_name, profile_text_base, profile_text_addon
"#;

const UPDATE_PROFILE_ADDON: &str = r#"
    UPDATE profiles SET profile_text_addon = $1
    WHERE id = $2
    RETURNING id, profile_name, profile_text_base, profile_text_addon
"#;

const UPDATE_PROFILE_BOTH: &str = r#"
    UPDATE profiles SET profile_name = $1, profile_text_addon = $2
    WHERE id = $3
    RETURNING id, profile_name, profile_text_base, profile_text_addon
"#;

/// PostgreSQL-backed store. Each operation holds one pooled connection for
/// its duration; the connection goes back to the pool when it is dropped.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        if self.pool.is_closed() {
            return Err(StoreError::Unavailable(
                "connection pool is closed".to_string(),
            ));
        }
        self.pool
            .acquire()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl Store for PgStore {
    fn is_available(&self) -> bool {
        !self.pool.is_closed()
    }

    async fn load_reply_sources(
        &self,
        profile_id: i32,
        review_id: &str,
    ) -> Result<ReplySources, StoreError> {
        let mut conn = self.acquire().await?;

        let profile = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, profile_name, profile_text_base, profile_text_addon FROM profiles WHERE id = $1",
        )
        .bind(profile_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(profile) = profile else {
            return Ok(ReplySources::MissingProfile);
        };

        let review = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE review_id = $1"
        ))
        .bind(review_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(match review {
            Some(review) => ReplySources::Found { profile, review },
            None => ReplySources::MissingReview,
        })
    }

    async fn save_reply(&self, review_id: &str, reply: &str) -> Result<bool, StoreError> {
        let mut conn = self.acquire().await?;

        let result = sqlx::query("UPDATE reviews SET replies = $1 WHERE review_id = $2")
            .bind(reply)
            .bind(review_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_review(&self, review_id: &str) -> Result<Option<ReviewRow>, StoreError> {
        let mut conn = self.acquire().await?;

        Ok(sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE review_id = $1"
        ))
        .bind(review_id)
        .fetch_optional(&mut *conn)
        .await?)
    }

    async fn reviews_for_business(
        &self,
        business_key: &str,
    ) -> Result<(Vec<ReviewRow>, ReviewStats), StoreError> {
        let mut conn = self.acquire().await?;

        let reviews = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE business_key = $1
            ORDER BY reviewed_at DESC NULLS LAST, id DESC
            "#
        ))
        .bind(business_key)
        .fetch_all(&mut *conn)
        .await?;

        let stats = sqlx::query_as::<_, ReviewStats>(
            r#"
            SELECT COUNT(*) AS total_reviews, AVG(rating) AS average_rating
            FROM reviews
            WHERE business_key = $1
            "#,
        )
        .bind(business_key)
        .fetch_one(&mut *conn)
        .await?;

        Ok((reviews, stats))
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileSummary>, StoreError> {
        let mut conn = self.acquire().await?;

        Ok(sqlx::query_as::<_, ProfileSummary>(
            "SELECT id, profile_name, profile_text_addon FROM profiles ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await?)
    }

    async fn insert_profile(
        &self,
        profile_name: &str,
        profile_text_base: &str,
        profile_text_addon: &str,
    ) -> Result<ProfileRow, StoreError> {
        let mut conn = self.acquire().await?;

        Ok(sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (profile_name, profile_text_base, profile_text_addon)
            VALUES ($1, $2, $3)
            RETURNING id, profile_name, profile_text_base, profile_text_addon
            "#,
        )
        .bind(profile_name)
        .bind(profile_text_base)
        .bind(profile_text_addon)
        .fetch_one(&mut *conn)
        .await?)
    }

    async fn update_profile(
        &self,
        id: i32,
        changes: &ProfileChanges,
    ) -> Result<Option<ProfileRow>, StoreError> {
        let mut conn = self.acquire().await?;

        let query = match changes {
            ProfileChanges::Name(name) => {
                sqlx::query_as::<_, ProfileRow>(UPDATE_PROFILE_NAME).bind(name)
            }
            ProfileChanges::Addon(addon) => {
                sqlx::query_as::<_, ProfileRow>(UPDATE_PROFILE_ADDON).bind(addon)
            }
            ProfileChanges::Both { name, addon } => {
                sqlx::query_as::<_, ProfileRow>(UPDATE_PROFILE_BOTH)
                    .bind(name)
                    .bind(addon)
            }
        };

        Ok(query.bind(id).fetch_optional(&mut *conn).await?)
    }

    async fn profile_exists(&self, id: i32) -> Result<bool, StoreError> {
        let mut conn = self.acquire().await?;

        Ok(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *conn)
                .await?,
        )
    }

    async fn delete_profile(&self, id: i32) -> Result<bool, StoreError> {
        let mut conn = self.acquire().await?;

        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
