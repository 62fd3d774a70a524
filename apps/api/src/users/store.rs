//! User persistence: the `UserStore` trait and its PostgreSQL backend.
//!
//! Uniqueness of `google_id` and `email` is owned by the database's unique
//! indexes; callers see a violation as `AppError::Conflict`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, ProfileUpdate, UserRole, UserRow, DEFAULT_AUTH_PROVIDER};

/// Storage seam for user profiles. Carried in `AppState` as `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError>;

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<UserRow>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError>;

    async fn find_by_google_id_or_email(
        &self,
        google_id: &str,
        email: &str,
    ) -> Result<Option<UserRow>, AppError>;

    async fn insert(&self, user: NewUser) -> Result<UserRow, AppError>;

    async fn link_google(
        &self,
        id: Uuid,
        google_id: &str,
        profile_image: Option<&str>,
    ) -> Result<UserRow, AppError>;

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<UserRow>, AppError>;

    /// Returns `true` when a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<UserRow>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE google_id = $1")
            .bind(google_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_google_id_or_email(
        &self,
        google_id: &str,
        email: &str,
    ) -> Result<Option<UserRow>, AppError> {
        // Prefer the provider match when both rows exist.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT * FROM users
            WHERE google_id = $1 OR email = $2
            ORDER BY (google_id = $1) DESC NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(google_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, user: NewUser) -> Result<UserRow, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users
                (id, google_id, first_name, last_name, email, profile_image, role, auth_provider)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.google_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.profile_image)
        .bind(UserRole::default().as_str())
        .bind(DEFAULT_AUTH_PROVIDER)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn link_google(
        &self,
        id: Uuid,
        google_id: &str,
        profile_image: Option<&str>,
    ) -> Result<UserRow, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET google_id = $2, profile_image = $3, auth_provider = $4, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(google_id)
        .bind(profile_image)
        .bind(DEFAULT_AUTH_PROVIDER)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<UserRow>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name  = COALESCE($3, last_name),
                email      = COALESCE($4, email),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
