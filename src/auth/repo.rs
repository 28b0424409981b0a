use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::dto::UpdateProfileRequest;
use crate::auth::repo_types::User;
use crate::db;
use crate::error::AppError;

impl User {
    /// Find a user by (lowercased) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        db::bound(
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, password_hash, display_name, age, parent_consent,
                       bio, avatar_url, location, created_at, last_active
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(db),
        )
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        db::bound(
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, password_hash, display_name, age, parent_consent,
                       bio, avatar_url, location, created_at, last_active
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(db),
        )
        .await
    }

    /// Create a new user. The unique constraint on email is the final
    /// arbiter for concurrent registrations; there is no check-then-insert.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        display_name: &str,
        age: i16,
        parent_consent: bool,
    ) -> Result<User, AppError> {
        db::bound(
            sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (email, password_hash, display_name, age, parent_consent)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, email, password_hash, display_name, age, parent_consent,
                          bio, avatar_url, location, created_at, last_active
                "#,
            )
            .bind(email)
            .bind(password_hash)
            .bind(display_name)
            .bind(age)
            .bind(parent_consent)
            .fetch_one(db),
        )
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict("email already registered".into()),
            other => other,
        })
    }

    pub async fn touch_last_active(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        db::bound(async move {
            sqlx::query("UPDATE users SET last_active = now() WHERE id = $1")
                .bind(id)
                .execute(db)
                .await?;
            Ok(())
        })
        .await
    }

    /// Partial profile update: absent fields keep their stored value.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: &UpdateProfileRequest,
    ) -> Result<User, AppError> {
        db::bound(
            sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET display_name = COALESCE($2, display_name),
                    bio = COALESCE($3, bio),
                    avatar_url = COALESCE($4, avatar_url),
                    location = COALESCE($5, location)
                WHERE id = $1
                RETURNING id, email, password_hash, display_name, age, parent_consent,
                          bio, avatar_url, location, created_at, last_active
                "#,
            )
            .bind(id)
            .bind(changes.display_name.as_deref())
            .bind(changes.bio.as_deref())
            .bind(changes.avatar_url.as_deref())
            .bind(changes.location.as_deref())
            .fetch_one(db),
        )
        .await
    }
}
