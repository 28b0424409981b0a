use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;

/// Comment record. Same authorship rule as posts: `author_id` is null only
/// for anonymous comments, which carry an opaque `anon_key`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Option<Uuid>,
    pub anon_key: Option<String>,
    pub body: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn list_by_post(
    db: &PgPool,
    post_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Comment>, AppError> {
    db::bound(
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, anon_key, body, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db),
    )
    .await
}

pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<Comment>, AppError> {
    db::bound(
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, anon_key, body, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db),
    )
    .await
}

pub async fn create(
    db: &PgPool,
    post_id: Uuid,
    author_id: Option<Uuid>,
    anon_key: Option<&str>,
    body: &str,
) -> Result<Comment, AppError> {
    db::bound(
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, author_id, anon_key, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, author_id, anon_key, body, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(anon_key)
        .bind(body)
        .fetch_one(db),
    )
    .await
}

pub async fn update(db: &PgPool, id: Uuid, body: &str) -> Result<Comment, AppError> {
    db::bound(
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET body = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, post_id, author_id, anon_key, body, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(body)
        .fetch_one(db),
    )
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
    db::bound(async move {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    })
    .await
}
