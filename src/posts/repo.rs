use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;

/// Post record. `author_id` is null only for anonymous posts, which carry
/// an opaque `anon_key` instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Option<Uuid>,
    pub anon_key: Option<String>,
    pub title: String,
    pub body: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Post plus its like count, for read endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithMeta {
    pub id: Uuid,
    pub author_id: Option<Uuid>,
    pub anon_key: Option<String>,
    pub title: String,
    pub body: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub like_count: i64,
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<PostWithMeta>, AppError> {
    db::bound(
        sqlx::query_as::<_, PostWithMeta>(
            r#"
            SELECT p.id, p.author_id, p.anon_key, p.title, p.body,
                   p.created_at, p.updated_at,
                   (SELECT count(*) FROM likes l WHERE l.post_id = p.id) AS like_count
            FROM posts p
            ORDER BY p.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db),
    )
    .await
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<PostWithMeta>, AppError> {
    db::bound(
        sqlx::query_as::<_, PostWithMeta>(
            r#"
            SELECT p.id, p.author_id, p.anon_key, p.title, p.body,
                   p.created_at, p.updated_at,
                   (SELECT count(*) FROM likes l WHERE l.post_id = p.id) AS like_count
            FROM posts p
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db),
    )
    .await
}

/// Bare row lookup for the ownership check before a mutation.
pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<Post>, AppError> {
    db::bound(
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, anon_key, title, body, created_at, updated_at
            FROM posts
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
    author_id: Option<Uuid>,
    anon_key: Option<&str>,
    title: &str,
    body: &str,
) -> Result<Post, AppError> {
    db::bound(
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, anon_key, title, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_id, anon_key, title, body, created_at, updated_at
            "#,
        )
        .bind(author_id)
        .bind(anon_key)
        .bind(title)
        .bind(body)
        .fetch_one(db),
    )
    .await
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    title: Option<&str>,
    body: Option<&str>,
) -> Result<(), AppError> {
    db::bound(async move {
        sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(body)
        .execute(db)
        .await?;
        Ok(())
    })
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
    db::bound(async move {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    })
    .await
}

/// Idempotent: liking an already-liked post is a no-op.
pub async fn like(db: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    db::bound(async move {
        sqlx::query(
            "INSERT INTO likes (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(())
    })
    .await
}

/// Removes only the caller's own like.
pub async fn unlike(db: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    db::bound(async move {
        sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(())
    })
    .await
}
