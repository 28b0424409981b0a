use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::posts::repo::{Post, PostWithMeta};

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    /// Absent for anonymous posts; the anonymous key itself is never exposed.
    pub author_id: Option<Uuid>,
    pub anonymous: bool,
    pub like_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PostResponse {
    pub fn from_post(post: Post, like_count: i64) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            anonymous: post.author_id.is_none(),
            author_id: post.author_id,
            like_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<PostWithMeta> for PostResponse {
    fn from(row: PostWithMeta) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            anonymous: row.author_id.is_none(),
            author_id: row.author_id,
            like_count: row.like_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
