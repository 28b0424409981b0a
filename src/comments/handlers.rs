use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::{CurrentUser, MaybeUser};
use crate::auth::ownership::authorize_mutation;
use crate::comments::dto::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};
use crate::comments::repo;
use crate::error::AppError;
use crate::posts::dto::Pagination;
use crate::posts::repo as posts_repo;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/posts/:id/comments", get(list_comments))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/:id/comments", post(create_comment))
        .route("/comments/:id", put(update_comment).delete(delete_comment))
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    if posts_repo::find(&state.db, post_id).await?.is_none() {
        return Err(AppError::NotFound("post not found".into()));
    }
    let limit = p.limit.clamp(1, 100);
    let rows = repo::list_by_post(&state.db, post_id, limit, p.offset.max(0)).await?;
    Ok(Json(rows.into_iter().map(CommentResponse::from).collect()))
}

/// Like post creation, a request without an Authorization header creates an
/// anonymous comment.
#[instrument(skip(state, payload))]
pub async fn create_comment(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    if payload.body.trim().is_empty() {
        return Err(AppError::Validation("body: must not be empty".into()));
    }
    if posts_repo::find(&state.db, post_id).await?.is_none() {
        return Err(AppError::NotFound("post not found".into()));
    }

    let (author_id, anon_key) = match &user {
        Some(u) => (Some(u.id), None),
        None => (None, Some(Uuid::new_v4().to_string())),
    };
    let comment =
        repo::create(&state.db, post_id, author_id, anon_key.as_deref(), &payload.body).await?;

    info!(
        comment_id = %comment.id,
        post_id = %post_id,
        anonymous = comment.author_id.is_none(),
        "comment created"
    );
    Ok((StatusCode::CREATED, Json(comment.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".into()))?;
    authorize_mutation(user.id, comment.author_id)?;

    if payload.body.trim().is_empty() {
        return Err(AppError::Validation("body: must not be empty".into()));
    }

    let updated = repo::update(&state.db, id, &payload.body).await?;
    Ok(Json(updated.into()))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let comment = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".into()))?;
    authorize_mutation(user.id, comment.author_id)?;

    repo::delete(&state.db, id).await?;
    info!(comment_id = %id, user_id = %user.id, "comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
