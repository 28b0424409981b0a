use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::{CurrentUser, MaybeUser};
use crate::auth::ownership::authorize_mutation;
use crate::error::AppError;
use crate::posts::dto::{CreatePostRequest, Pagination, PostResponse, UpdatePostRequest};
use crate::posts::repo;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/:id", get(get_post))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/:id", axum::routing::put(update_post).delete(delete_post))
        .route("/posts/:id/like", post(like_post).delete(unlike_post))
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let limit = p.limit.clamp(1, 100);
    let rows = repo::list(&state.db, limit, p.offset.max(0)).await?;
    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, AppError> {
    let post = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".into()))?;
    Ok(Json(post.into()))
}

/// A request without an Authorization header creates an anonymous post,
/// keyed by an opaque identifier instead of a user.
#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("title: must not be empty".into()));
    }
    if payload.body.trim().is_empty() {
        return Err(AppError::Validation("body: must not be empty".into()));
    }

    let (author_id, anon_key) = match &user {
        Some(u) => (Some(u.id), None),
        None => (None, Some(Uuid::new_v4().to_string())),
    };
    let post = repo::create(
        &state.db,
        author_id,
        anon_key.as_deref(),
        payload.title.trim(),
        &payload.body,
    )
    .await?;

    info!(post_id = %post.id, anonymous = post.author_id.is_none(), "post created");
    Ok((StatusCode::CREATED, Json(PostResponse::from_post(post, 0))))
}

#[instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let post = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".into()))?;
    authorize_mutation(user.id, post.author_id)?;

    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("title: must not be empty".into()));
        }
    }
    if let Some(body) = &payload.body {
        if body.trim().is_empty() {
            return Err(AppError::Validation("body: must not be empty".into()));
        }
    }

    repo::update(&state.db, id, payload.title.as_deref(), payload.body.as_deref()).await?;
    let updated = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".into()))?;
    Ok(Json(updated.into()))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let post = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".into()))?;
    authorize_mutation(user.id, post.author_id)?;

    repo::delete(&state.db, id).await?;
    info!(post_id = %id, user_id = %user.id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn like_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if repo::find(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("post not found".into()));
    }
    repo::like(&state.db, id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn unlike_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if repo::find(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("post not found".into()));
    }
    repo::unlike(&state.db, id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
