//! Tag CRUD. Tags are plain account-scoped records; they go through the
//! non-tagged store (a tag cannot itself be tagged).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::pagination::Pagination;
use crate::models::tag::{Tag, TagBody};
use crate::models::ValidateBody;
use crate::records::handlers::{AccountQuery, ListQuery};
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn list_tags(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let pagination = Pagination::from_params(params.page, params.count, params.offset);
    let tags = state
        .stores
        .tags
        .get_many(params.account_id, Some(pagination))
        .await?;
    Ok(Json(tags))
}

/// GET /api/v1/tags/:id
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<AccountQuery>,
) -> Result<Json<Tag>, AppError> {
    let tag = state.stores.tags.get_single(params.account_id, id).await?;
    Ok(Json(tag))
}

/// POST /api/v1/tags
pub async fn create_tag(
    State(state): State<AppState>,
    Query(params): Query<AccountQuery>,
    Json(body): Json<TagBody>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    let errors = body.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let tag = state
        .stores
        .tags
        .create_single(params.account_id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /api/v1/tags/:id
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<AccountQuery>,
    Json(body): Json<TagBody>,
) -> Result<Json<Tag>, AppError> {
    let errors = body.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let tag = state
        .stores
        .tags
        .update_single(params.account_id, id, &body)
        .await?;
    Ok(Json(tag))
}

/// DELETE /api/v1/tags/:id — association rows referencing the tag cascade.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<AccountQuery>,
) -> Result<StatusCode, AppError> {
    state
        .stores
        .tags
        .delete_single(params.account_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
