//! Generic CRUD handlers over the tagged-record stores, instantiated once
//! per entity at route-registration time.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::pagination::Pagination;
use crate::models::{RecordWithTags, ValidateBody};
use crate::state::AppState;

use super::StoreAccess;

#[derive(Deserialize)]
pub struct AccountQuery {
    pub account_id: i64,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub account_id: i64,
    pub page: Option<i64>,
    pub count: Option<i64>,
    pub offset: Option<i64>,
}

fn validated<B: ValidateBody>(body: &B) -> Result<(), AppError> {
    let errors = body.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// GET /api/v1/<entity> — paginated list with tags, grouped per record.
pub async fn list_records<T>(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<RecordWithTags<T>>>, AppError>
where
    T: StoreAccess + Serialize,
{
    let pagination = Pagination::from_params(params.page, params.count, params.offset);
    let records = T::store(&state.stores)
        .get_many(params.account_id, pagination)
        .await?;
    Ok(Json(records))
}

/// GET /api/v1/<entity>/:id
pub async fn get_record<T>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<AccountQuery>,
) -> Result<Json<T>, AppError>
where
    T: StoreAccess + Serialize,
{
    let record = T::store(&state.stores)
        .get_single(params.account_id, id)
        .await?;
    Ok(Json(record))
}

/// POST /api/v1/<entity> — creates the record and links any supplied
/// `tag_ids` in the same transaction.
pub async fn create_record<T>(
    State(state): State<AppState>,
    Query(params): Query<AccountQuery>,
    Json(body): Json<T::Body>,
) -> Result<(StatusCode, Json<T>), AppError>
where
    T: StoreAccess + Serialize,
    T::Body: DeserializeOwned + ValidateBody + 'static,
{
    validated(&body)?;
    let record = T::store(&state.stores)
        .create_single(params.account_id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/v1/<entity>/:id — updates the record's own fields; tag
/// associations are left untouched.
pub async fn update_record<T>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<AccountQuery>,
    Json(body): Json<T::Body>,
) -> Result<Json<T>, AppError>
where
    T: StoreAccess + Serialize,
    T::Body: DeserializeOwned + ValidateBody + 'static,
{
    validated(&body)?;
    let record = T::store(&state.stores)
        .update_single(params.account_id, id, &body)
        .await?;
    Ok(Json(record))
}

/// DELETE /api/v1/<entity>/:id — association rows cascade with the record.
pub async fn delete_record<T>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<AccountQuery>,
) -> Result<StatusCode, AppError>
where
    T: StoreAccess,
{
    T::store(&state.stores)
        .delete_single(params.account_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
