//! Schema-driven generic store for account-scoped, optionally tagged records.
//!
//! Each record type declares a [`schema::TableSchema`] once; SQL text is
//! generated from it by [`queries`], rows decode by ordinal via [`row`], and
//! joined tag rows are regrouped by [`group`]. The stores here compose those
//! pieces with a pooled connection and one transaction per write.

pub mod group;
pub mod queries;
pub mod row;
pub mod schema;

#[cfg(test)]
mod live_tests;

use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::pagination::Pagination;
use crate::models::tag::Tag;
use crate::models::RecordWithTags;

use self::group::group_tagged_rows;
use self::queries::{QueryHolder, TaggedQueryHolder};
use self::row::{bind_args, check_row_width, SqlArg};
use self::schema::TableSchema;

/// Store failure taxonomy. `NotFound` and `Conflict` are expected,
/// caller-recoverable conditions; `Decode` means the physical schema and the
/// registered field roles have drifted and the request cannot be salvaged;
/// `Database` covers transport and transaction failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("conflicting record: {0}")]
    Conflict(String),

    #[error("row decode mismatch: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return StoreError::NotFound;
        }
        if err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            return StoreError::Conflict(err.to_string());
        }
        StoreError::Database(err)
    }
}

/// A persisted, account-scoped record type managed by the generic store.
pub trait TableRecord: Sized + Send + Sync + Unpin + 'static {
    type Body: RecordBody + Send + Sync;

    /// Static field-role metadata, resolved once per type.
    fn schema() -> &'static TableSchema;

    /// Ordinal decode starting at `offset`, in `select_fields` order.
    fn from_row_at(row: &PgRow, offset: usize) -> Result<Self, StoreError>;

    fn id(&self) -> i64;
}

/// Caller-supplied payload for create/update. Values must follow the
/// schema's field order; the stores verify the counts line up with the
/// generated placeholder lists before binding.
pub trait RecordBody {
    /// Values for the create-field columns, excluding `account_id` (the
    /// store binds the scoping value itself).
    fn create_values(&self) -> Vec<SqlArg>;

    /// Values for the update-field columns. Defaults to the create list,
    /// which coincides for every registered type.
    fn update_values(&self) -> Vec<SqlArg> {
        self.create_values()
    }

    /// Tag ids to associate at create time. Updates never touch tag sets.
    fn tag_ids(&self) -> &[i64] {
        &[]
    }
}

/// CRUD over a non-taggable record type (tags themselves). All operations
/// are account-scoped; writes run in exactly one transaction and commit only
/// after the returned row decodes.
#[derive(Debug, Clone)]
pub struct RecordStore<T: TableRecord> {
    pool: PgPool,
    queries: QueryHolder,
    select_width: usize,
    create_width: usize,
    update_width: usize,
    _record: PhantomData<T>,
}

impl<T: TableRecord> RecordStore<T> {
    pub fn new(pool: PgPool) -> Self {
        let schema = T::schema();
        RecordStore {
            pool,
            queries: QueryHolder::new(schema),
            select_width: schema.select_fields().len(),
            create_width: schema.create_fields().len(),
            update_width: schema.update_fields().len(),
            _record: PhantomData,
        }
    }

    fn check_alignment(&self, supplied: usize, expected: usize) -> Result<(), StoreError> {
        if supplied != expected {
            return Err(StoreError::Decode(format!(
                "body supplied {supplied} values for {expected} placeholders on `{}`",
                T::schema().table()
            )));
        }
        Ok(())
    }

    fn decode(&self, row: &PgRow) -> Result<T, StoreError> {
        check_row_width(row, self.select_width)?;
        T::from_row_at(row, 0)
    }

    pub async fn get_many(
        &self,
        account_id: i64,
        pagination: Option<Pagination>,
    ) -> Result<Vec<T>, StoreError> {
        let rows = match pagination {
            Some(p) => {
                sqlx::query(&self.queries.select_many_paginated)
                    .bind(account_id)
                    .bind(p.sql_offset())
                    .bind(p.limit())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query(&self.queries.select_many)
                    .bind(account_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(|row| self.decode(row)).collect()
    }

    pub async fn get_single(&self, account_id: i64, id: i64) -> Result<T, StoreError> {
        let row = sqlx::query(&self.queries.select_single)
            .bind(account_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => self.decode(&row),
            None => Err(StoreError::NotFound),
        }
    }

    pub async fn create_single(&self, account_id: i64, body: &T::Body) -> Result<T, StoreError> {
        let values = body.create_values();
        self.check_alignment(values.len() + 1, self.create_width)?;

        let mut tx = self.pool.begin().await?;
        let query = sqlx::query(&self.queries.insert).bind(account_id);
        let row = bind_args(query, values).fetch_one(&mut *tx).await?;
        let record = self.decode(&row)?;
        tx.commit().await?;

        Ok(record)
    }

    pub async fn update_single(
        &self,
        account_id: i64,
        id: i64,
        body: &T::Body,
    ) -> Result<T, StoreError> {
        let values = body.update_values();
        self.check_alignment(values.len(), self.update_width)?;

        let mut tx = self.pool.begin().await?;
        let query = sqlx::query(&self.queries.update).bind(id).bind(account_id);
        let row = bind_args(query, values).fetch_optional(&mut *tx).await?;

        // Zero rows means wrong id or wrong owning account; the caller
        // cannot tell which, which keeps authorization opaque.
        let row = row.ok_or(StoreError::NotFound)?;
        let record = self.decode(&row)?;
        tx.commit().await?;

        Ok(record)
    }

    pub async fn delete_single(&self, account_id: i64, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let done = sqlx::query(&self.queries.delete)
            .bind(id)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tx.commit().await?;

        Ok(())
    }
}

/// CRUD over a taggable record type. Extends the plain store with the
/// tags-joined multi-fetch (grouped in-process) and the CTE-based create
/// that links tag ids atomically with the record insert. The association
/// table's rows are cascade-deleted with the record.
#[derive(Debug, Clone)]
pub struct TaggedRecordStore<T: TableRecord> {
    plain: RecordStore<T>,
    queries: TaggedQueryHolder,
    joined_width: usize,
    record_width: usize,
}

impl<T: TableRecord> TaggedRecordStore<T> {
    pub fn new(pool: PgPool) -> Self {
        let schema = T::schema();
        let tag_schema = Tag::schema();
        let record_width = schema.select_fields().len();
        TaggedRecordStore {
            plain: RecordStore::new(pool),
            queries: TaggedQueryHolder::new(schema, tag_schema),
            joined_width: record_width + tag_schema.select_fields().len(),
            record_width,
        }
    }

    /// Paginated fetch of records with their tags, newest-updated first.
    pub async fn get_many(
        &self,
        account_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<RecordWithTags<T>>, StoreError> {
        let rows = sqlx::query(&self.queries.select_many_with_tags)
            .bind(account_id)
            .bind(pagination.sql_offset())
            .bind(pagination.limit())
            .fetch_all(&self.plain.pool)
            .await?;

        let mut pairs = Vec::with_capacity(rows.len());
        for row in &rows {
            check_row_width(row, self.joined_width)?;
            let record = T::from_row_at(row, 0)?;
            let tag = Tag::from_joined_row(row, self.record_width)?;
            pairs.push((record, tag));
        }

        Ok(group_tagged_rows(pairs))
    }

    pub async fn get_single(&self, account_id: i64, id: i64) -> Result<T, StoreError> {
        self.plain.get_single(account_id, id).await
    }

    /// Inserts the record and its tag associations in one statement, inside
    /// one transaction; zero tag ids degrades to the plain insert.
    pub async fn create_single(&self, account_id: i64, body: &T::Body) -> Result<T, StoreError> {
        let values = body.create_values();
        self.plain
            .check_alignment(values.len() + 1, self.plain.create_width)?;

        let tag_ids = body.tag_ids();
        let sql = self.queries.insert_with_tags.render(tag_ids.len());

        let mut tx = self.plain.pool.begin().await?;
        let mut query = sqlx::query(&sql).bind(account_id);
        query = bind_args(query, values);
        for tag_id in tag_ids {
            query = query.bind(*tag_id);
        }

        let row = query.fetch_one(&mut *tx).await?;
        let record = self.plain.decode(&row)?;
        tx.commit().await?;

        Ok(record)
    }

    /// Updates the record's own fields. Tag associations are fixed at create
    /// time and not touched here.
    pub async fn update_single(
        &self,
        account_id: i64,
        id: i64,
        body: &T::Body,
    ) -> Result<T, StoreError> {
        self.plain.update_single(account_id, id, body).await
    }

    pub async fn delete_single(&self, account_id: i64, id: i64) -> Result<(), StoreError> {
        self.plain.delete_single(account_id, id).await
    }
}
