//! Row decoding and argument binding for the generic store.
//!
//! Records decode by ordinal, in `select_fields` order, so the generated
//! select/RETURNING lists and the decode targets can never disagree silently:
//! a width mismatch is a hard `Decode` error (schema drift), not a zeroed
//! field.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};

use super::StoreError;

/// One positional SQL argument. The owned-value enum is what lets the store
/// bind caller bodies in `create_fields`/`update_fields` order without the
/// per-entity code knowing placeholder numbers.
#[derive(Debug, Clone)]
pub enum SqlArg {
    Int(i64),
    Text(String),
}

impl SqlArg {
    fn bind_to<'q>(
        self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            SqlArg::Int(v) => query.bind(v),
            SqlArg::Text(v) => query.bind(v),
        }
    }
}

pub fn bind_args<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    args: Vec<SqlArg>,
) -> Query<'q, Postgres, PgArguments> {
    for arg in args {
        query = arg.bind_to(query);
    }
    query
}

/// Rejects rows whose physical column count disagrees with the registered
/// field list. Retrying cannot fix column misalignment, so this is surfaced
/// as a non-recoverable decode error.
pub fn check_row_width(row: &PgRow, expected: usize) -> Result<(), StoreError> {
    let actual = row.len();
    if actual != expected {
        return Err(StoreError::Decode(format!(
            "row has {actual} columns, schema declares {expected}"
        )));
    }
    Ok(())
}

/// Ordinal `try_get` with decode failures mapped into the store taxonomy.
pub fn column<'r, T>(row: &'r PgRow, index: usize) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get::<T, _>(index)
        .map_err(|e| StoreError::Decode(format!("column {index}: {e}")))
}
