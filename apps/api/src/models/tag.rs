use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;

use crate::store::row::{column, SqlArg};
use crate::store::schema::{TableSchema, TAGS_TABLE};
use crate::store::{RecordBody, StoreError, TableRecord};

use super::ValidateBody;

/// Account-owned label+color pair, associated with records many-to-many.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub id: i64,
    #[serde(skip_serializing)]
    pub account_id: i64,
    pub label: String,
    pub color: String,
}

static SCHEMA: LazyLock<TableSchema> = LazyLock::new(|| {
    TableSchema::builder(TAGS_TABLE)
        .id()
        .account_id()
        .column("label")
        .column("color")
        .build()
});

impl TableRecord for Tag {
    type Body = TagBody;

    fn schema() -> &'static TableSchema {
        &SCHEMA
    }

    fn from_row_at(row: &PgRow, offset: usize) -> Result<Self, StoreError> {
        Ok(Tag {
            id: column(row, offset)?,
            account_id: column(row, offset + 1)?,
            label: column(row, offset + 2)?,
            color: column(row, offset + 3)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl Tag {
    /// Decodes the trailing tag columns of a tags-joined row. A null tag id
    /// means the record had no associated tag on this row; that is an
    /// explicit absence, distinct from a tag with empty fields.
    pub fn from_joined_row(row: &PgRow, offset: usize) -> Result<Option<Tag>, StoreError> {
        let id: Option<i64> = column(row, offset)?;
        match id {
            None => Ok(None),
            Some(id) => Ok(Some(Tag {
                id,
                account_id: column(row, offset + 1)?,
                label: column(row, offset + 2)?,
                color: column(row, offset + 3)?,
            })),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagBody {
    pub label: String,
    pub color: String,
}

impl RecordBody for TagBody {
    fn create_values(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::Text(self.label.clone()),
            SqlArg::Text(self.color.clone()),
        ]
    }
}

impl ValidateBody for TagBody {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.label.is_empty() {
            errors.push("Property label missing from JSON body".to_string());
        }
        if self.color.is_empty() {
            errors.push("Property color missing from JSON body".to_string());
        }
        errors
    }
}
