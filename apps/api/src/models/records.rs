//! The four taggable record types and their request bodies.
//!
//! Presets carry a `label`; sections add a free-text `text` field. All four
//! share the id/account/timestamps frame and a tags relation, so their
//! schemas differ only in table names and the optional `text` column.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;

use crate::store::row::{column, SqlArg};
use crate::store::schema::{
    TableSchema, APPLICATION_PRESETS_TABLE, APPLICATION_SECTIONS_TABLE,
    MTM_TAGS_APPLICATION_PRESETS, MTM_TAGS_APPLICATION_SECTIONS, MTM_TAGS_RESUME_PRESETS,
    MTM_TAGS_RESUME_SECTIONS, RESUME_PRESETS_TABLE, RESUME_SECTIONS_TABLE,
};
use crate::store::{RecordBody, StoreError, TableRecord};

use super::{check_label, check_text, ValidateBody};

fn preset_schema(table: &'static str, association: &'static str) -> TableSchema {
    TableSchema::builder(table)
        .association_table(association)
        .id()
        .account_id()
        .column("label")
        .timestamps()
        .build()
}

fn section_schema(table: &'static str, association: &'static str) -> TableSchema {
    TableSchema::builder(table)
        .association_table(association)
        .id()
        .account_id()
        .column("label")
        .column("text")
        .timestamps()
        .build()
}

/// Body shared by both preset types.
#[derive(Debug, Clone, Deserialize)]
pub struct PresetBody {
    pub label: String,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

impl RecordBody for PresetBody {
    fn create_values(&self) -> Vec<SqlArg> {
        vec![SqlArg::Text(self.label.clone())]
    }

    fn tag_ids(&self) -> &[i64] {
        &self.tag_ids
    }
}

impl ValidateBody for PresetBody {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_label(&self.label, &mut errors);
        errors
    }
}

/// Body shared by both section types.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionBody {
    pub label: String,
    pub text: String,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

impl RecordBody for SectionBody {
    fn create_values(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::Text(self.label.clone()),
            SqlArg::Text(self.text.clone()),
        ]
    }

    fn tag_ids(&self) -> &[i64] {
        &self.tag_ids
    }
}

impl ValidateBody for SectionBody {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_label(&self.label, &mut errors);
        check_text(&self.text, &mut errors);
        errors
    }
}

fn decode_preset_fields(
    row: &PgRow,
    offset: usize,
) -> Result<(i64, i64, String, DateTime<Utc>, DateTime<Utc>), StoreError> {
    Ok((
        column(row, offset)?,
        column(row, offset + 1)?,
        column(row, offset + 2)?,
        column(row, offset + 3)?,
        column(row, offset + 4)?,
    ))
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationPreset {
    pub id: i64,
    pub account_id: i64,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

static APPLICATION_PRESET_SCHEMA: LazyLock<TableSchema> = LazyLock::new(|| {
    preset_schema(APPLICATION_PRESETS_TABLE, MTM_TAGS_APPLICATION_PRESETS)
});

impl TableRecord for ApplicationPreset {
    type Body = PresetBody;

    fn schema() -> &'static TableSchema {
        &APPLICATION_PRESET_SCHEMA
    }

    fn from_row_at(row: &PgRow, offset: usize) -> Result<Self, StoreError> {
        let (id, account_id, label, created_at, updated_at) = decode_preset_fields(row, offset)?;
        Ok(ApplicationPreset {
            id,
            account_id,
            label,
            created_at,
            updated_at,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSection {
    pub id: i64,
    pub account_id: i64,
    pub label: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

static APPLICATION_SECTION_SCHEMA: LazyLock<TableSchema> = LazyLock::new(|| {
    section_schema(APPLICATION_SECTIONS_TABLE, MTM_TAGS_APPLICATION_SECTIONS)
});

impl TableRecord for ApplicationSection {
    type Body = SectionBody;

    fn schema() -> &'static TableSchema {
        &APPLICATION_SECTION_SCHEMA
    }

    fn from_row_at(row: &PgRow, offset: usize) -> Result<Self, StoreError> {
        Ok(ApplicationSection {
            id: column(row, offset)?,
            account_id: column(row, offset + 1)?,
            label: column(row, offset + 2)?,
            text: column(row, offset + 3)?,
            created_at: column(row, offset + 4)?,
            updated_at: column(row, offset + 5)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumePreset {
    pub id: i64,
    pub account_id: i64,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

static RESUME_PRESET_SCHEMA: LazyLock<TableSchema> =
    LazyLock::new(|| preset_schema(RESUME_PRESETS_TABLE, MTM_TAGS_RESUME_PRESETS));

impl TableRecord for ResumePreset {
    type Body = PresetBody;

    fn schema() -> &'static TableSchema {
        &RESUME_PRESET_SCHEMA
    }

    fn from_row_at(row: &PgRow, offset: usize) -> Result<Self, StoreError> {
        let (id, account_id, label, created_at, updated_at) = decode_preset_fields(row, offset)?;
        Ok(ResumePreset {
            id,
            account_id,
            label,
            created_at,
            updated_at,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeSection {
    pub id: i64,
    pub account_id: i64,
    pub label: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

static RESUME_SECTION_SCHEMA: LazyLock<TableSchema> =
    LazyLock::new(|| section_schema(RESUME_SECTIONS_TABLE, MTM_TAGS_RESUME_SECTIONS));

impl TableRecord for ResumeSection {
    type Body = SectionBody;

    fn schema() -> &'static TableSchema {
        &RESUME_SECTION_SCHEMA
    }

    fn from_row_at(row: &PgRow, offset: usize) -> Result<Self, StoreError> {
        Ok(ResumeSection {
            id: column(row, offset)?,
            account_id: column(row, offset + 1)?,
            label: column(row, offset + 2)?,
            text: column(row, offset + 3)?,
            created_at: column(row, offset + 4)?,
            updated_at: column(row, offset + 5)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MAX_LABEL_LENGTH, MAX_TEXT_LENGTH};

    #[test]
    fn test_section_body_bounds() {
        let ok = SectionBody {
            label: "Intro".to_string(),
            text: "Hello".to_string(),
            tag_ids: vec![],
        };
        assert!(ok.validate().is_empty());

        let bad = SectionBody {
            label: "x".repeat(MAX_LABEL_LENGTH + 1),
            text: String::new(),
            tag_ids: vec![],
        };
        assert_eq!(bad.validate().len(), 2);

        let long_text = SectionBody {
            label: "Intro".to_string(),
            text: "x".repeat(MAX_TEXT_LENGTH + 1),
            tag_ids: vec![],
        };
        assert_eq!(long_text.validate().len(), 1);
    }

    #[test]
    fn test_preset_body_bounds() {
        let ok = PresetBody {
            label: "Default".to_string(),
            tag_ids: vec![1, 2],
        };
        assert!(ok.validate().is_empty());
        assert_eq!(ok.tag_ids(), &[1, 2]);

        let bad = PresetBody {
            label: String::new(),
            tag_ids: vec![],
        };
        assert_eq!(bad.validate().len(), 1);
    }

    #[test]
    fn test_body_value_counts_match_schema_placeholders() {
        let section = SectionBody {
            label: "a".to_string(),
            text: "b".to_string(),
            tag_ids: vec![],
        };
        assert_eq!(
            section.create_values().len() + 1,
            ResumeSection::schema().create_fields().len()
        );
        assert_eq!(
            section.update_values().len(),
            ResumeSection::schema().update_fields().len()
        );

        let preset = PresetBody {
            label: "a".to_string(),
            tag_ids: vec![],
        };
        assert_eq!(
            preset.create_values().len() + 1,
            ResumePreset::schema().create_fields().len()
        );
    }

    #[test]
    fn test_schema_field_order_matches_decode_targets() {
        assert_eq!(
            ResumeSection::schema().select_fields(),
            vec!["id", "account_id", "label", "text", "created_at", "updated_at"]
        );
        assert_eq!(
            ApplicationPreset::schema().select_fields(),
            vec!["id", "account_id", "label", "created_at", "updated_at"]
        );
    }
}
