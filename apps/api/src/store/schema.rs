use thiserror::Error;

/// Column names every scoped table shares. The query builders special-case
/// these: `id`/`created_at` are assigned by the database, `account_id` is
/// bound once at insert and immutable afterwards, `updated_at` is re-stamped
/// with `DEFAULT` on every update.
pub const ID_COLUMN: &str = "id";
pub const ACCOUNT_ID_COLUMN: &str = "account_id";
pub const CREATED_AT_COLUMN: &str = "created_at";
pub const UPDATED_AT_COLUMN: &str = "updated_at";

/// Table names for the registered record types.
pub const TAGS_TABLE: &str = "tags";
pub const APPLICATION_PRESETS_TABLE: &str = "application_presets";
pub const APPLICATION_SECTIONS_TABLE: &str = "application_sections";
pub const RESUME_PRESETS_TABLE: &str = "resume_presets";
pub const RESUME_SECTIONS_TABLE: &str = "resume_sections";

pub const MTM_TAGS_APPLICATION_PRESETS: &str = "mtm_tags_application_presets";
pub const MTM_TAGS_APPLICATION_SECTIONS: &str = "mtm_tags_application_sections";
pub const MTM_TAGS_RESUME_PRESETS: &str = "mtm_tags_resume_presets";
pub const MTM_TAGS_RESUME_SECTIONS: &str = "mtm_tags_resume_sections";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("table `{0}` declares no columns")]
    Empty(String),

    #[error("table `{table}` declares column `{column}` more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("table `{table}` column `{column}` is server-assigned but flagged for {role}")]
    ServerAssignedWritable {
        table: String,
        column: String,
        role: &'static str,
    },

    #[error("table `{table}` first column must be `id`, found `{column}`")]
    IdNotFirst { table: String, column: String },

    #[error("table `{0}` is not account-scoped (missing `account_id`)")]
    NotAccountScoped(String),
}

/// Role metadata for one persisted column. Every column participates in
/// select; create/update participation is opt-in; server-assigned columns
/// (`id`, timestamps) may never be flagged writable.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub column: &'static str,
    pub create: bool,
    pub update: bool,
    pub server_assigned: bool,
}

/// Static per-type description of a persisted record: table name, optional
/// tag-association table, and the ordered field-role list. Built exactly once
/// per type (via `LazyLock` in the model modules) and never mutated after.
#[derive(Debug, Clone)]
pub struct TableSchema {
    table: &'static str,
    association_table: Option<&'static str>,
    has_timestamps: bool,
    fields: Vec<FieldSpec>,
}

impl TableSchema {
    pub fn builder(table: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            table,
            association_table: None,
            has_timestamps: false,
            fields: Vec::new(),
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn association_table(&self) -> Option<&'static str> {
        self.association_table
    }

    /// Whether updates re-stamp `updated_at` (`= DEFAULT`).
    pub fn has_timestamps(&self) -> bool {
        self.has_timestamps
    }

    /// All persisted columns, in declaration order. Select lists, `RETURNING`
    /// lists and the ordinal decode targets all derive from this order.
    pub fn select_fields(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.column).collect()
    }

    /// Insert columns: `account_id` (scoping value) plus every column flagged
    /// for create. `id` and timestamps are database-assigned and excluded.
    pub fn create_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.create)
            .map(|f| f.column)
            .collect()
    }

    /// `SET` targets, excluding `id`/`account_id`/`created_at`. `updated_at`
    /// is not listed here; the update builder renders it as `= DEFAULT`.
    pub fn update_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.update)
            .map(|f| f.column)
            .collect()
    }
}

/// Declarative replacement for reflection-driven field discovery: each model
/// declares its columns and roles once, in column order.
pub struct SchemaBuilder {
    table: &'static str,
    association_table: Option<&'static str>,
    has_timestamps: bool,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Surrogate key, assigned by the database. Must be declared first so
    /// joined reads can anchor on ordinal 0.
    pub fn id(mut self) -> Self {
        self.fields.push(FieldSpec {
            column: ID_COLUMN,
            create: false,
            update: false,
            server_assigned: true,
        });
        self
    }

    /// Owning account. Part of every insert's value list (scoping value) but
    /// never an update target.
    pub fn account_id(mut self) -> Self {
        self.fields.push(FieldSpec {
            column: ACCOUNT_ID_COLUMN,
            create: true,
            update: false,
            server_assigned: false,
        });
        self
    }

    /// Caller-supplied scalar column, present in create and update.
    pub fn column(mut self, column: &'static str) -> Self {
        self.fields.push(FieldSpec {
            column,
            create: true,
            update: true,
            server_assigned: false,
        });
        self
    }

    /// Column persisted and selected but never accepted from a caller.
    pub fn read_only_column(mut self, column: &'static str) -> Self {
        self.fields.push(FieldSpec {
            column,
            create: false,
            update: false,
            server_assigned: false,
        });
        self
    }

    /// `created_at` / `updated_at`, both database-defaulted. Declaring this
    /// makes the update builder emit `updated_at = DEFAULT`.
    pub fn timestamps(mut self) -> Self {
        self.has_timestamps = true;
        self.fields.push(FieldSpec {
            column: CREATED_AT_COLUMN,
            create: false,
            update: false,
            server_assigned: true,
        });
        self.fields.push(FieldSpec {
            column: UPDATED_AT_COLUMN,
            create: false,
            update: false,
            server_assigned: true,
        });
        self
    }

    pub fn association_table(mut self, table: &'static str) -> Self {
        self.association_table = Some(table);
        self
    }

    pub fn try_build(self) -> Result<TableSchema, SchemaError> {
        let table = self.table;

        if self.fields.is_empty() {
            return Err(SchemaError::Empty(table.to_string()));
        }

        if self.fields[0].column != ID_COLUMN {
            return Err(SchemaError::IdNotFirst {
                table: table.to_string(),
                column: self.fields[0].column.to_string(),
            });
        }

        if !self.fields.iter().any(|f| f.column == ACCOUNT_ID_COLUMN) {
            return Err(SchemaError::NotAccountScoped(table.to_string()));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.column == field.column) {
                return Err(SchemaError::DuplicateColumn {
                    table: table.to_string(),
                    column: field.column.to_string(),
                });
            }

            if field.server_assigned && (field.create || field.update) {
                let role = if field.create { "create" } else { "update" };
                return Err(SchemaError::ServerAssignedWritable {
                    table: table.to_string(),
                    column: field.column.to_string(),
                    role,
                });
            }
        }

        Ok(TableSchema {
            table,
            association_table: self.association_table,
            has_timestamps: self.has_timestamps,
            fields: self.fields,
        })
    }

    /// Builds the schema, aborting the process on malformed metadata. Field
    /// roles are a static property of the type; a bad declaration is a
    /// programming error caught at startup, never a per-request failure.
    pub fn build(self) -> TableSchema {
        let table = self.table;
        self.try_build()
            .unwrap_or_else(|e| panic!("invalid schema for table `{table}`: {e}"))
    }
}

/// Forces every registered record schema to resolve, so malformed metadata
/// aborts startup instead of the first request that touches the type.
pub fn check_registered() -> usize {
    use crate::models::records::{
        ApplicationPreset, ApplicationSection, ResumePreset, ResumeSection,
    };
    use crate::models::tag::Tag;
    use crate::store::TableRecord;

    let schemas = [
        Tag::schema(),
        ApplicationPreset::schema(),
        ApplicationSection::schema(),
        ResumePreset::schema(),
        ResumeSection::schema(),
    ];

    for schema in &schemas {
        tracing::debug!(
            table = schema.table(),
            columns = schema.select_fields().len(),
            "registered record schema"
        );
    }

    schemas.len()
}
