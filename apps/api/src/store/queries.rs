//! Pure SQL-text builders for the tagged-record store.
//!
//! Every builder is a pure function of a [`TableSchema`]: the same schema
//! always yields byte-identical SQL, so generated text is cached once per
//! store and unit-tested by plain string comparison, without a database.
//!
//! Argument numbering contract (shared with the store's bind code):
//! - fetches:  `$1` = account_id (`$2` = id, or `$2`/`$3` = offset/limit)
//! - insert:   placeholders follow `create_fields` order; tag ids continue
//!   immediately after the last create field
//! - update:   `$1` = id, `$2` = account_id, SET values start at `$3`
//! - delete:   `$1` = id, `$2` = account_id

use super::schema::{TableSchema, UPDATED_AT_COLUMN};

fn select_list(schema: &TableSchema) -> String {
    schema.select_fields().join(", ")
}

fn aliased_select_list(schema: &TableSchema, alias: &str) -> String {
    schema
        .select_fields()
        .iter()
        .map(|f| format!("{alias}.{f}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `SELECT <fields> FROM <table> WHERE account_id = $1 AND id = $2`
pub fn select_single(schema: &TableSchema) -> String {
    format!(
        "SELECT {} FROM {} WHERE account_id = $1 AND id = $2",
        select_list(schema),
        schema.table()
    )
}

/// `SELECT <fields> FROM <table> WHERE account_id = $1 [OFFSET $2 LIMIT $3]`
pub fn select_many(schema: &TableSchema, paginated: bool) -> String {
    let mut query = format!(
        "SELECT {} FROM {} WHERE account_id = $1",
        select_list(schema),
        schema.table()
    );
    if paginated {
        query.push_str(" OFFSET $2 LIMIT $3");
    }
    query
}

/// Two-stage tags-joined fetch: a named subquery scopes and paginates the
/// records, then is left-joined to the association table and `tags`. Records
/// with zero tags still appear exactly once, with null tag columns.
///
/// The ORDER BY (newest `updated_at` first, `id` as the tie-break) is applied
/// inside the subquery as well, so OFFSET/LIMIT cut a stable ordering and
/// page boundaries are deterministic.
pub fn select_many_with_tags(schema: &TableSchema, tags: &TableSchema) -> String {
    let association = schema.association_table().unwrap_or_else(|| {
        panic!(
            "table `{}` has no association table; tags-joined fetch is only for taggable records",
            schema.table()
        )
    });

    format!(
        "WITH limited_records AS (SELECT {fields} FROM {table} WHERE account_id = $1 \
         ORDER BY updated_at DESC, id ASC OFFSET $2 LIMIT $3) \
         SELECT {record_fields}, {tag_fields} FROM limited_records lr \
         LEFT JOIN {association} ta ON lr.id = ta.record_id \
         LEFT JOIN {tags_table} t ON ta.tag_id = t.id \
         ORDER BY lr.updated_at DESC, lr.id ASC",
        fields = select_list(schema),
        table = schema.table(),
        record_fields = aliased_select_list(schema, "lr"),
        tag_fields = aliased_select_list(tags, "t"),
        association = association,
        tags_table = tags.table(),
    )
}

/// `INSERT INTO <table> (<create fields>) VALUES ($1..$n) RETURNING <fields>`
///
/// Returning the explicit select list (not `*`) pins the returned column
/// order to the ordinal decode targets.
pub fn insert(schema: &TableSchema) -> String {
    let create_fields = schema.create_fields();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        schema.table(),
        create_fields.join(", "),
        placeholders(1, create_fields.len()),
        select_list(schema)
    )
}

/// `UPDATE <table> SET <col = $3, ...>[, updated_at = DEFAULT]
///  WHERE id = $1 AND account_id = $2 RETURNING <fields>`
///
/// `updated_at` is always rendered as `= DEFAULT` (when the schema carries
/// timestamps), never bound to a caller value. A schema with no updatable
/// fields still yields a valid, degenerate statement.
pub fn update(schema: &TableSchema) -> String {
    let mut assignments: Vec<String> = schema
        .update_fields()
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{} = ${}", field, i + 3))
        .collect();
    if schema.has_timestamps() {
        assignments.push(format!("{UPDATED_AT_COLUMN} = DEFAULT"));
    }

    format!(
        "UPDATE {} SET {} WHERE id = $1 AND account_id = $2 RETURNING {}",
        schema.table(),
        assignments.join(", "),
        select_list(schema)
    )
}

/// `DELETE FROM <table> WHERE id = $1 AND account_id = $2`
pub fn delete(schema: &TableSchema) -> String {
    format!(
        "DELETE FROM {} WHERE id = $1 AND account_id = $2",
        schema.table()
    )
}

/// Insert wrapped in a `WITH new_record AS (...)` CTE that also links the
/// supplied tag ids in the same statement. Tag-id placeholders begin right
/// after the last create-field placeholder; zero tags degrades to the plain
/// insert (no CTE, no association insert).
#[derive(Debug, Clone)]
pub struct InsertWithTags {
    plain: String,
    left: String,
    right: String,
    first_tag_index: usize,
}

impl InsertWithTags {
    pub fn new(schema: &TableSchema, association: &'static str) -> Self {
        let plain = insert(schema);
        let left = format!(
            "WITH new_record AS ({plain}), tag_links AS \
             (INSERT INTO {association} (tag_id, record_id) VALUES "
        );
        let right = format!(") SELECT {} FROM new_record", select_list(schema));

        InsertWithTags {
            plain,
            left,
            right,
            first_tag_index: schema.create_fields().len(),
        }
    }

    pub fn render(&self, tag_count: usize) -> String {
        if tag_count == 0 {
            return self.plain.clone();
        }

        let values = (0..tag_count)
            .map(|i| {
                format!(
                    "(${}, (SELECT id FROM new_record))",
                    self.first_tag_index + i + 1
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}{}{}", self.left, values, self.right)
    }
}

/// The generated statements for one plain (non-taggable) record type,
/// built once at store construction.
#[derive(Debug, Clone)]
pub struct QueryHolder {
    pub select_single: String,
    pub select_many: String,
    pub select_many_paginated: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
}

impl QueryHolder {
    pub fn new(schema: &TableSchema) -> Self {
        QueryHolder {
            select_single: select_single(schema),
            select_many: select_many(schema, false),
            select_many_paginated: select_many(schema, true),
            insert: insert(schema),
            update: update(schema),
            delete: delete(schema),
        }
    }
}

/// The two tag-aware statements for taggable record types; the base CRUD
/// statements live in the wrapped plain store's [`QueryHolder`].
#[derive(Debug, Clone)]
pub struct TaggedQueryHolder {
    pub select_many_with_tags: String,
    pub insert_with_tags: InsertWithTags,
}

impl TaggedQueryHolder {
    pub fn new(schema: &TableSchema, tags: &TableSchema) -> Self {
        let association = schema.association_table().unwrap_or_else(|| {
            panic!(
                "table `{}` is registered as taggable but declares no association table",
                schema.table()
            )
        });

        TaggedQueryHolder {
            select_many_with_tags: select_many_with_tags(schema, tags),
            insert_with_tags: InsertWithTags::new(schema, association),
        }
    }
}
