use std::sync::Arc;

use sqlx::PgPool;

use crate::models::records::{
    ApplicationPreset, ApplicationSection, ResumePreset, ResumeSection,
};
use crate::models::tag::Tag;
use crate::store::{RecordStore, TaggedRecordStore};

/// One store per registered record type, constructed once at startup so the
/// generated SQL is built exactly once per type.
pub struct Stores {
    pub tags: RecordStore<Tag>,
    pub application_presets: TaggedRecordStore<ApplicationPreset>,
    pub application_sections: TaggedRecordStore<ApplicationSection>,
    pub resume_presets: TaggedRecordStore<ResumePreset>,
    pub resume_sections: TaggedRecordStore<ResumeSection>,
}

impl Stores {
    pub fn new(pool: &PgPool) -> Self {
        Stores {
            tags: RecordStore::new(pool.clone()),
            application_presets: TaggedRecordStore::new(pool.clone()),
            application_sections: TaggedRecordStore::new(pool.clone()),
            resume_presets: TaggedRecordStore::new(pool.clone()),
            resume_sections: TaggedRecordStore::new(pool.clone()),
        }
    }
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub stores: Arc<Stores>,
}
