pub mod handlers;

use crate::models::records::{
    ApplicationPreset, ApplicationSection, ResumePreset, ResumeSection,
};
use crate::state::Stores;
use crate::store::{TableRecord, TaggedRecordStore};

/// Selects the store instance for a record type out of the shared state, so
/// one set of generic handlers serves every taggable entity.
pub trait StoreAccess: TableRecord {
    fn store(stores: &Stores) -> &TaggedRecordStore<Self>;
}

impl StoreAccess for ApplicationPreset {
    fn store(stores: &Stores) -> &TaggedRecordStore<Self> {
        &stores.application_presets
    }
}

impl StoreAccess for ApplicationSection {
    fn store(stores: &Stores) -> &TaggedRecordStore<Self> {
        &stores.application_sections
    }
}

impl StoreAccess for ResumePreset {
    fn store(stores: &Stores) -> &TaggedRecordStore<Self> {
        &stores.resume_presets
    }
}

impl StoreAccess for ResumeSection {
    fn store(stores: &Stores) -> &TaggedRecordStore<Self> {
        &stores.resume_sections
    }
}
