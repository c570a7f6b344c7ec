pub mod health;

use axum::{
    routing::get,
    Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::records::{
    ApplicationPreset, ApplicationSection, ResumePreset, ResumeSection,
};
use crate::models::ValidateBody;
use crate::records::{handlers as records, StoreAccess};
use crate::state::AppState;
use crate::tags::handlers as tags;

/// The five standard routes for one taggable record type.
fn record_routes<T>() -> Router<AppState>
where
    T: StoreAccess + Serialize,
    T::Body: DeserializeOwned + ValidateBody + 'static,
{
    Router::new()
        .route(
            "/",
            get(records::list_records::<T>).post(records::create_record::<T>),
        )
        .route(
            "/:id",
            get(records::get_record::<T>)
                .put(records::update_record::<T>)
                .delete(records::delete_record::<T>),
        )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/api/v1/tags/:id",
            get(tags::get_tag).put(tags::update_tag).delete(tags::delete_tag),
        )
        .nest(
            "/api/v1/applications/presets",
            record_routes::<ApplicationPreset>(),
        )
        .nest(
            "/api/v1/applications/sections",
            record_routes::<ApplicationSection>(),
        )
        .nest("/api/v1/resumes/presets", record_routes::<ResumePreset>())
        .nest("/api/v1/resumes/sections", record_routes::<ResumeSection>())
        .with_state(state)
}
