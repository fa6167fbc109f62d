//! Route registration and OpenAPI document

use super::{dto::*, handlers};
use crate::domain::Planner;
use axum::{
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// OpenAPI components of the planner REST surface
#[derive(OpenApi)]
#[openapi(
    info(title = "Service Planner API"),
    components(schemas(
        SongDto,
        SongRequest,
        SongDisabledRequest,
        SongsListResponse,
        ImportResponse,
        RotationEntryDto,
        RotationResponse,
        CategoriesResponse,
        LastPlayedResponse,
        EventKindDto,
        EventSlotDto,
        TemplateDto,
        SlotRequest,
        TemplateRequest,
        TemplateActiveRequest,
        TemplateUsageResponse,
        TemplatesListResponse,
        EventInstanceDto,
        ServiceDto,
        InstanceRequest,
        CreateServiceRequest,
        InstanceUpdateRequest,
        UpdateServiceRequest,
        ServicesListResponse,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Register all REST routes on `router`
pub fn register_routes(router: Router, planner: Arc<Planner>) -> Router {
    router
        // Song catalog
        .route("/songs", get(handlers::list_songs).post(handlers::create_song))
        .route("/songs/import", post(handlers::import_songs))
        .route("/songs/rotation", get(handlers::song_rotation))
        .route("/songs/categories", get(handlers::song_categories))
        .route("/songs/last-played", get(handlers::last_played))
        .route(
            "/songs/{id}",
            get(handlers::get_song)
                .put(handlers::update_song)
                .delete(handlers::delete_song),
        )
        .route("/songs/{id}/disabled", put(handlers::set_song_disabled))
        // Templates
        .route(
            "/templates",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route(
            "/templates/{id}",
            get(handlers::get_template)
                .put(handlers::update_template)
                .delete(handlers::delete_template),
        )
        .route("/templates/{id}/usage", get(handlers::template_usage))
        .route("/templates/{id}/active", put(handlers::set_template_active))
        // Services
        .route(
            "/services",
            get(handlers::list_services).post(handlers::create_service),
        )
        .route(
            "/services/{id}",
            get(handlers::get_service)
                .put(handlers::update_service)
                .delete(handlers::delete_service),
        )
        .route("/openapi.json", get(openapi_json))
        // Add planner as extension for handlers
        .layer(Extension(planner))
}
