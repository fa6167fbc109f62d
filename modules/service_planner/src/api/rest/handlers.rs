//! HTTP request handlers - thin layer that delegates to the planner facade

use super::{
    dto::*,
    error::{map_domain_error, Problem},
    mapper::service_update,
};
use crate::contract::{CallerIdentity, PlannerError};
use crate::domain::Planner;
use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the caller identity set by the upstream identity provider
pub const USER_ID_HEADER: &str = "x-user-id";

fn caller(headers: &HeaderMap) -> CallerIdentity {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(CallerIdentity::user)
        .unwrap_or_default()
}

// ===== Song Handlers =====

/// Query parameters for listing songs
#[derive(Debug, Deserialize)]
pub struct ListSongsQuery {
    /// Include disabled songs (admin view)
    #[serde(default)]
    pub include_disabled: bool,
    #[serde(default)]
    pub seasonal: bool,
    pub category: Option<String>,
    /// Substring over name, artist, category and publisher
    pub search: Option<String>,
}

/// List songs; filters are applied in precedence search > category > seasonal
pub async fn list_songs(
    Extension(planner): Extension<Arc<Planner>>,
    Query(query): Query<ListSongsQuery>,
) -> Result<Json<SongsListResponse>, Problem> {
    let songs = if let Some(term) = query.search {
        planner.search_songs(&term).await
    } else if let Some(category) = query.category {
        planner.songs_by_category(&category).await
    } else if query.seasonal {
        planner.list_seasonal_songs().await
    } else if query.include_disabled {
        planner.list_songs().await
    } else {
        planner.list_active_songs().await
    }
    .map_err(map_domain_error)?;

    let items: Vec<SongDto> = songs.into_iter().map(|s| s.into()).collect();
    let total = items.len();

    Ok(Json(SongsListResponse { items, total }))
}

pub async fn get_song(
    Extension(planner): Extension<Arc<Planner>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SongDto>, Problem> {
    let song = planner.get_song(id).await.map_err(map_domain_error)?;
    Ok(Json(song.into()))
}

pub async fn create_song(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Json(req): Json<SongRequest>,
) -> Result<(StatusCode, Json<SongDto>), Problem> {
    let song = planner
        .create_song(&caller(&headers), req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(song.into())))
}

pub async fn update_song(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<SongRequest>,
) -> Result<Json<SongDto>, Problem> {
    let song = planner
        .update_song(&caller(&headers), id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(song.into()))
}

pub async fn set_song_disabled(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<SongDisabledRequest>,
) -> Result<Json<SongDto>, Problem> {
    let song = planner
        .set_song_disabled(&caller(&headers), id, req.disabled)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(song.into()))
}

pub async fn delete_song(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    planner
        .delete_song(&caller(&headers), id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Bulk import from raw comma-delimited text
pub async fn import_songs(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ImportResponse>, Problem> {
    let songs = planner
        .import_songs(&caller(&headers), &body)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<SongDto> = songs.into_iter().map(|s| s.into()).collect();
    Ok(Json(ImportResponse {
        imported: items.len(),
        items,
    }))
}

pub async fn song_rotation(
    Extension(planner): Extension<Arc<Planner>>,
) -> Result<Json<RotationResponse>, Problem> {
    let entries = planner.song_rotation().await.map_err(map_domain_error)?;
    Ok(Json(RotationResponse {
        items: entries.into_iter().map(|e| e.into()).collect(),
    }))
}

pub async fn song_categories(
    Extension(planner): Extension<Arc<Planner>>,
) -> Result<Json<CategoriesResponse>, Problem> {
    let items = planner.song_categories().await.map_err(map_domain_error)?;
    Ok(Json(CategoriesResponse { items }))
}

#[derive(Debug, Deserialize)]
pub struct LastPlayedQuery {
    pub title: String,
}

pub async fn last_played(
    Extension(planner): Extension<Arc<Planner>>,
    Query(query): Query<LastPlayedQuery>,
) -> Result<Json<LastPlayedResponse>, Problem> {
    let last_played = planner
        .last_played(&query.title)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(LastPlayedResponse {
        title: query.title,
        last_played,
    }))
}

// ===== Template Handlers =====

#[derive(Debug, Deserialize)]
pub struct ListTemplatesQuery {
    #[serde(default)]
    pub active_only: bool,
}

pub async fn list_templates(
    Extension(planner): Extension<Arc<Planner>>,
    Query(query): Query<ListTemplatesQuery>,
) -> Result<Json<TemplatesListResponse>, Problem> {
    let templates = planner
        .list_templates(query.active_only)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<TemplateDto> = templates.into_iter().map(|t| t.into()).collect();
    let total = items.len();

    Ok(Json(TemplatesListResponse { items, total }))
}

pub async fn get_template(
    Extension(planner): Extension<Arc<Planner>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateDto>, Problem> {
    let template = planner.get_template(id).await.map_err(map_domain_error)?;
    Ok(Json(template.into()))
}

pub async fn template_usage(
    Extension(planner): Extension<Arc<Planner>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateUsageResponse>, Problem> {
    // 404 for unknown templates rather than a plain "not in use"
    planner.get_template(id).await.map_err(map_domain_error)?;
    let in_use = planner
        .is_template_in_use(id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(TemplateUsageResponse {
        template_id: id,
        in_use,
    }))
}

pub async fn create_template(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Json(req): Json<TemplateRequest>,
) -> Result<(StatusCode, Json<TemplateDto>), Problem> {
    let template = planner
        .create_template(&caller(&headers), req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(template.into())))
}

pub async fn update_template(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<TemplateDto>, Problem> {
    let template = planner
        .update_template(&caller(&headers), id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(template.into()))
}

pub async fn set_template_active(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<TemplateActiveRequest>,
) -> Result<Json<TemplateDto>, Problem> {
    let template = planner
        .set_template_active(&caller(&headers), id, req.is_active)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(template.into()))
}

pub async fn delete_template(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    planner
        .delete_template(&caller(&headers), id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Service Handlers =====

/// Query parameters for listing services; give both bounds for a date range
#[derive(Debug, Deserialize)]
pub struct ListServicesQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

pub async fn list_services(
    Extension(planner): Extension<Arc<Planner>>,
    Query(query): Query<ListServicesQuery>,
) -> Result<Json<ServicesListResponse>, Problem> {
    let services = match (query.start, query.end) {
        (Some(start), Some(end)) => planner.services_in_range(start, end).await,
        (None, None) => planner.list_services().await,
        (Some(_), None) => Err(PlannerError::validation("end", "required with start")),
        (None, Some(_)) => Err(PlannerError::validation("start", "required with end")),
    }
    .map_err(map_domain_error)?;

    let items: Vec<ServiceDto> = services.into_iter().map(|s| s.into()).collect();
    let total = items.len();

    Ok(Json(ServicesListResponse { items, total }))
}

pub async fn get_service(
    Extension(planner): Extension<Arc<Planner>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceDto>, Problem> {
    let service = planner.get_service(id).await.map_err(map_domain_error)?;
    Ok(Json(service.into()))
}

pub async fn create_service(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceDto>), Problem> {
    let service = planner
        .create_service(&caller(&headers), req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(service.into())))
}

pub async fn update_service(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<Json<ServiceDto>, Problem> {
    let service = planner
        .update_service(&caller(&headers), service_update(id, req))
        .await
        .map_err(map_domain_error)?;

    Ok(Json(service.into()))
}

pub async fn delete_service(
    Extension(planner): Extension<Arc<Planner>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    planner
        .delete_service(&caller(&headers), id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}
