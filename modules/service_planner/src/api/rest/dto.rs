//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Song DTOs =====

/// Song response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SongDto {
    pub id: Uuid,

    #[schema(example = "Amazing Grace")]
    pub name: String,

    /// Musical key
    #[schema(example = "G")]
    pub key: Option<String>,

    /// SongSelect / CCLI catalog number
    #[schema(example = 22025)]
    pub song_select_id: Option<i32>,

    pub seasonal: bool,

    #[schema(example = "Slow")]
    pub speed: String,

    pub publisher: String,

    pub artist: String,

    pub category: Option<String>,

    pub notes: Option<String>,

    pub disabled: bool,

    pub created_at: DateTime<Utc>,
}

/// Song create/update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SongRequest {
    pub name: String,

    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub song_select_id: Option<i32>,

    #[serde(default)]
    pub seasonal: bool,

    /// Defaults to "Medium"
    #[serde(default)]
    pub speed: Option<String>,

    /// Defaults to "Unknown"
    #[serde(default)]
    pub publisher: Option<String>,

    /// Defaults to "Unknown"
    #[serde(default)]
    pub artist: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub disabled: bool,
}

/// Enable or disable a song
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SongDisabledRequest {
    pub disabled: bool,
}

/// List of songs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SongsListResponse {
    pub items: Vec<SongDto>,

    pub total: usize,
}

/// Result of a bulk import
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    /// Number of songs inserted
    pub imported: usize,

    pub items: Vec<SongDto>,
}

/// Song with its staleness
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RotationEntryDto {
    pub song: SongDto,

    /// Most recent service date, absent when never scheduled
    pub last_played: Option<NaiveDate>,
}

/// Rotation view, least recently used first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RotationResponse {
    pub items: Vec<RotationEntryDto>,
}

/// Distinct categories of enabled songs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoriesResponse {
    pub items: Vec<String>,
}

/// Last scheduled date of a song title
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LastPlayedResponse {
    pub title: String,

    pub last_played: Option<NaiveDate>,
}

// ===== Template DTOs =====

/// Event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EventKindDto {
    Speaker,
    Prayer,
    Communion,
    Baptism,
    Song,
}

/// Template event slot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventSlotDto {
    pub id: Uuid,

    pub kind: EventKindDto,

    #[schema(example = "Opening Prayer")]
    pub title: String,

    /// Ordinal position within the template
    pub order: i32,
}

/// Template response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateDto {
    pub id: Uuid,

    #[schema(example = "Sunday Morning Service")]
    pub name: String,

    pub description: String,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    /// Slots in ordinal order
    pub slots: Vec<EventSlotDto>,
}

/// Slot as submitted with a template create/update
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SlotRequest {
    pub kind: EventKindDto,

    pub title: String,

    pub order: i32,
}

/// Template create/update request.
///
/// On update, `slots` is ignored while any service uses the template.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TemplateRequest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub slots: Vec<SlotRequest>,
}

/// Activate or deactivate a template
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TemplateActiveRequest {
    pub is_active: bool,
}

/// Whether any service references a template
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateUsageResponse {
    pub template_id: Uuid,

    pub in_use: bool,
}

/// List of templates
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplatesListResponse {
    pub items: Vec<TemplateDto>,

    pub total: usize,
}

// ===== Service DTOs =====

/// Filled-in slot of a service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventInstanceDto {
    pub id: Uuid,

    /// Template slot the instance was derived from
    pub slot_id: Uuid,

    pub position: i32,

    pub person_name: Option<String>,

    pub song_title: Option<String>,

    pub notes: Option<String>,
}

/// Service response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceDto {
    pub id: Uuid,

    #[schema(example = "Easter Sunday")]
    pub name: String,

    pub service_date: NaiveDate,

    pub template_id: Uuid,

    pub is_seasonal: bool,

    /// Instances ordered by position
    pub instances: Vec<EventInstanceDto>,
}

/// Pre-populated instance supplied on service creation
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InstanceRequest {
    /// Generated when absent
    #[serde(default)]
    pub id: Option<Uuid>,

    pub slot_id: Uuid,

    #[serde(default)]
    pub position: i32,

    #[serde(default)]
    pub person_name: Option<String>,

    #[serde(default)]
    pub song_title: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

/// Service create request.
///
/// With no `instances`, one blank instance per template slot is created.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    pub name: String,

    pub service_date: NaiveDate,

    pub template_id: Uuid,

    #[serde(default)]
    pub is_seasonal: bool,

    #[serde(default)]
    pub instances: Vec<InstanceRequest>,
}

/// Field values for an existing instance
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InstanceUpdateRequest {
    pub id: Uuid,

    #[serde(default)]
    pub person_name: Option<String>,

    #[serde(default)]
    pub song_title: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

/// Service update request; instances are matched by id
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateServiceRequest {
    pub name: String,

    pub service_date: NaiveDate,

    #[serde(default)]
    pub instances: Vec<InstanceUpdateRequest>,
}

/// List of services
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServicesListResponse {
    pub items: Vec<ServiceDto>,

    pub total: usize,
}

// Note: Conversion implementations live in mapper.rs
