//! Repository traits for data access
//!
//! These traits are the persistence port of the planner.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{Service, Song, SongUsage, Template};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Predicate for catalog listings; results are always ordered by song name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    /// Include disabled songs (admin catalog view)
    pub include_disabled: bool,
    pub seasonal_only: bool,
    /// Exact category match
    pub category: Option<String>,
    /// Substring over name, artist, category and publisher.
    /// Case sensitivity is whatever the store's comparison does.
    pub search: Option<String>,
}

impl SongFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            include_disabled: true,
            ..Self::default()
        }
    }
}

/// Repository for the song catalog
#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn insert(&self, song: &Song) -> Result<Song>;

    async fn update(&self, song: &Song) -> Result<Song>;

    /// Hard delete; returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Song>>;

    async fn list(&self, filter: &SongFilter) -> Result<Vec<Song>>;

    async fn count(&self) -> Result<u64>;
}

/// Repository for templates and their owned slots
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Insert a template together with its slots
    async fn insert(&self, template: &Template) -> Result<Template>;

    /// Write name, description and active flag; slots are not touched
    async fn update_metadata(&self, template: &Template) -> Result<Template>;

    /// Write metadata and swap the whole slot set in one transaction; on
    /// failure the stored template is left as it was
    async fn replace_structure(&self, template: &Template) -> Result<()>;

    /// Find a template with its slots ordered by ordinal position
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>>;

    /// Templates ordered by name
    async fn list(&self, active_only: bool) -> Result<Vec<Template>>;

    /// Delete a template and its slots
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn count(&self) -> Result<u64>;
}

/// Repository for services and their owned instances
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Insert a service together with its instances
    async fn insert(&self, service: &Service) -> Result<Service>;

    /// Write service fields and the person/song/notes fields of its instances.
    /// Instances are matched by id; none are added or removed.
    async fn update(&self, service: &Service) -> Result<Service>;

    /// Delete a service and its instances
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Find a service with its instances ordered by position
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>>;

    /// All services, most recent date first
    async fn list_all(&self) -> Result<Vec<Service>>;

    /// Services dated within `[start, end]`, earliest first
    async fn list_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Service>>;

    /// Number of services that reference the template
    async fn count_by_template(&self, template_id: Uuid) -> Result<u64>;

    /// Every instance with a non-blank song title, paired with its service date
    async fn song_usage(&self) -> Result<Vec<SongUsage>>;
}
