//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to interact with the planner.
//! NO HTTP - direct function calls for performance.

use super::{
    error::PlannerError,
    model::{CallerIdentity, RotationEntry, Service, Song, SongRecord, Template, TemplateDraft},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Service planner API for inter-module communication
#[async_trait]
pub trait PlannerApi: Send + Sync {
    // ===== Catalog =====

    /// Enabled songs ordered by name
    async fn list_active_songs(&self) -> Result<Vec<Song>, PlannerError>;

    /// Enabled songs matching a substring of name, artist, category or publisher
    async fn search_songs(&self, term: &str) -> Result<Vec<Song>, PlannerError>;

    async fn get_song(&self, id: Uuid) -> Result<Song, PlannerError>;

    async fn create_song(
        &self,
        caller: &CallerIdentity,
        record: SongRecord,
    ) -> Result<Song, PlannerError>;

    /// Parse delimited text and persist every accepted row
    async fn import_songs(
        &self,
        caller: &CallerIdentity,
        raw: &str,
    ) -> Result<Vec<Song>, PlannerError>;

    /// Enabled songs, least recently scheduled first
    async fn song_rotation(&self) -> Result<Vec<RotationEntry>, PlannerError>;

    // ===== Templates =====

    async fn get_template(&self, id: Uuid) -> Result<Template, PlannerError>;

    async fn is_template_in_use(&self, id: Uuid) -> Result<bool, PlannerError>;

    async fn create_template(
        &self,
        caller: &CallerIdentity,
        draft: TemplateDraft,
    ) -> Result<Template, PlannerError>;

    /// Edit a template; slot changes are dropped while the template is in use
    async fn update_template(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
        draft: TemplateDraft,
    ) -> Result<Template, PlannerError>;

    // ===== Services =====

    async fn get_service(&self, id: Uuid) -> Result<Service, PlannerError>;

    async fn services_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Service>, PlannerError>;

    async fn create_service(
        &self,
        caller: &CallerIdentity,
        service: Service,
    ) -> Result<Service, PlannerError>;

    async fn update_service(
        &self,
        caller: &CallerIdentity,
        service: Service,
    ) -> Result<Service, PlannerError>;

    async fn delete_service(&self, caller: &CallerIdentity, id: Uuid) -> Result<(), PlannerError>;
}
