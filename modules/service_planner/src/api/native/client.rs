//! Native client implementation - wraps the planner facade for in-process calls

use crate::contract::{
    CallerIdentity, PlannerApi, PlannerError, RotationEntry, Service, Song, SongRecord, Template,
    TemplateDraft,
};
use crate::domain::Planner;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

/// Native client that calls the planner directly, without HTTP
#[derive(Clone)]
pub struct NativeClient {
    planner: Arc<Planner>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(planner: Arc<Planner>) -> Self {
        Self { planner }
    }
}

#[async_trait]
impl PlannerApi for NativeClient {
    async fn list_active_songs(&self) -> Result<Vec<Song>, PlannerError> {
        self.planner.list_active_songs().await
    }

    async fn search_songs(&self, term: &str) -> Result<Vec<Song>, PlannerError> {
        self.planner.search_songs(term).await
    }

    async fn get_song(&self, id: Uuid) -> Result<Song, PlannerError> {
        self.planner.get_song(id).await
    }

    async fn create_song(
        &self,
        caller: &CallerIdentity,
        record: SongRecord,
    ) -> Result<Song, PlannerError> {
        self.planner.create_song(caller, record).await
    }

    async fn import_songs(
        &self,
        caller: &CallerIdentity,
        raw: &str,
    ) -> Result<Vec<Song>, PlannerError> {
        self.planner.import_songs(caller, raw).await
    }

    async fn song_rotation(&self) -> Result<Vec<RotationEntry>, PlannerError> {
        self.planner.song_rotation().await
    }

    async fn get_template(&self, id: Uuid) -> Result<Template, PlannerError> {
        self.planner.get_template(id).await
    }

    async fn is_template_in_use(&self, id: Uuid) -> Result<bool, PlannerError> {
        self.planner.is_template_in_use(id).await
    }

    async fn create_template(
        &self,
        caller: &CallerIdentity,
        draft: TemplateDraft,
    ) -> Result<Template, PlannerError> {
        self.planner.create_template(caller, draft).await
    }

    async fn update_template(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
        draft: TemplateDraft,
    ) -> Result<Template, PlannerError> {
        self.planner.update_template(caller, id, draft).await
    }

    async fn get_service(&self, id: Uuid) -> Result<Service, PlannerError> {
        self.planner.get_service(id).await
    }

    async fn services_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Service>, PlannerError> {
        self.planner.services_in_range(start, end).await
    }

    async fn create_service(
        &self,
        caller: &CallerIdentity,
        service: Service,
    ) -> Result<Service, PlannerError> {
        self.planner.create_service(caller, service).await
    }

    async fn update_service(
        &self,
        caller: &CallerIdentity,
        service: Service,
    ) -> Result<Service, PlannerError> {
        self.planner.update_service(caller, service).await
    }

    async fn delete_service(&self, caller: &CallerIdentity, id: Uuid) -> Result<(), PlannerError> {
        self.planner.delete_service(caller, id).await
    }
}
