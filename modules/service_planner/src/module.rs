//! Module composition root
//!
//! Wires repositories, the event publisher and the planner facade over a
//! database connection, and exposes the REST router and native client.

use crate::api::native::NativeClient;
use crate::bootstrap::{seed_sample_data, SeedReport};
use crate::config::Config;
use crate::contract::PlannerApi;
use crate::domain::{
    EventPublisher, NoOpEventPublisher, Planner, ServiceRepository, SongRepository,
    TemplateRepository, TracingEventPublisher,
};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{SeaOrmServiceRepository, SeaOrmSongRepository, SeaOrmTemplateRepository};
use anyhow::Result;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Service planner module
pub struct ServicePlannerModule {
    config: Config,
    songs: Arc<dyn SongRepository>,
    templates: Arc<dyn TemplateRepository>,
    planner: Arc<Planner>,
}

impl ServicePlannerModule {
    /// Build the module over an already-migrated connection
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let conn = Arc::new(db);

        let songs: Arc<dyn SongRepository> = Arc::new(SeaOrmSongRepository::new(conn.clone()));
        let templates: Arc<dyn TemplateRepository> =
            Arc::new(SeaOrmTemplateRepository::new(conn.clone()));
        let services: Arc<dyn ServiceRepository> = Arc::new(SeaOrmServiceRepository::new(conn));

        Self::from_parts(config, songs, templates, services)
    }

    /// Build the module over arbitrary repository implementations
    pub fn from_parts(
        config: Config,
        songs: Arc<dyn SongRepository>,
        templates: Arc<dyn TemplateRepository>,
        services: Arc<dyn ServiceRepository>,
    ) -> Self {
        let event_publisher: Arc<dyn EventPublisher> = if config.publish_events {
            Arc::new(TracingEventPublisher)
        } else {
            Arc::new(NoOpEventPublisher)
        };

        let planner = Arc::new(Planner::new(
            songs.clone(),
            templates.clone(),
            services,
            event_publisher,
            &config,
        ));

        tracing::info!(publish_events = config.publish_events, "Service planner initialized");
        Self {
            config,
            songs,
            templates,
            planner,
        }
    }

    /// Run schema migrations
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None).await?;
        tracing::info!("Service planner migrations completed");
        Ok(())
    }

    /// Seed sample data when enabled and the database is empty
    pub async fn bootstrap(&self) -> Result<SeedReport> {
        if !self.config.seed_sample_data {
            return Ok(SeedReport::default());
        }
        seed_sample_data(self.songs.as_ref(), self.templates.as_ref()).await
    }

    pub fn planner(&self) -> Arc<Planner> {
        self.planner.clone()
    }

    /// In-process client for other modules
    pub fn client(&self) -> Arc<dyn PlannerApi> {
        Arc::new(NativeClient::new(self.planner.clone()))
    }

    /// REST routes with the planner attached
    pub fn router(&self) -> axum::Router {
        tracing::info!("Registering service planner REST routes");
        crate::api::rest::register_routes(axum::Router::new(), self.planner.clone())
    }
}
