//! Domain events for the service planner
//!
//! Events are emitted after a mutation has been persisted. Delivery is best
//! effort: a failing publisher is logged and never fails the mutation.

use crate::contract::{CallerIdentity, Service, Template};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain event types for the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlannerEvent {
    TemplateCreated(TemplateChangedEvent),
    /// Template edited; `structure_replaced` is false when the edit was narrowed
    TemplateUpdated(TemplateChangedEvent),
    TemplateDeleted(TemplateChangedEvent),
    ServiceCreated(ServiceCreatedEvent),
    ServiceUpdated(ServiceChangedEvent),
    ServiceDeleted(ServiceChangedEvent),
    SongsImported(SongsImportedEvent),
}

/// Event data for template lifecycle changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateChangedEvent {
    pub template_id: Uuid,
    pub name: String,
    /// Whether the slot sequence was written
    pub structure_replaced: bool,
    pub timestamp: DateTime<Utc>,
    /// User who performed the action (if available)
    pub user_id: Option<String>,
}

/// Event data for service creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCreatedEvent {
    pub service_id: Uuid,
    pub template_id: Uuid,
    pub service_date: chrono::NaiveDate,
    pub instance_count: usize,
    /// Instances were synthesized from the template rather than supplied
    pub derived_from_template: bool,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
}

/// Event data for service edits and deletions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChangedEvent {
    pub service_id: Uuid,
    pub service_date: chrono::NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
}

/// Event data for a bulk import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongsImportedEvent {
    pub count: usize,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: PlannerEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: PlannerEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Publisher that writes each event as a JSON log line
pub struct TracingEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: PlannerEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(target: "service_planner::events", event = %payload, "Planner event");
        Ok(())
    }
}

impl PlannerEvent {
    pub fn template_created(template: &Template, caller: &CallerIdentity) -> Self {
        PlannerEvent::TemplateCreated(TemplateChangedEvent::new(template, true, caller))
    }

    pub fn template_updated(
        template: &Template,
        structure_replaced: bool,
        caller: &CallerIdentity,
    ) -> Self {
        PlannerEvent::TemplateUpdated(TemplateChangedEvent::new(
            template,
            structure_replaced,
            caller,
        ))
    }

    pub fn template_deleted(template: &Template, caller: &CallerIdentity) -> Self {
        PlannerEvent::TemplateDeleted(TemplateChangedEvent::new(template, true, caller))
    }

    pub fn service_created(
        service: &Service,
        derived_from_template: bool,
        caller: &CallerIdentity,
    ) -> Self {
        PlannerEvent::ServiceCreated(ServiceCreatedEvent {
            service_id: service.id,
            template_id: service.template_id,
            service_date: service.service_date,
            instance_count: service.instances.len(),
            derived_from_template,
            timestamp: Utc::now(),
            user_id: caller.user_id.clone(),
        })
    }

    pub fn service_updated(service: &Service, caller: &CallerIdentity) -> Self {
        PlannerEvent::ServiceUpdated(ServiceChangedEvent::new(service, caller))
    }

    pub fn service_deleted(service: &Service, caller: &CallerIdentity) -> Self {
        PlannerEvent::ServiceDeleted(ServiceChangedEvent::new(service, caller))
    }

    pub fn songs_imported(count: usize, caller: &CallerIdentity) -> Self {
        PlannerEvent::SongsImported(SongsImportedEvent {
            count,
            timestamp: Utc::now(),
            user_id: caller.user_id.clone(),
        })
    }
}

impl TemplateChangedEvent {
    fn new(template: &Template, structure_replaced: bool, caller: &CallerIdentity) -> Self {
        Self {
            template_id: template.id,
            name: template.name.clone(),
            structure_replaced,
            timestamp: Utc::now(),
            user_id: caller.user_id.clone(),
        }
    }
}

impl ServiceChangedEvent {
    fn new(service: &Service, caller: &CallerIdentity) -> Self {
        Self {
            service_id: service.id,
            service_date: service.service_date,
            timestamp: Utc::now(),
            user_id: caller.user_id.clone(),
        }
    }
}
