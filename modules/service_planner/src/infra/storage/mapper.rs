//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{instance, service, slot, song, template};
use crate::contract::{EventInstance, EventKind, EventSlot, Service, Song, Template};
use sea_orm::ActiveValue::Set;

// ===== Song Conversions =====

impl From<song::Model> for Song {
    fn from(entity: song::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            key: entity.key,
            song_select_id: entity.song_select_id,
            seasonal: entity.seasonal,
            speed: entity.speed,
            publisher: entity.publisher,
            artist: entity.artist,
            category: entity.category,
            notes: entity.notes,
            disabled: entity.disabled,
            created_at: entity.created_at,
        }
    }
}

impl From<&Song> for song::ActiveModel {
    fn from(model: &Song) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            key: Set(model.key.clone()),
            song_select_id: Set(model.song_select_id),
            seasonal: Set(model.seasonal),
            speed: Set(model.speed.clone()),
            publisher: Set(model.publisher.clone()),
            artist: Set(model.artist.clone()),
            category: Set(model.category.clone()),
            notes: Set(model.notes.clone()),
            disabled: Set(model.disabled),
            created_at: Set(model.created_at),
        }
    }
}

// ===== Template Conversions =====

impl TryFrom<slot::Model> for EventSlot {
    type Error = anyhow::Error;

    fn try_from(entity: slot::Model) -> Result<Self, Self::Error> {
        let kind = EventKind::parse(&entity.kind)
            .ok_or_else(|| anyhow::anyhow!("Unknown event kind '{}' on slot {}", entity.kind, entity.id))?;

        Ok(Self {
            id: entity.id,
            kind,
            title: entity.title,
            order: entity.sort_order,
            template_id: entity.template_id,
        })
    }
}

impl From<&EventSlot> for slot::ActiveModel {
    fn from(model: &EventSlot) -> Self {
        Self {
            id: Set(model.id),
            template_id: Set(model.template_id),
            kind: Set(model.kind.as_str().to_string()),
            title: Set(model.title.clone()),
            sort_order: Set(model.order),
        }
    }
}

/// Assemble a template from its row and slot rows
pub fn template_from_parts(
    entity: template::Model,
    slots: Vec<slot::Model>,
) -> anyhow::Result<Template> {
    let slots = slots
        .into_iter()
        .map(EventSlot::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Template {
        id: entity.id,
        name: entity.name,
        description: entity.description,
        is_active: entity.is_active,
        created_at: entity.created_at,
        slots,
    })
}

impl From<&Template> for template::ActiveModel {
    fn from(model: &Template) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            description: Set(model.description.clone()),
            is_active: Set(model.is_active),
            created_at: Set(model.created_at),
        }
    }
}

// ===== Service Conversions =====

impl From<instance::Model> for EventInstance {
    fn from(entity: instance::Model) -> Self {
        Self {
            id: entity.id,
            service_id: entity.service_id,
            slot_id: entity.slot_id,
            position: entity.position,
            person_name: entity.person_name,
            song_title: entity.song_title,
            notes: entity.notes,
        }
    }
}

impl From<&EventInstance> for instance::ActiveModel {
    fn from(model: &EventInstance) -> Self {
        Self {
            id: Set(model.id),
            service_id: Set(model.service_id),
            slot_id: Set(model.slot_id),
            position: Set(model.position),
            person_name: Set(model.person_name.clone()),
            song_title: Set(model.song_title.clone()),
            notes: Set(model.notes.clone()),
        }
    }
}

/// Assemble a service from its row and instance rows
pub fn service_from_parts(entity: service::Model, instances: Vec<instance::Model>) -> Service {
    Service {
        id: entity.id,
        name: entity.name,
        service_date: entity.service_date,
        template_id: entity.template_id,
        is_seasonal: entity.is_seasonal,
        instances: instances.into_iter().map(EventInstance::from).collect(),
    }
}

impl From<&Service> for service::ActiveModel {
    fn from(model: &Service) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            service_date: Set(model.service_date),
            template_id: Set(model.template_id),
            is_seasonal: Set(model.is_seasonal),
        }
    }
}
