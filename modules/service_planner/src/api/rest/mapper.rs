//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract;
use uuid::Uuid;

// ===== Song conversions =====

impl From<contract::Song> for SongDto {
    fn from(song: contract::Song) -> Self {
        Self {
            id: song.id,
            name: song.name,
            key: song.key,
            song_select_id: song.song_select_id,
            seasonal: song.seasonal,
            speed: song.speed,
            publisher: song.publisher,
            artist: song.artist,
            category: song.category,
            notes: song.notes,
            disabled: song.disabled,
            created_at: song.created_at,
        }
    }
}

impl From<SongRequest> for contract::SongRecord {
    fn from(req: SongRequest) -> Self {
        let defaults = contract::SongRecord::with_defaults();
        Self {
            name: req.name,
            key: req.key,
            song_select_id: req.song_select_id,
            seasonal: req.seasonal,
            speed: req.speed.unwrap_or(defaults.speed),
            publisher: req.publisher.unwrap_or(defaults.publisher),
            artist: req.artist.unwrap_or(defaults.artist),
            category: req.category,
            notes: req.notes,
            disabled: req.disabled,
        }
    }
}

impl From<contract::RotationEntry> for RotationEntryDto {
    fn from(entry: contract::RotationEntry) -> Self {
        Self {
            song: entry.song.into(),
            last_played: entry.last_played,
        }
    }
}

// ===== Template conversions =====

impl From<contract::EventKind> for EventKindDto {
    fn from(kind: contract::EventKind) -> Self {
        match kind {
            contract::EventKind::Speaker => EventKindDto::Speaker,
            contract::EventKind::Prayer => EventKindDto::Prayer,
            contract::EventKind::Communion => EventKindDto::Communion,
            contract::EventKind::Baptism => EventKindDto::Baptism,
            contract::EventKind::Song => EventKindDto::Song,
        }
    }
}

impl From<EventKindDto> for contract::EventKind {
    fn from(kind: EventKindDto) -> Self {
        match kind {
            EventKindDto::Speaker => contract::EventKind::Speaker,
            EventKindDto::Prayer => contract::EventKind::Prayer,
            EventKindDto::Communion => contract::EventKind::Communion,
            EventKindDto::Baptism => contract::EventKind::Baptism,
            EventKindDto::Song => contract::EventKind::Song,
        }
    }
}

impl From<&contract::EventSlot> for EventSlotDto {
    fn from(slot: &contract::EventSlot) -> Self {
        Self {
            id: slot.id,
            kind: slot.kind.into(),
            title: slot.title.clone(),
            order: slot.order,
        }
    }
}

impl From<contract::Template> for TemplateDto {
    fn from(template: contract::Template) -> Self {
        let slots = template
            .ordered_slots()
            .into_iter()
            .map(EventSlotDto::from)
            .collect();
        Self {
            id: template.id,
            name: template.name,
            description: template.description,
            is_active: template.is_active,
            created_at: template.created_at,
            slots,
        }
    }
}

impl From<TemplateRequest> for contract::TemplateDraft {
    fn from(req: TemplateRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            slots: req
                .slots
                .into_iter()
                .map(|slot| contract::SlotDraft {
                    kind: slot.kind.into(),
                    title: slot.title,
                    order: slot.order,
                })
                .collect(),
        }
    }
}

// ===== Service conversions =====

impl From<contract::EventInstance> for EventInstanceDto {
    fn from(instance: contract::EventInstance) -> Self {
        Self {
            id: instance.id,
            slot_id: instance.slot_id,
            position: instance.position,
            person_name: instance.person_name,
            song_title: instance.song_title,
            notes: instance.notes,
        }
    }
}

impl From<contract::Service> for ServiceDto {
    fn from(service: contract::Service) -> Self {
        Self {
            id: service.id,
            name: service.name,
            service_date: service.service_date,
            template_id: service.template_id,
            is_seasonal: service.is_seasonal,
            instances: service.instances.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CreateServiceRequest> for contract::Service {
    fn from(req: CreateServiceRequest) -> Self {
        Self {
            // assigned by the planner
            id: Uuid::nil(),
            name: req.name,
            service_date: req.service_date,
            template_id: req.template_id,
            is_seasonal: req.is_seasonal,
            instances: req
                .instances
                .into_iter()
                .map(|instance| contract::EventInstance {
                    id: instance.id.unwrap_or_else(Uuid::nil),
                    service_id: Uuid::nil(),
                    slot_id: instance.slot_id,
                    position: instance.position,
                    person_name: instance.person_name,
                    song_title: instance.song_title,
                    notes: instance.notes,
                })
                .collect(),
        }
    }
}

/// Build the incoming side of a service merge.
///
/// Only name, date and per-instance field values are read by the merge; the
/// remaining fields are placeholders.
pub fn service_update(id: Uuid, req: UpdateServiceRequest) -> contract::Service {
    contract::Service {
        id,
        name: req.name,
        service_date: req.service_date,
        template_id: Uuid::nil(),
        is_seasonal: false,
        instances: req
            .instances
            .into_iter()
            .map(|instance| contract::EventInstance {
                id: instance.id,
                service_id: id,
                slot_id: Uuid::nil(),
                position: 0,
                person_name: instance.person_name,
                song_title: instance.song_title,
                notes: instance.notes,
            })
            .collect(),
    }
}
