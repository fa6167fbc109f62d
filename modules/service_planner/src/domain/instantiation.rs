//! Service instantiation and reconciliation
//!
//! A service captures a snapshot of its template's slots as event instances at
//! creation time. Later edits to the service merge field values into those
//! instances by id; they never rebuild them from the template.

use crate::contract::{EventInstance, Service, Template};
use uuid::Uuid;

/// Where a new service's instances came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceSource {
    /// Caller supplied the instances; only the owning-service id was stamped
    Supplied,
    /// One instance synthesized per template slot
    Template,
    /// Template not found; the service carries no derived instances
    MissingTemplate,
}

/// Materialize the instances of a new service.
///
/// A non-empty `service.instances` is trusted as-is apart from the owning-service
/// id (and a fresh id for instances submitted without one). An empty list is
/// filled with one blank instance per template slot in ordinal order. The two
/// paths are exclusive.
pub fn instantiate(mut service: Service, template: Option<&Template>) -> (Service, InstanceSource) {
    let service_id = service.id;

    if !service.instances.is_empty() {
        for instance in &mut service.instances {
            instance.service_id = service_id;
            if instance.id.is_nil() {
                instance.id = Uuid::new_v4();
            }
        }
        return (service, InstanceSource::Supplied);
    }

    let Some(template) = template else {
        return (service, InstanceSource::MissingTemplate);
    };

    service.instances = template
        .ordered_slots()
        .into_iter()
        .enumerate()
        .map(|(position, slot)| EventInstance {
            id: Uuid::new_v4(),
            service_id,
            slot_id: slot.id,
            position: position as i32,
            person_name: Some(String::new()),
            song_title: Some(String::new()),
            notes: Some(String::new()),
        })
        .collect();

    (service, InstanceSource::Template)
}

/// Merge an edited service into the stored one.
///
/// Name and date are copied. Person, song and notes are copied onto existing
/// instances with a matching id. Unknown incoming instances are ignored and
/// unmatched existing instances are left alone; nothing is added, removed,
/// reordered or re-pointed at another slot.
pub fn reconcile(mut existing: Service, incoming: &Service) -> Service {
    existing.name = incoming.name.clone();
    existing.service_date = incoming.service_date;

    for update in &incoming.instances {
        if let Some(instance) = existing.instances.iter_mut().find(|i| i.id == update.id) {
            instance.person_name = update.person_name.clone();
            instance.song_title = update.song_title.clone();
            instance.notes = update.notes.clone();
        }
    }

    existing
}
