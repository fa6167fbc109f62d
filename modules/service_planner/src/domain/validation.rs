//! Field validation for catalog, template and service input

use crate::contract::{EventInstance, PlannerError, Service, SongRecord, TemplateDraft};

const NAME_MAX: usize = 200;
const KEY_MAX: usize = 10;
const SPEED_MAX: usize = 50;
const CREDIT_MAX: usize = 100;
const NOTES_MAX: usize = 1000;
const DESCRIPTION_MAX: usize = 1000;

fn required(field: &str, value: &str, max: usize) -> Result<(), PlannerError> {
    if value.trim().is_empty() {
        return Err(PlannerError::validation(field, "must not be empty"));
    }
    max_len(field, value, max)
}

fn max_len(field: &str, value: &str, max: usize) -> Result<(), PlannerError> {
    if value.chars().count() > max {
        return Err(PlannerError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

fn optional(field: &str, value: Option<&str>, max: usize) -> Result<(), PlannerError> {
    match value {
        Some(value) => max_len(field, value, max),
        None => Ok(()),
    }
}

/// Validate a song before it is created, updated or imported
pub fn validate_song(record: &SongRecord) -> Result<(), PlannerError> {
    required("name", &record.name, NAME_MAX)?;
    optional("key", record.key.as_deref(), KEY_MAX)?;
    required("speed", &record.speed, SPEED_MAX)?;
    required("publisher", &record.publisher, CREDIT_MAX)?;
    required("artist", &record.artist, CREDIT_MAX)?;
    optional("category", record.category.as_deref(), CREDIT_MAX)?;
    optional("notes", record.notes.as_deref(), NOTES_MAX)?;
    Ok(())
}

/// Validate a template create or edit, slots included
pub fn validate_template(draft: &TemplateDraft) -> Result<(), PlannerError> {
    required("name", &draft.name, NAME_MAX)?;
    max_len("description", &draft.description, DESCRIPTION_MAX)?;
    for (index, slot) in draft.slots.iter().enumerate() {
        required(&format!("slots[{index}].title"), &slot.title, NAME_MAX)?;
    }
    Ok(())
}

/// Validate a service create or edit, instances included
pub fn validate_service(service: &Service) -> Result<(), PlannerError> {
    required("name", &service.name, NAME_MAX)?;
    for (index, instance) in service.instances.iter().enumerate() {
        validate_instance(index, instance)?;
    }
    Ok(())
}

fn validate_instance(index: usize, instance: &EventInstance) -> Result<(), PlannerError> {
    optional(
        &format!("instances[{index}].person_name"),
        instance.person_name.as_deref(),
        CREDIT_MAX,
    )?;
    optional(
        &format!("instances[{index}].song_title"),
        instance.song_title.as_deref(),
        NAME_MAX,
    )?;
    optional(
        &format!("instances[{index}].notes"),
        instance.notes.as_deref(),
        NOTES_MAX,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{EventKind, SlotDraft};
    use uuid::Uuid;

    fn field_of(err: PlannerError) -> String {
        match err {
            PlannerError::Validation { field, .. } => field,
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_song_name_required() {
        let record = SongRecord::with_defaults();
        assert_eq!(field_of(validate_song(&record).unwrap_err()), "name");

        let record = SongRecord {
            name: "   ".to_string(),
            ..SongRecord::with_defaults()
        };
        assert!(validate_song(&record).is_err());
    }

    #[test]
    fn test_song_length_limits() {
        let ok = SongRecord {
            name: "a".repeat(200),
            key: Some("C#m".to_string()),
            ..SongRecord::with_defaults()
        };
        assert!(validate_song(&ok).is_ok());

        let long_name = SongRecord {
            name: "a".repeat(201),
            ..SongRecord::with_defaults()
        };
        assert_eq!(field_of(validate_song(&long_name).unwrap_err()), "name");

        let long_key = SongRecord {
            name: "Song".to_string(),
            key: Some("x".repeat(11)),
            ..SongRecord::with_defaults()
        };
        assert_eq!(field_of(validate_song(&long_key).unwrap_err()), "key");

        let long_notes = SongRecord {
            name: "Song".to_string(),
            notes: Some("n".repeat(1001)),
            ..SongRecord::with_defaults()
        };
        assert_eq!(field_of(validate_song(&long_notes).unwrap_err()), "notes");
    }

    #[test]
    fn test_song_credits_required() {
        let valid = SongRecord {
            name: "Song".to_string(),
            ..SongRecord::with_defaults()
        };
        assert!(validate_song(&valid).is_ok());

        let blank_speed = SongRecord {
            speed: "  ".to_string(),
            ..valid.clone()
        };
        assert_eq!(field_of(validate_song(&blank_speed).unwrap_err()), "speed");

        let blank_publisher = SongRecord {
            publisher: String::new(),
            ..valid.clone()
        };
        assert_eq!(
            field_of(validate_song(&blank_publisher).unwrap_err()),
            "publisher"
        );

        let blank_artist = SongRecord {
            artist: "\t".to_string(),
            ..valid
        };
        assert_eq!(field_of(validate_song(&blank_artist).unwrap_err()), "artist");
    }

    #[test]
    fn test_template_slot_title_required() {
        let draft = TemplateDraft {
            name: "Evening".to_string(),
            description: String::new(),
            slots: vec![
                SlotDraft { kind: EventKind::Song, title: "Hymn".to_string(), order: 1 },
                SlotDraft { kind: EventKind::Prayer, title: " ".to_string(), order: 2 },
            ],
        };
        assert_eq!(
            field_of(validate_template(&draft).unwrap_err()),
            "slots[1].title"
        );
    }

    #[test]
    fn test_template_without_slots_is_valid() {
        let draft = TemplateDraft {
            name: "Empty".to_string(),
            description: String::new(),
            slots: Vec::new(),
        };
        assert!(validate_template(&draft).is_ok());
    }

    #[test]
    fn test_service_instance_limits() {
        let service_id = Uuid::new_v4();
        let mut service = Service {
            id: service_id,
            name: "Easter".to_string(),
            service_date: "2025-04-20".parse().unwrap(),
            template_id: Uuid::new_v4(),
            is_seasonal: true,
            instances: vec![EventInstance {
                id: Uuid::new_v4(),
                service_id,
                slot_id: Uuid::new_v4(),
                position: 0,
                person_name: Some("p".repeat(101)),
                song_title: None,
                notes: None,
            }],
        };
        assert_eq!(
            field_of(validate_service(&service).unwrap_err()),
            "instances[0].person_name"
        );

        service.instances[0].person_name = Some(String::new());
        assert!(validate_service(&service).is_ok());

        service.name = String::new();
        assert_eq!(field_of(validate_service(&service).unwrap_err()), "name");
    }
}
