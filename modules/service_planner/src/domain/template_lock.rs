//! Template structure lock
//!
//! Once a service has been instantiated from a template, the template's slot
//! structure is frozen: edits narrow to name and description.
//!
//! The in-use check and the edit that follows are two separate calls against the
//! store. A service created for the same template in between is not detected;
//! callers that need a hard guarantee must serialize per template around both.

use super::repository::ServiceRepository;
use crate::contract::{EventSlot, SlotDraft, Template, TemplateDraft};
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// What an incoming template edit is allowed to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPolicy {
    /// Template is in use: name and description only, slots untouched
    MetadataOnly,
    /// Template is unused: name, description and the whole slot sequence
    ReplaceStructure,
}

impl EditPolicy {
    pub fn replaces_structure(self) -> bool {
        matches!(self, EditPolicy::ReplaceStructure)
    }

    /// Apply `draft` to `existing` under this policy.
    ///
    /// Replacement slots get fresh identifiers and are stamped with the
    /// template's id. The active flag and creation time are never changed here.
    pub fn apply(self, existing: Template, draft: TemplateDraft) -> Template {
        let slots = match self {
            EditPolicy::MetadataOnly => existing.slots,
            EditPolicy::ReplaceStructure => build_slots(existing.id, draft.slots),
        };

        Template {
            name: draft.name,
            description: draft.description,
            slots,
            ..existing
        }
    }
}

/// Decide the edit policy for a template given whether it is in use
pub fn authorize_structural_edit(template: &Template, in_use: bool) -> EditPolicy {
    if in_use {
        tracing::debug!(template_id = %template.id, "Template in use, structural edits disabled");
        EditPolicy::MetadataOnly
    } else {
        EditPolicy::ReplaceStructure
    }
}

/// Turn slot drafts into slots owned by `template_id`
pub fn build_slots(template_id: Uuid, drafts: Vec<SlotDraft>) -> Vec<EventSlot> {
    drafts
        .into_iter()
        .map(|draft| EventSlot {
            id: Uuid::new_v4(),
            kind: draft.kind,
            title: draft.title,
            order: draft.order,
            template_id,
        })
        .collect()
}

/// Answers whether a template is referenced by any service
pub struct TemplateLockManager {
    services: Arc<dyn ServiceRepository>,
}

impl TemplateLockManager {
    pub fn new(services: Arc<dyn ServiceRepository>) -> Self {
        Self { services }
    }

    pub async fn is_in_use(&self, template_id: Uuid) -> Result<bool> {
        Ok(self.services.count_by_template(template_id).await? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::EventKind;
    use chrono::Utc;

    fn template_with_slots() -> Template {
        let id = Uuid::new_v4();
        Template {
            id,
            name: "Sunday Morning".to_string(),
            description: "Main service".to_string(),
            is_active: true,
            created_at: Utc::now(),
            slots: build_slots(
                id,
                vec![
                    SlotDraft { kind: EventKind::Prayer, title: "Opening Prayer".to_string(), order: 1 },
                    SlotDraft { kind: EventKind::Song, title: "Opening Hymn".to_string(), order: 2 },
                ],
            ),
        }
    }

    fn edit() -> TemplateDraft {
        TemplateDraft {
            name: "Sunday Evening".to_string(),
            description: "Evening service".to_string(),
            slots: vec![SlotDraft {
                kind: EventKind::Speaker,
                title: "Message".to_string(),
                order: 1,
            }],
        }
    }

    #[test]
    fn test_policy_follows_in_use() {
        let template = template_with_slots();
        assert_eq!(authorize_structural_edit(&template, true), EditPolicy::MetadataOnly);
        assert_eq!(authorize_structural_edit(&template, false), EditPolicy::ReplaceStructure);
    }

    #[test]
    fn test_metadata_only_keeps_slots() {
        let template = template_with_slots();
        let original_slots = template.slots.clone();

        let edited = EditPolicy::MetadataOnly.apply(template, edit());

        assert_eq!(edited.name, "Sunday Evening");
        assert_eq!(edited.description, "Evening service");
        assert_eq!(edited.slots, original_slots);
    }

    #[test]
    fn test_replace_structure_restamps_slots() {
        let template = template_with_slots();
        let template_id = template.id;
        let old_ids: Vec<Uuid> = template.slots.iter().map(|s| s.id).collect();

        let edited = EditPolicy::ReplaceStructure.apply(template, edit());

        assert_eq!(edited.slots.len(), 1);
        assert_eq!(edited.slots[0].kind, EventKind::Speaker);
        assert_eq!(edited.slots[0].template_id, template_id);
        assert!(!old_ids.contains(&edited.slots[0].id));
    }

    #[test]
    fn test_apply_preserves_active_flag_and_created_at() {
        let mut template = template_with_slots();
        template.is_active = false;
        let created_at = template.created_at;

        let edited = EditPolicy::ReplaceStructure.apply(template, edit());

        assert!(!edited.is_active);
        assert_eq!(edited.created_at, created_at);
    }
}
