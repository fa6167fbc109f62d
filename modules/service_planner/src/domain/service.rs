//! Domain service - business logic orchestration
//!
//! `Planner` is the facade transport layers call into. It owns no state beyond
//! handles to the persistence port and the event publisher.

use super::events::{EventPublisher, PlannerEvent};
use super::instantiation::{self, InstanceSource};
use super::repository::{ServiceRepository, SongFilter, SongRepository, TemplateRepository};
use super::template_lock::{self, TemplateLockManager};
use super::{import, rotation, validation};
use crate::config::Config;
use crate::contract::{
    CallerIdentity, PlannerError, RotationEntry, Service, SlotDraft, Song, SongRecord, Template,
    TemplateDraft,
};
use chrono::{NaiveDate, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

/// Log an infrastructure failure and hide it behind `PlannerError::Internal`
fn internal(operation: &'static str) -> impl FnOnce(anyhow::Error) -> PlannerError {
    move |err| {
        tracing::error!(operation, error = %err, "Persistence failure");
        PlannerError::Internal
    }
}

/// Domain facade for catalog, templates and services
pub struct Planner {
    songs: Arc<dyn SongRepository>,
    templates: Arc<dyn TemplateRepository>,
    services: Arc<dyn ServiceRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    lock_manager: TemplateLockManager,
    max_import_bytes: usize,
}

impl Planner {
    /// Create a new planner over the given repositories
    pub fn new(
        songs: Arc<dyn SongRepository>,
        templates: Arc<dyn TemplateRepository>,
        services: Arc<dyn ServiceRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        config: &Config,
    ) -> Self {
        Self {
            songs,
            templates,
            lock_manager: TemplateLockManager::new(services.clone()),
            services,
            event_publisher,
            max_import_bytes: config.max_import_bytes,
        }
    }

    async fn publish(&self, event: PlannerEvent) {
        if let Err(e) = self.event_publisher.publish(event).await {
            // delivery is best effort
            tracing::warn!(error = %e, "Failed to publish planner event");
        }
    }

    // ===== Catalog =====

    /// Every song, disabled ones included, ordered by name
    pub async fn list_songs(&self) -> Result<Vec<Song>, PlannerError> {
        self.songs
            .list(&SongFilter::all())
            .await
            .map_err(internal("songs.list"))
    }

    pub async fn list_active_songs(&self) -> Result<Vec<Song>, PlannerError> {
        self.songs
            .list(&SongFilter::active())
            .await
            .map_err(internal("songs.list"))
    }

    pub async fn list_seasonal_songs(&self) -> Result<Vec<Song>, PlannerError> {
        let filter = SongFilter {
            seasonal_only: true,
            ..SongFilter::active()
        };
        self.songs.list(&filter).await.map_err(internal("songs.list"))
    }

    pub async fn songs_by_category(&self, category: &str) -> Result<Vec<Song>, PlannerError> {
        let filter = SongFilter {
            category: Some(category.to_string()),
            ..SongFilter::active()
        };
        self.songs.list(&filter).await.map_err(internal("songs.list"))
    }

    /// Enabled songs whose name, artist, category or publisher contains `term`.
    /// A blank term lists every enabled song.
    pub async fn search_songs(&self, term: &str) -> Result<Vec<Song>, PlannerError> {
        let term = term.trim();
        let filter = SongFilter {
            search: (!term.is_empty()).then(|| term.to_string()),
            ..SongFilter::active()
        };
        self.songs.list(&filter).await.map_err(internal("songs.list"))
    }

    /// Distinct, sorted categories of enabled songs
    pub async fn song_categories(&self) -> Result<Vec<String>, PlannerError> {
        let songs = self.list_active_songs().await?;
        let categories: BTreeSet<String> = songs
            .into_iter()
            .filter_map(|song| song.category)
            .filter(|category| !category.trim().is_empty())
            .collect();
        Ok(categories.into_iter().collect())
    }

    pub async fn get_song(&self, id: Uuid) -> Result<Song, PlannerError> {
        self.songs
            .find_by_id(id)
            .await
            .map_err(internal("songs.find_by_id"))?
            .ok_or_else(|| PlannerError::not_found("song", id))
    }

    pub async fn create_song(
        &self,
        caller: &CallerIdentity,
        record: SongRecord,
    ) -> Result<Song, PlannerError> {
        validation::validate_song(&record)?;

        let song = record.into_song(Uuid::new_v4(), Utc::now());
        let song = self
            .songs
            .insert(&song)
            .await
            .map_err(internal("songs.insert"))?;

        tracing::info!(song_id = %song.id, name = %song.name, user = caller.display(), "Song created");
        Ok(song)
    }

    /// Replace a song's fields; identifier and creation time are kept
    pub async fn update_song(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
        record: SongRecord,
    ) -> Result<Song, PlannerError> {
        validation::validate_song(&record)?;
        let existing = self.get_song(id).await?;

        let song = record.into_song(existing.id, existing.created_at);
        let song = self
            .songs
            .update(&song)
            .await
            .map_err(internal("songs.update"))?;

        tracing::info!(song_id = %song.id, user = caller.display(), "Song updated");
        Ok(song)
    }

    /// Soft-disable or re-enable a song
    pub async fn set_song_disabled(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
        disabled: bool,
    ) -> Result<Song, PlannerError> {
        let mut song = self.get_song(id).await?;
        song.disabled = disabled;

        let song = self
            .songs
            .update(&song)
            .await
            .map_err(internal("songs.update"))?;

        tracing::info!(song_id = %song.id, disabled, user = caller.display(), "Song availability changed");
        Ok(song)
    }

    /// Hard delete. Service history keeps the title since instances store it as text.
    pub async fn delete_song(&self, caller: &CallerIdentity, id: Uuid) -> Result<(), PlannerError> {
        let deleted = self
            .songs
            .delete(id)
            .await
            .map_err(internal("songs.delete"))?;
        if !deleted {
            return Err(PlannerError::not_found("song", id));
        }

        tracing::info!(song_id = %id, user = caller.display(), "Song deleted");
        Ok(())
    }

    /// Parse delimited text and insert every accepted row.
    ///
    /// Malformed rows and rows failing field validation are skipped; the
    /// inserted songs are returned.
    pub async fn import_songs(
        &self,
        caller: &CallerIdentity,
        raw: &str,
    ) -> Result<Vec<Song>, PlannerError> {
        if raw.len() > self.max_import_bytes {
            return Err(PlannerError::validation(
                "file",
                format!("import exceeds {} bytes", self.max_import_bytes),
            ));
        }

        let records = import::parse(raw);
        let parsed = records.len();
        let mut imported = Vec::with_capacity(parsed);

        for record in records {
            if let Err(e) = validation::validate_song(&record) {
                tracing::warn!(name = %record.name, error = %e, "Skipping invalid import row");
                continue;
            }
            let song = record.into_song(Uuid::new_v4(), Utc::now());
            let song = self
                .songs
                .insert(&song)
                .await
                .map_err(internal("songs.insert"))?;
            imported.push(song);
        }

        tracing::info!(
            parsed,
            imported = imported.len(),
            user = caller.display(),
            "Song import completed"
        );
        self.publish(PlannerEvent::songs_imported(imported.len(), caller))
            .await;
        Ok(imported)
    }

    /// Most recent service date the title was scheduled on
    pub async fn last_played(&self, title: &str) -> Result<Option<NaiveDate>, PlannerError> {
        let history = self
            .services
            .song_usage()
            .await
            .map_err(internal("services.song_usage"))?;
        Ok(rotation::last_played_dates(&history).get(title).copied())
    }

    /// Enabled songs with their last-played date, least recently used first
    pub async fn song_rotation(&self) -> Result<Vec<RotationEntry>, PlannerError> {
        let catalog = self.list_active_songs().await?;
        let history = self
            .services
            .song_usage()
            .await
            .map_err(internal("services.song_usage"))?;
        Ok(rotation::rotation(&catalog, &history))
    }

    // ===== Templates =====

    pub async fn list_templates(&self, active_only: bool) -> Result<Vec<Template>, PlannerError> {
        self.templates
            .list(active_only)
            .await
            .map_err(internal("templates.list"))
    }

    pub async fn get_template(&self, id: Uuid) -> Result<Template, PlannerError> {
        self.templates
            .find_by_id(id)
            .await
            .map_err(internal("templates.find_by_id"))?
            .ok_or_else(|| PlannerError::not_found("template", id))
    }

    /// True iff at least one service references the template
    pub async fn is_template_in_use(&self, id: Uuid) -> Result<bool, PlannerError> {
        self.lock_manager
            .is_in_use(id)
            .await
            .map_err(internal("services.count_by_template"))
    }

    pub async fn create_template(
        &self,
        caller: &CallerIdentity,
        draft: TemplateDraft,
    ) -> Result<Template, PlannerError> {
        validation::validate_template(&draft)?;

        let id = Uuid::new_v4();
        let template = Template {
            id,
            name: draft.name,
            description: draft.description,
            is_active: true,
            created_at: Utc::now(),
            slots: template_lock::build_slots(id, draft.slots),
        };
        warn_duplicate_orders(&template);

        let template = self
            .templates
            .insert(&template)
            .await
            .map_err(internal("templates.insert"))?;

        tracing::info!(
            template_id = %template.id,
            slots = template.slots.len(),
            user = caller.display(),
            "Template created"
        );
        self.publish(PlannerEvent::template_created(&template, caller))
            .await;
        Ok(template)
    }

    /// Edit a template under the lock policy.
    ///
    /// While any service references the template, only name and description are
    /// written and the supplied slots are dropped without error. The in-use check
    /// and the write are not atomic.
    pub async fn update_template(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
        draft: TemplateDraft,
    ) -> Result<Template, PlannerError> {
        validation::validate_template(&draft)?;
        let existing = self.get_template(id).await?;

        let in_use = self.is_template_in_use(id).await?;
        let policy = template_lock::authorize_structural_edit(&existing, in_use);

        if !policy.replaces_structure() && slots_differ(&existing, &draft.slots) {
            tracing::warn!(
                template_id = %id,
                "Template in use; slot changes dropped, only name and description updated"
            );
        }

        let updated = policy.apply(existing, draft);
        let updated = if policy.replaces_structure() {
            warn_duplicate_orders(&updated);
            self.templates
                .replace_structure(&updated)
                .await
                .map_err(internal("templates.replace_structure"))?;
            self.get_template(id).await?
        } else {
            self.templates
                .update_metadata(&updated)
                .await
                .map_err(internal("templates.update_metadata"))?
        };

        tracing::info!(
            template_id = %id,
            structure_replaced = policy.replaces_structure(),
            user = caller.display(),
            "Template updated"
        );
        self.publish(PlannerEvent::template_updated(
            &updated,
            policy.replaces_structure(),
            caller,
        ))
        .await;
        Ok(updated)
    }

    /// Toggle the active flag; allowed whether or not the template is in use
    pub async fn set_template_active(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
        is_active: bool,
    ) -> Result<Template, PlannerError> {
        let mut template = self.get_template(id).await?;
        template.is_active = is_active;

        let template = self
            .templates
            .update_metadata(&template)
            .await
            .map_err(internal("templates.update_metadata"))?;

        tracing::info!(template_id = %id, is_active, user = caller.display(), "Template activation changed");
        Ok(template)
    }

    /// Delete an unused template and its slots; in-use templates are refused
    pub async fn delete_template(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
    ) -> Result<(), PlannerError> {
        let template = self.get_template(id).await?;

        if self.is_template_in_use(id).await? {
            return Err(PlannerError::Conflict {
                reason: format!("template {id} is referenced by existing services"),
            });
        }

        self.templates
            .delete(id)
            .await
            .map_err(internal("templates.delete"))?;

        tracing::info!(template_id = %id, user = caller.display(), "Template deleted");
        self.publish(PlannerEvent::template_deleted(&template, caller))
            .await;
        Ok(())
    }

    // ===== Services =====

    /// Every service, most recent date first
    pub async fn list_services(&self) -> Result<Vec<Service>, PlannerError> {
        self.services
            .list_all()
            .await
            .map_err(internal("services.list_all"))
    }

    /// Services dated within `[start, end]`, earliest first
    pub async fn services_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Service>, PlannerError> {
        if start > end {
            return Err(PlannerError::validation("start", "must not be after end"));
        }
        self.services
            .list_in_range(start, end)
            .await
            .map_err(internal("services.list_in_range"))
    }

    pub async fn get_service(&self, id: Uuid) -> Result<Service, PlannerError> {
        self.services
            .find_by_id(id)
            .await
            .map_err(internal("services.find_by_id"))?
            .ok_or_else(|| PlannerError::not_found("service", id))
    }

    /// Create a service, deriving its instances from the template unless the
    /// caller supplied some. A missing template does not fail the call.
    pub async fn create_service(
        &self,
        caller: &CallerIdentity,
        mut service: Service,
    ) -> Result<Service, PlannerError> {
        validation::validate_service(&service)?;
        service.id = Uuid::new_v4();

        let template = self
            .templates
            .find_by_id(service.template_id)
            .await
            .map_err(internal("templates.find_by_id"))?;

        let (service, source) = instantiation::instantiate(service, template.as_ref());
        if source == InstanceSource::MissingTemplate {
            tracing::warn!(
                service_id = %service.id,
                template_id = %service.template_id,
                "Template not found; service created without instances"
            );
        }

        let service = self
            .services
            .insert(&service)
            .await
            .map_err(internal("services.insert"))?;

        tracing::info!(
            service_id = %service.id,
            template_id = %service.template_id,
            date = %service.service_date,
            instances = service.instances.len(),
            user = caller.display(),
            "Service created"
        );
        self.publish(PlannerEvent::service_created(
            &service,
            source == InstanceSource::Template,
            caller,
        ))
        .await;
        Ok(service)
    }

    /// Merge an edit into a stored service by instance id
    pub async fn update_service(
        &self,
        caller: &CallerIdentity,
        service: Service,
    ) -> Result<Service, PlannerError> {
        validation::validate_service(&service)?;
        let existing = self.get_service(service.id).await?;

        let merged = instantiation::reconcile(existing, &service);
        let merged = self
            .services
            .update(&merged)
            .await
            .map_err(internal("services.update"))?;

        tracing::info!(service_id = %merged.id, user = caller.display(), "Service updated");
        self.publish(PlannerEvent::service_updated(&merged, caller))
            .await;
        Ok(merged)
    }

    /// Delete a service together with all of its instances
    pub async fn delete_service(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
    ) -> Result<(), PlannerError> {
        let service = self.get_service(id).await?;

        self.services
            .delete(id)
            .await
            .map_err(internal("services.delete"))?;

        tracing::info!(service_id = %id, user = caller.display(), "Service deleted");
        self.publish(PlannerEvent::service_deleted(&service, caller))
            .await;
        Ok(())
    }
}

fn warn_duplicate_orders(template: &Template) {
    let duplicates = template.duplicate_orders();
    if !duplicates.is_empty() {
        tracing::warn!(
            template_id = %template.id,
            orders = ?duplicates,
            "Template has duplicate slot ordinals"
        );
    }
}

/// Whether the requested slots differ from the stored sequence
fn slots_differ(existing: &Template, requested: &[SlotDraft]) -> bool {
    let current = existing.ordered_slots();
    current.len() != requested.len()
        || current.iter().zip(requested).any(|(slot, draft)| {
            slot.kind != draft.kind || slot.title != draft.title || slot.order != draft.order
        })
}
