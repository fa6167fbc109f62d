//! Common test utilities: in-memory repositories and a wired planner
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use service_planner::contract::*;
use service_planner::domain::repository::{
    ServiceRepository, SongFilter, SongRepository, TemplateRepository,
};
use service_planner::domain::{EventPublisher, Planner, PlannerEvent};
use service_planner::Config;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

// ===== Song repository =====

#[derive(Default)]
pub struct MockSongRepo {
    data: RwLock<HashMap<Uuid, Song>>,
}

impl MockSongRepo {
    pub fn len(&self) -> usize {
        self.data.read().len()
    }
}

#[async_trait]
impl SongRepository for MockSongRepo {
    async fn insert(&self, song: &Song) -> Result<Song> {
        self.data.write().insert(song.id, song.clone());
        Ok(song.clone())
    }

    async fn update(&self, song: &Song) -> Result<Song> {
        let mut data = self.data.write();
        let slot = data
            .get_mut(&song.id)
            .ok_or_else(|| anyhow!("song {} not stored", song.id))?;
        *slot = song.clone();
        Ok(song.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.data.write().remove(&id).is_some())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Song>> {
        Ok(self.data.read().get(&id).cloned())
    }

    async fn list(&self, filter: &SongFilter) -> Result<Vec<Song>> {
        let contains = |field: &str, term: &str| field.contains(term);
        let mut songs: Vec<Song> = self
            .data
            .read()
            .values()
            .filter(|s| filter.include_disabled || !s.disabled)
            .filter(|s| !filter.seasonal_only || s.seasonal)
            .filter(|s| match &filter.category {
                Some(category) => s.category.as_deref() == Some(category.as_str()),
                None => true,
            })
            .filter(|s| match &filter.search {
                Some(term) => {
                    contains(&s.name, term)
                        || contains(&s.artist, term)
                        || contains(&s.publisher, term)
                        || s.category.as_deref().is_some_and(|c| contains(c, term))
                }
                None => true,
            })
            .cloned()
            .collect();
        songs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(songs)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.data.read().len() as u64)
    }
}

// ===== Template repository =====

#[derive(Default)]
pub struct MockTemplateRepo {
    data: RwLock<HashMap<Uuid, Template>>,
}

impl MockTemplateRepo {
    /// Stored slots without any reordering
    pub fn raw_slots(&self, id: Uuid) -> Vec<EventSlot> {
        self.data
            .read()
            .get(&id)
            .map(|t| t.slots.clone())
            .unwrap_or_default()
    }
}

fn sorted(mut template: Template) -> Template {
    template
        .slots
        .sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
    template
}

#[async_trait]
impl TemplateRepository for MockTemplateRepo {
    async fn insert(&self, template: &Template) -> Result<Template> {
        self.data.write().insert(template.id, template.clone());
        Ok(template.clone())
    }

    async fn update_metadata(&self, template: &Template) -> Result<Template> {
        let mut data = self.data.write();
        let stored = data
            .get_mut(&template.id)
            .ok_or_else(|| anyhow!("template {} not stored", template.id))?;
        stored.name = template.name.clone();
        stored.description = template.description.clone();
        stored.is_active = template.is_active;
        Ok(template.clone())
    }

    async fn replace_structure(&self, template: &Template) -> Result<()> {
        let mut data = self.data.write();
        let stored = data
            .get_mut(&template.id)
            .ok_or_else(|| anyhow!("template {} not stored", template.id))?;
        *stored = template.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>> {
        Ok(self.data.read().get(&id).cloned().map(sorted))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Template>> {
        let mut templates: Vec<Template> = self
            .data
            .read()
            .values()
            .filter(|t| !active_only || t.is_active)
            .cloned()
            .map(sorted)
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.data.write().remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.data.read().len() as u64)
    }
}

// ===== Service repository =====

#[derive(Default)]
pub struct MockServiceRepo {
    data: RwLock<HashMap<Uuid, Service>>,
}

impl MockServiceRepo {
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Every stored instance across all services
    pub fn instance_count(&self) -> usize {
        self.data.read().values().map(|s| s.instances.len()).sum()
    }
}

#[async_trait]
impl ServiceRepository for MockServiceRepo {
    async fn insert(&self, service: &Service) -> Result<Service> {
        self.data.write().insert(service.id, service.clone());
        Ok(service.clone())
    }

    async fn update(&self, service: &Service) -> Result<Service> {
        let mut data = self.data.write();
        let stored = data
            .get_mut(&service.id)
            .ok_or_else(|| anyhow!("service {} not stored", service.id))?;
        stored.name = service.name.clone();
        stored.service_date = service.service_date;
        stored.template_id = service.template_id;
        stored.is_seasonal = service.is_seasonal;
        for incoming in &service.instances {
            if let Some(instance) = stored.instances.iter_mut().find(|i| i.id == incoming.id) {
                instance.person_name = incoming.person_name.clone();
                instance.song_title = incoming.song_title.clone();
                instance.notes = incoming.notes.clone();
            }
        }
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.data.write().remove(&id).is_some())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>> {
        Ok(self.data.read().get(&id).cloned().map(|mut s| {
            s.instances.sort_by_key(|i| i.position);
            s
        }))
    }

    async fn list_all(&self) -> Result<Vec<Service>> {
        let mut services: Vec<Service> = self.data.read().values().cloned().collect();
        services.sort_by(|a, b| b.service_date.cmp(&a.service_date));
        Ok(services)
    }

    async fn list_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Service>> {
        let mut services: Vec<Service> = self
            .data
            .read()
            .values()
            .filter(|s| s.service_date >= start && s.service_date <= end)
            .cloned()
            .collect();
        services.sort_by_key(|s| s.service_date);
        Ok(services)
    }

    async fn count_by_template(&self, template_id: Uuid) -> Result<u64> {
        Ok(self
            .data
            .read()
            .values()
            .filter(|s| s.template_id == template_id)
            .count() as u64)
    }

    async fn song_usage(&self) -> Result<Vec<SongUsage>> {
        Ok(self
            .data
            .read()
            .values()
            .flat_map(|s| {
                s.instances.iter().filter_map(move |i| {
                    i.song_title
                        .as_ref()
                        .filter(|t| !t.trim().is_empty())
                        .map(|t| SongUsage {
                            song_title: t.clone(),
                            service_date: s.service_date,
                        })
                })
            })
            .collect())
    }
}

/// Song repository whose every call fails, for error mapping tests
pub struct FailingSongRepo;

#[async_trait]
impl SongRepository for FailingSongRepo {
    async fn insert(&self, _song: &Song) -> Result<Song> {
        Err(anyhow!("disk I/O error"))
    }

    async fn update(&self, _song: &Song) -> Result<Song> {
        Err(anyhow!("disk I/O error"))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool> {
        Err(anyhow!("disk I/O error"))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Song>> {
        Err(anyhow!("disk I/O error"))
    }

    async fn list(&self, _filter: &SongFilter) -> Result<Vec<Song>> {
        Err(anyhow!("disk I/O error"))
    }

    async fn count(&self) -> Result<u64> {
        Err(anyhow!("disk I/O error"))
    }
}

// ===== Event publisher =====

/// Publisher that keeps every event, optionally failing after recording
#[derive(Default)]
pub struct RecordingPublisher {
    events: RwLock<Vec<PlannerEvent>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<PlannerEvent> {
        self.events.read().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: PlannerEvent) -> Result<()> {
        self.events.write().push(event);
        if self.fail {
            return Err(anyhow!("broker unavailable"));
        }
        Ok(())
    }
}

// ===== Harness =====

pub struct Harness {
    pub planner: Planner,
    pub songs: Arc<MockSongRepo>,
    pub templates: Arc<MockTemplateRepo>,
    pub services: Arc<MockServiceRepo>,
    pub events: Arc<RecordingPublisher>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(Config::default(), RecordingPublisher::default())
    }

    pub fn with(config: Config, publisher: RecordingPublisher) -> Self {
        let songs = Arc::new(MockSongRepo::default());
        let templates = Arc::new(MockTemplateRepo::default());
        let services = Arc::new(MockServiceRepo::default());
        let events = Arc::new(publisher);
        let planner = Planner::new(
            songs.clone(),
            templates.clone(),
            services.clone(),
            events.clone(),
            &config,
        );
        Self {
            planner,
            songs,
            templates,
            services,
            events,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn admin() -> CallerIdentity {
    CallerIdentity::user("admin")
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn slot(kind: EventKind, title: &str, order: i32) -> SlotDraft {
    SlotDraft {
        kind,
        title: title.to_string(),
        order,
    }
}

pub fn draft(name: &str, slots: Vec<SlotDraft>) -> TemplateDraft {
    TemplateDraft {
        name: name.to_string(),
        description: format!("{name} description"),
        slots,
    }
}

/// Four-slot template draft used across tests
pub fn sunday_draft() -> TemplateDraft {
    draft(
        "Sunday Morning",
        vec![
            slot(EventKind::Prayer, "Opening Prayer", 1),
            slot(EventKind::Song, "Opening Hymn", 2),
            slot(EventKind::Speaker, "Main Message", 3),
            slot(EventKind::Song, "Closing Hymn", 4),
        ],
    )
}

pub fn new_service(name: &str, service_date: &str, template_id: Uuid) -> Service {
    Service {
        id: Uuid::nil(),
        name: name.to_string(),
        service_date: date(service_date),
        template_id,
        is_seasonal: false,
        instances: Vec::new(),
    }
}

pub fn song(name: &str) -> SongRecord {
    SongRecord {
        name: name.to_string(),
        ..SongRecord::with_defaults()
    }
}
