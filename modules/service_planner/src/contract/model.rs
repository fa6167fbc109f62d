//! Contract models for the service planner
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Catalog song
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: Uuid,
    /// Canonical song name, also the key used in service history
    pub name: String,
    /// Musical key (e.g. "G", "Am")
    pub key: Option<String>,
    /// External catalog (SongSelect / CCLI) identifier
    pub song_select_id: Option<i32>,
    pub seasonal: bool,
    /// Tempo descriptor ("Slow", "Medium", "Fast", ...)
    pub speed: String,
    pub publisher: String,
    pub artist: String,
    pub category: Option<String>,
    pub notes: Option<String>,
    /// Disabled songs stay in history but never appear in selection surfaces
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Song fields as entered by a user or read from an import row.
///
/// Becomes a [`Song`] once the facade assigns an identifier and creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    pub name: String,
    pub key: Option<String>,
    pub song_select_id: Option<i32>,
    pub seasonal: bool,
    pub speed: String,
    pub publisher: String,
    pub artist: String,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub disabled: bool,
}

impl SongRecord {
    pub const DEFAULT_SPEED: &'static str = "Medium";
    pub const DEFAULT_PUBLISHER: &'static str = "Unknown";
    pub const DEFAULT_ARTIST: &'static str = "Unknown";

    /// Record with an empty name and the import defaults for required fields
    pub fn with_defaults() -> Self {
        Self {
            name: String::new(),
            key: None,
            song_select_id: None,
            seasonal: false,
            speed: Self::DEFAULT_SPEED.to_string(),
            publisher: Self::DEFAULT_PUBLISHER.to_string(),
            artist: Self::DEFAULT_ARTIST.to_string(),
            category: None,
            notes: None,
            disabled: false,
        }
    }

    pub fn into_song(self, id: Uuid, created_at: DateTime<Utc>) -> Song {
        Song {
            id,
            name: self.name,
            key: self.key,
            song_select_id: self.song_select_id,
            seasonal: self.seasonal,
            speed: self.speed,
            publisher: self.publisher,
            artist: self.artist,
            category: self.category,
            notes: self.notes,
            disabled: self.disabled,
            created_at,
        }
    }
}

/// Closed set of event kinds a template slot can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Speaker,
    Prayer,
    Communion,
    Baptism,
    Song,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Speaker,
        EventKind::Prayer,
        EventKind::Communion,
        EventKind::Baptism,
        EventKind::Song,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Speaker => "Speaker",
            EventKind::Prayer => "Prayer",
            EventKind::Communion => "Communion",
            EventKind::Baptism => "Baptism",
            EventKind::Song => "Song",
        }
    }

    /// Parse the stored name; unknown names yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned event within a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSlot {
    pub id: Uuid,
    pub kind: EventKind,
    pub title: String,
    /// Ordinal position within the owning template
    pub order: i32,
    pub template_id: Uuid,
}

/// Reusable ordered plan of event slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub slots: Vec<EventSlot>,
}

impl Template {
    /// Slots sorted by ordinal position; ties keep their stored sequence
    pub fn ordered_slots(&self) -> Vec<&EventSlot> {
        let mut slots: Vec<&EventSlot> = self.slots.iter().collect();
        slots.sort_by_key(|slot| slot.order);
        slots
    }

    /// Ordinal positions that appear more than once
    pub fn duplicate_orders(&self) -> Vec<i32> {
        let mut orders: Vec<i32> = self.slots.iter().map(|slot| slot.order).collect();
        orders.sort_unstable();
        let mut duplicates: Vec<i32> = orders
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        duplicates.dedup();
        duplicates
    }
}

/// Name, description and slots submitted for a template create or edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    pub name: String,
    pub description: String,
    pub slots: Vec<SlotDraft>,
}

/// Slot fields submitted as part of a [`TemplateDraft`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDraft {
    pub kind: EventKind,
    pub title: String,
    pub order: i32,
}

/// One dated, scheduled occurrence derived from a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub service_date: NaiveDate,
    /// Originating template; kept even if the template is later deactivated or edited
    pub template_id: Uuid,
    pub is_seasonal: bool,
    pub instances: Vec<EventInstance>,
}

/// Filled-in realization of one slot within one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInstance {
    pub id: Uuid,
    pub service_id: Uuid,
    /// Template slot this instance was derived from (non-owning)
    pub slot_id: Uuid,
    /// Position of the instance within its service
    pub position: i32,
    pub person_name: Option<String>,
    pub song_title: Option<String>,
    pub notes: Option<String>,
}

/// One historical use of a song title on a service date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongUsage {
    pub song_title: String,
    pub service_date: NaiveDate,
}

/// Song with the date it was last scheduled, as shown by the rotation view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationEntry {
    pub song: Song,
    pub last_played: Option<NaiveDate>,
}

/// Identity supplied by the external identity/session provider.
///
/// The planner performs no authentication; it records who acted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerIdentity {
    pub user_id: Option<String>,
}

impl CallerIdentity {
    /// Caller without a known identity (bootstrap, background jobs)
    pub fn system() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn display(&self) -> &str {
        self.user_id.as_deref().unwrap_or("system")
    }
}
