//! Startup seeding of sample catalog and template
//!
//! Runs once from the composition root. Seeding only happens when the catalog
//! and the template list are both empty, so repeated startups are no-ops.
//! The emptiness check and the inserts are not atomic; two processes starting
//! against the same empty database at the same moment can both seed.

use crate::contract::{EventKind, SlotDraft, SongRecord, Template};
use crate::domain::template_lock::build_slots;
use crate::domain::{SongRepository, TemplateRepository};
use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

/// (name, artist, category, key, speed, publisher, seasonal)
const SAMPLE_SONGS: [(&str, &str, &str, &str, &str, &str, bool); 10] = [
    ("Amazing Grace", "Traditional", "Hymn", "G", "Slow", "Traditional", false),
    ("How Great Thou Art", "Traditional", "Hymn", "C", "Medium", "Traditional", false),
    ("Blessed Be Your Name", "Matt Redman", "Contemporary", "A", "Medium", "Thankyou Music", false),
    ("10,000 Reasons", "Matt Redman", "Contemporary", "C", "Medium", "Thankyou Music", false),
    ("Great Is Thy Faithfulness", "Traditional", "Hymn", "Bb", "Slow", "Traditional", false),
    ("Way Maker", "Sinach", "Contemporary", "E", "Medium", "Integrity Music", false),
    ("Holy, Holy, Holy", "Traditional", "Hymn", "Eb", "Slow", "Traditional", false),
    ("Cornerstone", "Hillsong", "Contemporary", "C", "Medium", "Hillsong Music", false),
    ("Silent Night", "Traditional", "Christmas", "C", "Slow", "Traditional", true),
    ("Joy to the World", "Traditional", "Christmas", "D", "Fast", "Traditional", true),
];

const SAMPLE_SLOTS: [(EventKind, &str); 8] = [
    (EventKind::Prayer, "Opening Prayer"),
    (EventKind::Song, "Opening Hymn"),
    (EventKind::Speaker, "Welcome & Announcements"),
    (EventKind::Song, "Worship Songs"),
    (EventKind::Communion, "Communion"),
    (EventKind::Speaker, "Main Message"),
    (EventKind::Song, "Closing Hymn"),
    (EventKind::Prayer, "Closing Prayer"),
];

/// What a bootstrap run inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub songs: usize,
    pub templates: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.songs == 0 && self.templates == 0
    }
}

/// Insert the sample songs and the "Sunday Morning Service" template into an
/// empty database
pub async fn seed_sample_data(
    songs: &dyn SongRepository,
    templates: &dyn TemplateRepository,
) -> Result<SeedReport> {
    if songs.count().await? > 0 || templates.count().await? > 0 {
        tracing::debug!("Database already populated, skipping sample data");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();
    for (name, artist, category, key, speed, publisher, seasonal) in SAMPLE_SONGS {
        let record = SongRecord {
            name: name.to_string(),
            key: Some(key.to_string()),
            seasonal,
            speed: speed.to_string(),
            publisher: publisher.to_string(),
            artist: artist.to_string(),
            category: Some(category.to_string()),
            ..SongRecord::with_defaults()
        };
        songs
            .insert(&record.into_song(Uuid::new_v4(), Utc::now()))
            .await?;
        report.songs += 1;
    }

    let id = Uuid::new_v4();
    let drafts = SAMPLE_SLOTS
        .iter()
        .zip(1..)
        .map(|(&(kind, title), order)| SlotDraft {
            kind,
            title: title.to_string(),
            order,
        })
        .collect();
    let template = Template {
        id,
        name: "Sunday Morning Service".to_string(),
        description: "Standard Sunday morning worship service".to_string(),
        is_active: true,
        created_at: Utc::now(),
        slots: build_slots(id, drafts),
    };
    templates.insert(&template).await?;
    report.templates += 1;

    tracing::info!(
        songs = report.songs,
        templates = report.templates,
        "Seeded sample data"
    );
    Ok(report)
}
