//! Service Planner Module
//!
//! Plans worship services: reusable templates of event slots, dated services
//! instantiated from them, and a song catalog ranked for rotation.

// Public exports
pub mod contract;
pub use contract::{
    client::PlannerApi, error::PlannerError, CallerIdentity, EventInstance, EventKind, EventSlot,
    RotationEntry, Service, SlotDraft, Song, SongRecord, SongUsage, Template, TemplateDraft,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::ServicePlannerModule;

pub mod bootstrap;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
