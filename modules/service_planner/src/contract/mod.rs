//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::PlannerApi;
pub use error::PlannerError;
pub use model::{
    CallerIdentity, EventInstance, EventKind, EventSlot, RotationEntry, Service, SlotDraft, Song,
    SongRecord, SongUsage, Template, TemplateDraft,
};
