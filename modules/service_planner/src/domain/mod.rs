//! Domain layer - business logic and services

pub mod events;
pub mod import;
pub mod instantiation;
pub mod repository;
pub mod rotation;
pub mod service;
pub mod template_lock;
pub mod validation;

pub use events::{EventPublisher, NoOpEventPublisher, PlannerEvent, TracingEventPublisher};
pub use repository::{ServiceRepository, SongFilter, SongRepository, TemplateRepository};
pub use service::Planner;
pub use template_lock::{EditPolicy, TemplateLockManager};
