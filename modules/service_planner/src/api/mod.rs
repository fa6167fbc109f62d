//! Transport adapters over the planner facade

pub mod native;
pub mod rest;
