//! Configuration for the service planner module

use serde::{Deserialize, Serialize};

/// Service planner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Seed the sample catalog and template into an empty database at startup
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,

    /// Maximum accepted size of a bulk import payload in bytes
    #[serde(default = "default_max_import_bytes")]
    pub max_import_bytes: usize,

    /// Log domain events; when off, events are dropped
    #[serde(default = "default_true")]
    pub publish_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            max_import_bytes: default_max_import_bytes(),
            publish_events: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_import_bytes() -> usize {
    1024 * 1024 // 1MB
}
