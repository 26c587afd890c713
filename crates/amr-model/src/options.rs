//! Configuration options for a reporting run.

use serde::{Deserialize, Serialize};

/// Default duplicate window, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 15;

/// Options controlling deduplication and aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Two records with the same signature collected at most this many days
    /// apart belong to the same clinical episode.
    pub window_days: u32,

    /// Restrict every analysis after deduplication to the relevant-organism
    /// list. Deduplication itself always sees every record.
    pub relevant_only: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            relevant_only: false,
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_relevant_only(mut self, enable: bool) -> Self {
        self.relevant_only = enable;
        self
    }
}
