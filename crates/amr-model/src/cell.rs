//! Per organism/antibiotic resistance aggregate.

use serde::{Deserialize, Serialize};

use crate::enums::{GramStain, ResistanceCategory};

/// Marker shown for an intrinsically resistant pair.
pub const INTRINSIC_MARKER: &str = "x";

/// One (organism, antibiotic) aggregate.
///
/// A cell only exists when at least one case was tested, so `tested` is
/// never zero and `resistant <= tested` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceCell {
    pub organism: String,
    pub antibiotic: String,
    /// Cases with a non-blank result for this antibiotic.
    pub tested: usize,
    /// Cases reported resistant.
    pub resistant: usize,
    /// `resistant / tested * 100`, rounded to one decimal.
    pub percentage: f64,
    pub category: ResistanceCategory,
    pub gram_stain: GramStain,
    pub antibiotic_class: String,
    /// From the reference table only; independent of `percentage`.
    pub intrinsic_resistance: bool,
}

impl ResistanceCell {
    /// Marker for display: [`INTRINSIC_MARKER`] when flagged, empty otherwise.
    pub fn intrinsic_marker(&self) -> &'static str {
        if self.intrinsic_resistance {
            INTRINSIC_MARKER
        } else {
            ""
        }
    }

    /// True when the pair is flagged intrinsically resistant but the measured
    /// percentage is below 100.
    pub fn intrinsic_disagrees(&self) -> bool {
        self.intrinsic_resistance && self.percentage < 100.0
    }
}
