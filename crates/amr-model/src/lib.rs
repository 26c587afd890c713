//! Data model for antimicrobial resistance reporting.
//!
//! The vocabulary shared by every crate in the workspace: laboratory
//! susceptibility results, Gram stain and resistance band classifications,
//! the per-pair [`ResistanceCell`] aggregate, and run options.

pub mod cell;
pub mod enums;
pub mod options;

pub use cell::{INTRINSIC_MARKER, ResistanceCell};
pub use enums::{GramStain, OrganismGroup, ResistanceCategory, SusceptibilityResult};
pub use options::{AnalysisOptions, DEFAULT_WINDOW_DAYS};
