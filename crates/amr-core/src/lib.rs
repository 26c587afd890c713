//! Antimicrobial resistance analysis.
//!
//! This crate holds the two pipeline stages and the analyses built on them:
//!
//! - **dedupe**: temporal-window removal of repeat isolates, with a report of
//!   every record involved
//! - **aggregate**: per organism/antibiotic resistance cells and the pivoted
//!   [`ResistanceMatrix`]
//! - **profile**: organism summaries, class profiles, tallies, frequencies
//!   and per-antibiotic result distributions
//! - **breakdown**: isolate shares by sex or age band
//! - **filter**: case selection by organisms, sex, age group, service, product
//!
//! Every operation is a pure function of a deduplicated frame and the
//! reference tables; malformed values degrade to null or default classes.

pub mod aggregate;
pub mod breakdown;
pub mod dedupe;
pub mod error;
pub mod filter;
mod frame;
pub mod matrix;
pub mod profile;

pub use aggregate::{AggregationNotes, aggregate, aggregate_cells};
pub use breakdown::{AgeBand, BreakdownEntry, BreakdownKey, isolate_breakdown};
pub use dedupe::{Deduplication, DeduplicationSummary, deduplicate};
pub use error::{CoreError, Result};
pub use filter::{AgeGroup, CaseFilter};
pub use matrix::{GRAM_STAIN_COLUMN, ISOLATES_COLUMN, MatrixRow, ResistanceMatrix};
pub use profile::{
    ClassResistance, HighResistancePairs, LegendEntry, OrganismCount, OrganismProfile,
    ResultDistribution, SusceptibilitySummary, TallyEntry, antibiotic_legend, class_profile,
    high_resistance_pairs, most_resistant, organism_frequency, organism_profile,
    result_distribution, result_tally, susceptibility_summary,
};
