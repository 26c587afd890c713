use std::path::PathBuf;

use amr_core::{
    BreakdownEntry, BreakdownKey, Deduplication, HighResistancePairs, OrganismCount,
    OrganismProfile, ResistanceMatrix, ResultDistribution, TallyEntry,
};
use amr_ingest::CaseSchema;
use amr_model::{OrganismGroup, SusceptibilityResult};
use amr_cli::output::OutputPaths;
use amr_standards::ReferenceTables;
use polars::prelude::DataFrame;

/// A loaded, deduplicated and filtered export.
#[derive(Debug)]
pub struct Analysis {
    pub input: PathBuf,
    pub tables: ReferenceTables,
    pub schema: CaseSchema,
    pub deduplication: Deduplication,
    /// Kept records that pass the case filter.
    pub cases: DataFrame,
}

#[derive(Debug)]
pub struct ReportResult {
    pub analysis: Analysis,
    pub matrix: ResistanceMatrix,
    pub high: HighResistancePairs,
    pub outputs: Option<OutputPaths>,
}

#[derive(Debug)]
pub struct OrganismResult {
    pub organism: String,
    pub profile: Option<OrganismProfile>,
}

#[derive(Debug)]
pub struct BreakdownResult {
    pub key: BreakdownKey,
    pub organism: Option<String>,
    pub entries: Vec<BreakdownEntry>,
}

#[derive(Debug)]
pub struct TallyResult {
    pub group: OrganismGroup,
    pub result: SusceptibilityResult,
    pub organisms: Vec<OrganismCount>,
    pub tally: Vec<TallyEntry>,
}

#[derive(Debug)]
pub struct DistributionResult {
    /// Selected organisms; empty means every organism.
    pub organisms: Vec<String>,
    pub distributions: Vec<ResultDistribution>,
}
