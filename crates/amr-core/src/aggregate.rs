//! Resistance aggregation over a deduplicated frame.

use std::collections::BTreeMap;

use amr_common::percentage;
use amr_ingest::CaseSchema;
use amr_model::{ResistanceCategory, ResistanceCell, SusceptibilityResult};
use amr_standards::ReferenceTables;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::frame::role_values;
use crate::matrix::ResistanceMatrix;

/// Informational anomaly counts from one aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationNotes {
    /// Non-blank results that are not a recognized result tag. They count as
    /// tested but never as resistant.
    pub unrecognized_results: usize,
    /// Relevant organisms with no record in the frame.
    pub organisms_without_records: Vec<String>,
    /// Matched columns missing from the reference antibiotic list.
    pub skipped_columns: Vec<String>,
}

/// Isolate counts per organism as written in the frame.
pub(crate) fn organism_rows(df: &DataFrame, schema: &CaseSchema) -> BTreeMap<String, Vec<usize>> {
    let mut rows: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, organism) in role_values(df, schema.organism.as_deref())
        .into_iter()
        .enumerate()
    {
        if let Some(organism) = organism {
            rows.entry(organism).or_default().push(row);
        }
    }
    rows
}

/// Compute every resistance cell, in relevant-organism then column order.
///
/// A pair with no tested record yields no cell.
pub fn aggregate_cells(
    df: &DataFrame,
    schema: &CaseSchema,
    tables: &ReferenceTables,
) -> (Vec<ResistanceCell>, AggregationNotes) {
    let mut notes = AggregationNotes::default();
    let by_organism = organism_rows(df, schema);

    let mut columns = Vec::new();
    for antibiotic in &schema.antibiotics {
        if tables.is_antibiotic(antibiotic) {
            columns.push((antibiotic.as_str(), role_values(df, Some(antibiotic))));
        } else {
            notes.skipped_columns.push(antibiotic.clone());
        }
    }

    let mut cells = Vec::new();
    for organism in tables.relevant_organisms() {
        let Some(rows) = by_organism.get(organism.trim()) else {
            notes.organisms_without_records.push(organism.clone());
            continue;
        };
        let gram_stain = tables.gram_stain(organism);

        for (antibiotic, values) in &columns {
            let mut tested = 0;
            let mut resistant = 0;
            for &row in rows {
                let Some(value) = values[row].as_deref() else {
                    continue;
                };
                tested += 1;
                match value.parse::<SusceptibilityResult>() {
                    Ok(result) if result.is_resistant() => resistant += 1,
                    Ok(_) => {}
                    Err(_) => notes.unrecognized_results += 1,
                }
            }
            let Some(share) = percentage(resistant, tested) else {
                continue;
            };
            cells.push(ResistanceCell {
                organism: organism.clone(),
                antibiotic: (*antibiotic).to_string(),
                tested,
                resistant,
                percentage: share,
                category: ResistanceCategory::from_percentage(share),
                gram_stain,
                antibiotic_class: tables.antibiotic_class(antibiotic).to_string(),
                intrinsic_resistance: tables.is_intrinsically_resistant(organism, antibiotic),
            });
        }
    }

    if notes.unrecognized_results > 0 {
        warn!(
            count = notes.unrecognized_results,
            "unrecognized susceptibility results counted as tested, not resistant"
        );
    }
    if !notes.skipped_columns.is_empty() {
        debug!(columns = ?notes.skipped_columns, "columns outside the antibiotic list skipped");
    }
    (cells, notes)
}

/// Aggregate `df` into a [`ResistanceMatrix`].
pub fn aggregate(
    df: &DataFrame,
    schema: &CaseSchema,
    tables: &ReferenceTables,
) -> ResistanceMatrix {
    let (cells, notes) = aggregate_cells(df, schema, tables);
    let isolates = organism_rows(df, schema)
        .into_iter()
        .map(|(organism, rows)| (organism, rows.len()))
        .collect();
    let matrix = ResistanceMatrix::from_cells(
        cells,
        &isolates,
        tables.columns().organism.clone(),
        notes,
    );
    info!(
        organisms = matrix.rows().len(),
        antibiotics = matrix.antibiotics().len(),
        cells = matrix.cells().len(),
        "resistance matrix built"
    );
    matrix
}
