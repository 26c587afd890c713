//! Summaries built on the deduplicated frame and the resistance matrix.

use std::collections::{BTreeMap, HashMap};

use amr_common::{column_string_values, round_one_decimal};
use amr_ingest::CaseSchema;
use amr_model::{OrganismGroup, ResistanceCell, SusceptibilityResult};
use amr_standards::ReferenceTables;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::aggregate::organism_rows;
use crate::frame::role_values;
use crate::matrix::ResistanceMatrix;

/// Lower edge of the "high but not total" resistance list.
const HIGH_RESISTANCE_FROM: f64 = 80.0;

/// Antibiotics for which every record of one organism has the same result.
///
/// An antibiotic with any blank record is in none of the lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SusceptibilitySummary {
    pub organism: String,
    pub isolates: usize,
    pub all_sensitive: Vec<String>,
    pub all_resistant: Vec<String>,
    pub all_increased_exposure: Vec<String>,
}

/// Mean resistance of one organism over the cells of one antibiotic class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassResistance {
    pub class: String,
    pub mean_percentage: f64,
    pub antibiotics: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    pub antibiotic: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganismCount {
    pub organism: String,
    pub count: usize,
}

/// Cells at exactly 100% and cells in `[80, 100)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighResistancePairs {
    pub total: Vec<ResistanceCell>,
    pub high: Vec<ResistanceCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub class: String,
    pub antibiotic: String,
}

/// Result values of one antibiotic column and their record counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultDistribution {
    pub antibiotic: String,
    /// `(result text, records)`, most frequent first.
    pub counts: Vec<(String, usize)>,
}

impl ResultDistribution {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

/// Everything known about one organism in a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganismProfile {
    pub organism: String,
    pub isolates: usize,
    /// Most frequent service and its record count.
    pub top_service: Option<(String, usize)>,
    /// Most frequent specimen product and its record count.
    pub top_product: Option<(String, usize)>,
    pub susceptibility: SusceptibilitySummary,
    pub classes: Vec<ClassResistance>,
    pub most_resistant: Option<ResistanceCell>,
}

/// Uniform-result antibiotics for `organism`; `None` when it has no records.
pub fn susceptibility_summary(
    df: &DataFrame,
    schema: &CaseSchema,
    tables: &ReferenceTables,
    organism: &str,
) -> Option<SusceptibilitySummary> {
    let by_organism = organism_rows(df, schema);
    let rows = by_organism.get(organism.trim())?;

    let mut summary = SusceptibilitySummary {
        organism: organism.trim().to_string(),
        isolates: rows.len(),
        all_sensitive: Vec::new(),
        all_resistant: Vec::new(),
        all_increased_exposure: Vec::new(),
    };
    for antibiotic in schema
        .antibiotics
        .iter()
        .filter(|name| tables.is_antibiotic(name))
    {
        let values = role_values(df, Some(antibiotic));
        let results: Vec<Option<SusceptibilityResult>> = rows
            .iter()
            .map(|&row| values[row].as_deref().and_then(|v| v.parse().ok()))
            .collect();
        let uniform = |wanted: SusceptibilityResult| results.iter().all(|r| *r == Some(wanted));

        if uniform(SusceptibilityResult::Sensitive) {
            summary.all_sensitive.push(antibiotic.clone());
        } else if uniform(SusceptibilityResult::Resistant) {
            summary.all_resistant.push(antibiotic.clone());
        } else if uniform(SusceptibilityResult::SensitiveIncreasedExposure) {
            summary.all_increased_exposure.push(antibiotic.clone());
        }
    }
    Some(summary)
}

/// Mean cell percentage per antibiotic class for `organism`, by class name.
pub fn class_profile(matrix: &ResistanceMatrix, organism: &str) -> Vec<ClassResistance> {
    let mut by_class: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for cell in matrix.organism_cells(organism.trim()) {
        let entry = by_class.entry(cell.antibiotic_class.as_str()).or_default();
        entry.0 += cell.percentage;
        entry.1 += 1;
    }
    by_class
        .into_iter()
        .map(|(class, (sum, count))| ClassResistance {
            class: class.to_string(),
            mean_percentage: round_one_decimal(sum / count as f64),
            antibiotics: count,
        })
        .collect()
}

/// Records with `result` per antibiotic column, highest count first.
///
/// Columns without any such record are listed with a zero count.
pub fn result_tally(
    df: &DataFrame,
    schema: &CaseSchema,
    tables: &ReferenceTables,
    result: SusceptibilityResult,
) -> Vec<TallyEntry> {
    let mut tally: Vec<TallyEntry> = schema
        .antibiotics
        .iter()
        .filter(|name| tables.is_antibiotic(name))
        .map(|antibiotic| TallyEntry {
            antibiotic: antibiotic.clone(),
            count: role_values(df, Some(antibiotic))
                .iter()
                .filter(|value| {
                    value
                        .as_deref()
                        .and_then(|v| v.parse::<SusceptibilityResult>().ok())
                        == Some(result)
                })
                .count(),
        })
        .collect();
    tally.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.antibiotic.cmp(&b.antibiotic))
    });
    tally
}

/// Count of each result value per requested antibiotic column, over the
/// records of `organisms` (every organism when empty).
///
/// Values are counted as written; blanks are skipped. A column absent from
/// `df` yields an empty distribution.
pub fn result_distribution(
    df: &DataFrame,
    schema: &CaseSchema,
    organisms: &[&str],
    antibiotics: &[&str],
) -> Vec<ResultDistribution> {
    let organism_values = role_values(df, schema.organism.as_deref());
    let selected: Vec<usize> = (0..df.height())
        .filter(|&row| {
            organisms.is_empty()
                || organism_values[row]
                    .as_deref()
                    .is_some_and(|value| organisms.iter().any(|wanted| wanted.trim() == value))
        })
        .collect();

    antibiotics
        .iter()
        .map(|antibiotic| {
            let values = column_string_values(df, antibiotic.trim());
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for value in selected.iter().filter_map(|&row| values[row].as_deref()) {
                *counts.entry(value).or_default() += 1;
            }
            let mut counts: Vec<(String, usize)> = counts
                .into_iter()
                .map(|(value, count)| (value.to_string(), count))
                .collect();
            counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ResultDistribution {
                antibiotic: antibiotic.trim().to_string(),
                counts,
            }
        })
        .collect()
}

/// Records per organism within `group`, most frequent first.
pub fn organism_frequency(
    df: &DataFrame,
    schema: &CaseSchema,
    tables: &ReferenceTables,
    group: OrganismGroup,
    top: Option<usize>,
) -> Vec<OrganismCount> {
    let mut counts: Vec<OrganismCount> = organism_rows(df, schema)
        .into_iter()
        .filter(|(organism, _)| tables.in_group(organism, group))
        .map(|(organism, rows)| OrganismCount {
            organism,
            count: rows.len(),
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.organism.cmp(&b.organism)));
    if let Some(top) = top {
        counts.truncate(top);
    }
    counts
}

/// Cells at 100% and cells from 80% up to (not including) 100%.
pub fn high_resistance_pairs(matrix: &ResistanceMatrix) -> HighResistancePairs {
    let (total, high): (Vec<ResistanceCell>, Vec<ResistanceCell>) = matrix
        .cells()
        .iter()
        .filter(|cell| cell.percentage >= HIGH_RESISTANCE_FROM)
        .cloned()
        .partition(|cell| cell.percentage >= 100.0);
    HighResistancePairs { total, high }
}

/// Highest-percentage cell for `organism`; ties go to the earlier column.
pub fn most_resistant<'a>(
    matrix: &'a ResistanceMatrix,
    organism: &str,
) -> Option<&'a ResistanceCell> {
    let organism = organism.trim();
    let mut best: Option<&ResistanceCell> = None;
    for antibiotic in matrix.antibiotics() {
        let Some(cell) = matrix.cell(organism, antibiotic) else {
            continue;
        };
        if best.is_none_or(|current| cell.percentage > current.percentage) {
            best = Some(cell);
        }
    }
    best
}

/// Every (class, antibiotic) pair of the coarse class table, in table order.
pub fn antibiotic_legend(tables: &ReferenceTables) -> Vec<LegendEntry> {
    tables
        .coarse_classes()
        .iter()
        .flat_map(|group| {
            group.antibiotics.iter().map(|antibiotic| LegendEntry {
                class: group.class.clone(),
                antibiotic: antibiotic.clone(),
            })
        })
        .collect()
}

/// Full profile for `organism`; `None` when it has no records.
pub fn organism_profile(
    df: &DataFrame,
    schema: &CaseSchema,
    tables: &ReferenceTables,
    matrix: &ResistanceMatrix,
    organism: &str,
) -> Option<OrganismProfile> {
    let susceptibility = susceptibility_summary(df, schema, tables, organism)?;
    let rows = organism_rows(df, schema)
        .remove(organism.trim())
        .unwrap_or_default();

    Some(OrganismProfile {
        organism: susceptibility.organism.clone(),
        isolates: susceptibility.isolates,
        top_service: mode(&role_values(df, schema.service.as_deref()), &rows),
        top_product: mode(&role_values(df, schema.product.as_deref()), &rows),
        classes: class_profile(matrix, organism),
        most_resistant: most_resistant(matrix, organism).cloned(),
        susceptibility,
    })
}

/// Most frequent non-blank value among `rows`; ties go to the smallest value.
fn mode(values: &[Option<String>], rows: &[usize]) -> Option<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &row in rows {
        if let Some(value) = values[row].as_deref() {
            *counts.entry(value).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, count)| (value.to_string(), count))
}
