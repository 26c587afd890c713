//! The pivoted resistance matrix.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use amr_common::format_percentage;
use amr_model::{GramStain, ResistanceCell};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use serde::Serialize;

use crate::aggregate::AggregationNotes;
use crate::error::Result;

/// Row key column holding the Gram stain label.
pub const GRAM_STAIN_COLUMN: &str = "Gram_Stain";

/// Column holding each organism's record count.
pub const ISOLATES_COLUMN: &str = "Isolates";

/// One matrix row: an organism with at least one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub gram_stain: GramStain,
    pub organism: String,
    /// Records of the organism in the aggregated frame.
    pub isolates: usize,
}

impl MatrixRow {
    /// Display label, e.g. `Escherichia coli (n=12)`.
    pub fn label(&self) -> String {
        format!("{} (n={})", self.organism, self.isolates)
    }
}

/// Resistance cells pivoted to (Gram stain, organism) rows and antibiotic
/// columns.
///
/// Rows sort by Gram stain label then organism; columns sort by antibiotic
/// name. A pair without a cell is absent, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResistanceMatrix {
    rows: Vec<MatrixRow>,
    antibiotics: Vec<String>,
    cells: Vec<ResistanceCell>,
    #[serde(skip)]
    index: HashMap<(String, String), usize>,
    #[serde(skip)]
    organism_column: String,
    notes: AggregationNotes,
}

impl ResistanceMatrix {
    pub fn from_cells(
        cells: Vec<ResistanceCell>,
        isolates: &BTreeMap<String, usize>,
        organism_column: String,
        notes: AggregationNotes,
    ) -> Self {
        let mut row_keys = BTreeSet::new();
        let mut antibiotics = BTreeSet::new();
        let mut index = HashMap::new();
        for (position, cell) in cells.iter().enumerate() {
            row_keys.insert((cell.gram_stain.as_str(), cell.gram_stain, cell.organism.clone()));
            antibiotics.insert(cell.antibiotic.clone());
            index.insert((cell.organism.clone(), cell.antibiotic.clone()), position);
        }
        let rows = row_keys
            .into_iter()
            .map(|(_, gram_stain, organism)| MatrixRow {
                gram_stain,
                isolates: isolates.get(&organism).copied().unwrap_or(0),
                organism,
            })
            .collect();

        Self {
            rows,
            antibiotics: antibiotics.into_iter().collect(),
            cells,
            index,
            organism_column,
            notes,
        }
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    /// Antibiotic columns in display order.
    pub fn antibiotics(&self) -> &[String] {
        &self.antibiotics
    }

    /// All cells in aggregation order.
    pub fn cells(&self) -> &[ResistanceCell] {
        &self.cells
    }

    pub fn notes(&self) -> &AggregationNotes {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, organism: &str, antibiotic: &str) -> Option<&ResistanceCell> {
        self.index
            .get(&(organism.to_string(), antibiotic.to_string()))
            .map(|&position| &self.cells[position])
    }

    /// Formatted percentage, `None` when the pair has no cell.
    pub fn value(&self, organism: &str, antibiotic: &str) -> Option<String> {
        self.cell(organism, antibiotic)
            .map(|cell| format_percentage(cell.percentage))
    }

    /// Cells of one organism, in aggregation order.
    pub fn organism_cells<'a>(
        &'a self,
        organism: &'a str,
    ) -> impl Iterator<Item = &'a ResistanceCell> + 'a {
        self.cells.iter().filter(move |cell| cell.organism == organism)
    }

    /// Cells flagged intrinsically resistant whose measured percentage is
    /// below 100.
    pub fn intrinsic_disagreements(&self) -> Vec<&ResistanceCell> {
        self.cells
            .iter()
            .filter(|cell| cell.intrinsic_disagrees())
            .collect()
    }

    /// The matrix as a text frame: Gram stain and organism key columns, the
    /// organism's record count, then one nullable column per antibiotic.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.antibiotics.len() + 3);
        columns.push(Column::from(Series::new(
            GRAM_STAIN_COLUMN.into(),
            self.rows
                .iter()
                .map(|row| row.gram_stain.as_str())
                .collect::<Vec<_>>(),
        )));
        columns.push(Column::from(Series::new(
            self.organism_column.as_str().into(),
            self.rows
                .iter()
                .map(|row| row.organism.clone())
                .collect::<Vec<_>>(),
        )));
        columns.push(Column::from(Series::new(
            ISOLATES_COLUMN.into(),
            self.rows
                .iter()
                .map(|row| row.isolates.to_string())
                .collect::<Vec<_>>(),
        )));
        for antibiotic in &self.antibiotics {
            let values: Vec<Option<String>> = self
                .rows
                .iter()
                .map(|row| self.value(&row.organism, antibiotic))
                .collect();
            columns.push(Column::from(Series::new(antibiotic.as_str().into(), values)));
        }
        Ok(DataFrame::new(columns)?)
    }
}
