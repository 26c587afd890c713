//! Report files written by `amr report --output-dir`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use amr_common::column_string_values;
use amr_core::{Deduplication, ResistanceMatrix};
use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::info;

pub const KEPT_FILE: &str = "kept.csv";
pub const DUPLICATES_FILE: &str = "duplicates.csv";
pub const MATRIX_FILE: &str = "matrix.csv";
pub const CELLS_FILE: &str = "cells.json";

/// Paths of the files written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub kept: PathBuf,
    pub duplicates: PathBuf,
    pub matrix: PathBuf,
    pub cells: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            kept: dir.join(KEPT_FILE),
            duplicates: dir.join(DUPLICATES_FILE),
            matrix: dir.join(MATRIX_FILE),
            cells: dir.join(CELLS_FILE),
        }
    }
}

/// Write `df` as CSV text. Null and blank cells are written empty.
pub fn write_frame_csv<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let columns: Vec<Vec<Option<String>>> = names
        .iter()
        .map(|name| column_string_values(df, name))
        .collect();

    let mut wrt = csv::Writer::from_writer(writer);
    wrt.write_record(&names).context("write header")?;
    for row in 0..df.height() {
        wrt.write_record(
            columns
                .iter()
                .map(|column| column[row].as_deref().unwrap_or("")),
        )
        .with_context(|| format!("write row {row}"))?;
    }
    wrt.flush().context("flush csv")?;
    Ok(())
}

/// Write the matrix with its Gram stain and organism key columns.
pub fn write_matrix_csv<W: Write>(matrix: &ResistanceMatrix, writer: W) -> Result<()> {
    let frame = matrix.to_dataframe().context("build matrix frame")?;
    write_frame_csv(&frame, writer)
}

/// Write every resistance cell, with counts and flags, as pretty JSON.
pub fn write_cells_json<W: Write>(matrix: &ResistanceMatrix, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, matrix.cells()).context("serialize cells")?;
    Ok(())
}

/// Write the four report files into `dir`, creating it when missing.
pub fn write_report_outputs(
    dir: &Path,
    deduplication: &Deduplication,
    matrix: &ResistanceMatrix,
) -> Result<OutputPaths> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let paths = OutputPaths::in_dir(dir);

    write_frame_csv(&deduplication.kept, create(&paths.kept)?)?;
    write_frame_csv(&deduplication.duplicates, create(&paths.duplicates)?)?;
    write_matrix_csv(matrix, create(&paths.matrix)?)?;
    let mut cells = create(&paths.cells)?;
    write_cells_json(matrix, &mut cells)?;
    cells
        .flush()
        .with_context(|| format!("flush {}", paths.cells.display()))?;

    info!(dir = %dir.display(), "report files written");
    Ok(paths)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
