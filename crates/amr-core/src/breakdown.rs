//! Share of isolates per sex value or age band.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use amr_common::percentage;
use amr_ingest::CaseSchema;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::filter::parse_age;
use crate::frame::role_values;

/// Width of one age band in years.
const AGE_BAND_WIDTH: u32 = 10;
/// Ages at or above this fall outside every band.
const AGE_LIMIT: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakdownKey {
    Sex,
    Age,
}

impl FromStr for BreakdownKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sex" | "sexo" => Ok(BreakdownKey::Sex),
            "age" | "idade" => Ok(BreakdownKey::Age),
            _ => Err(format!("Unknown breakdown key: {s}")),
        }
    }
}

/// A ten-year age band, `[start, start + 10)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AgeBand {
    pub start: u32,
}

impl AgeBand {
    pub fn of(age: f64) -> Option<Self> {
        if !(0.0..f64::from(AGE_LIMIT)).contains(&age) {
            return None;
        }
        let years = age.floor() as u32;
        Some(Self {
            start: years - years % AGE_BAND_WIDTH,
        })
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.start + AGE_BAND_WIDTH - 1)
    }
}

/// One breakdown line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub count: usize,
    /// Share of all considered isolates, including those without a value.
    pub percentage: f64,
}

/// Isolate counts per sex value or age band, optionally for one organism.
///
/// Sex values are listed in sorted order, age bands in ascending order.
/// Rows with a blank or unparseable value count towards the total but appear
/// in no entry.
pub fn isolate_breakdown(
    df: &DataFrame,
    schema: &CaseSchema,
    key: BreakdownKey,
    organism: Option<&str>,
) -> Vec<BreakdownEntry> {
    let organisms = role_values(df, schema.organism.as_deref());
    let rows: Vec<usize> = (0..df.height())
        .filter(|&row| match organism {
            Some(wanted) => organisms[row].as_deref() == Some(wanted.trim()),
            None => true,
        })
        .collect();
    let total = rows.len();

    match key {
        BreakdownKey::Sex => {
            let values = role_values(df, schema.sex.as_deref());
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for &row in &rows {
                if let Some(sex) = &values[row] {
                    *counts.entry(sex.clone()).or_default() += 1;
                }
            }
            entries(counts, total)
        }
        BreakdownKey::Age => {
            let values = role_values(df, schema.age.as_deref());
            let mut counts: BTreeMap<AgeBand, usize> = BTreeMap::new();
            for &row in &rows {
                if let Some(band) = values[row]
                    .as_deref()
                    .and_then(parse_age)
                    .and_then(AgeBand::of)
                {
                    *counts.entry(band).or_default() += 1;
                }
            }
            entries(counts, total)
        }
    }
}

fn entries<K: ToString>(counts: BTreeMap<K, usize>, total: usize) -> Vec<BreakdownEntry> {
    counts
        .into_iter()
        .map(|(label, count)| BreakdownEntry {
            label: label.to_string(),
            count,
            percentage: percentage(count, total).unwrap_or(0.0),
        })
        .collect()
}
