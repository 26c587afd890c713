//! Schema matching: which input columns play which role.

use amr_standards::ReferenceTables;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Column roles located in one input frame.
///
/// Role fields hold the configured column name when the frame has it.
/// `antibiotics` keeps input column order, which fixes the order of the
/// deduplication signature and of the matrix source columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseSchema {
    pub process_id: Option<String>,
    pub organism: Option<String>,
    pub collection_date: Option<String>,
    pub date_format: String,
    pub sex: Option<String>,
    pub age: Option<String>,
    pub service: Option<String>,
    pub product: Option<String>,
    pub antibiotics: Vec<String>,
    /// Columns that matched no role and no antibiotic name.
    pub unmatched: Vec<String>,
    expected_process_id: String,
    expected_organism: String,
}

impl CaseSchema {
    /// Fail when a column the pipeline cannot run without is absent.
    pub fn validate(&self) -> Result<()> {
        if self.process_id.is_none() {
            return Err(IngestError::MissingColumn {
                role: "process identifier",
                column: self.expected_process_id.clone(),
            });
        }
        if self.organism.is_none() {
            return Err(IngestError::MissingColumn {
                role: "organism",
                column: self.expected_organism.clone(),
            });
        }
        Ok(())
    }

    pub fn has_antibiotic(&self, name: &str) -> bool {
        self.antibiotics.iter().any(|column| column == name)
    }
}

/// Locate the role columns and recognized antibiotic columns of `df`.
pub fn match_schema(df: &DataFrame, tables: &ReferenceTables) -> CaseSchema {
    let names = tables.columns();
    let present = |wanted: &str| -> Option<String> {
        df.get_column_index(wanted).map(|_| wanted.to_string())
    };
    let optional = |wanted: &Option<String>| wanted.as_deref().and_then(present);

    let mut schema = CaseSchema {
        process_id: present(&names.process_id),
        organism: present(&names.organism),
        collection_date: present(&names.collection_date),
        date_format: names.date_format.clone(),
        sex: optional(&names.sex),
        age: optional(&names.age),
        service: optional(&names.service),
        product: optional(&names.product),
        antibiotics: Vec::new(),
        unmatched: Vec::new(),
        expected_process_id: names.process_id.clone(),
        expected_organism: names.organism.clone(),
    };

    let roles: Vec<&str> = [
        Some(names.process_id.as_str()),
        Some(names.organism.as_str()),
        Some(names.collection_date.as_str()),
        names.sex.as_deref(),
        names.age.as_deref(),
        names.service.as_deref(),
        names.product.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    for column in df.get_column_names() {
        let column = column.as_str();
        if roles.contains(&column) {
            continue;
        }
        if tables.is_antibiotic(column) {
            schema.antibiotics.push(column.to_string());
        } else {
            schema.unmatched.push(column.to_string());
        }
    }

    if schema.collection_date.is_none() {
        warn!(
            column = %names.collection_date,
            "collection date column missing; every date treated as null"
        );
    }
    if !schema.unmatched.is_empty() {
        debug!(columns = ?schema.unmatched, "columns not used by the analysis");
    }
    debug!(
        antibiotics = schema.antibiotics.len(),
        "matched antibiotic columns"
    );
    schema
}
