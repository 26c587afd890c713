#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// On-disk shape of `reference.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub reference: ReferenceHeader,
    pub columns: ColumnNames,
    pub organisms: OrganismLists,
    pub antibiotics: Vec<String>,
    /// Override groups, checked in order before `coarse_classes`.
    #[serde(default)]
    pub class_rules: Vec<ClassGroup>,
    #[serde(default)]
    pub coarse_classes: Vec<ClassGroup>,
    #[serde(default = "default_class")]
    pub default_class: String,
    #[serde(default)]
    pub intrinsic_resistance: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceHeader {
    pub schema: String,
    pub schema_version: u32,
}

/// Input column names of the laboratory export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnNames {
    pub process_id: String,
    pub organism: String,
    pub collection_date: String,
    /// chrono format string for `collection_date`.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    /// Personally identifying columns dropped at ingest.
    #[serde(default)]
    pub identifying: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganismLists {
    pub relevant: Vec<String>,
    #[serde(default)]
    pub gram_positive: Vec<String>,
    #[serde(default)]
    pub gram_negative: Vec<String>,
    #[serde(default)]
    pub eskape: Vec<String>,
}

/// A named set of antibiotics sharing one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassGroup {
    pub class: String,
    pub antibiotics: Vec<String>,
}

fn default_class() -> String {
    "Outros".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}
