#![deny(unsafe_code)]

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use amr_model::{GramStain, OrganismGroup};
use tracing::debug;

use crate::classify::ClassRules;
use crate::document::{ClassGroup, ColumnNames, ReferenceDocument};
use crate::error::{Result, StandardsError};
use crate::paths::{STANDARDS_ENV_VAR, reference_path};

/// Schema identifier expected in the `[reference]` header.
pub const SCHEMA_NAME: &str = "amr-reference";

/// Highest `schema_version` this build understands.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 1;

const BUILTIN_REFERENCE: &str = include_str!("../../../standards/reference.toml");
const BUILTIN_PATH: &str = "<builtin>/reference.toml";

/// Loaded, validated reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    source: PathBuf,
    document: ReferenceDocument,
    gram_positive: HashSet<String>,
    gram_negative: HashSet<String>,
    eskape: HashSet<String>,
    relevant: HashSet<String>,
    antibiotics: HashSet<String>,
    class_rules: ClassRules,
}

impl ReferenceTables {
    /// The tables embedded at compile time.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_REFERENCE, BUILTIN_PATH)
    }

    /// Load a reference document from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        Self::from_toml_str(&text, path)
    }

    /// Load from `AMR_STANDARDS_DIR` when set, otherwise the builtin tables.
    pub fn from_env() -> Result<Self> {
        if std::env::var_os(STANDARDS_ENV_VAR).is_some() {
            Self::load(&reference_path())
        } else {
            Self::builtin()
        }
    }

    /// Parse and validate a reference document.
    pub fn from_toml_str(text: &str, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let document: ReferenceDocument =
            toml::from_str(text).map_err(|e| StandardsError::Toml {
                path: source.clone(),
                source: e,
            })?;
        Self::from_document(document, source)
    }

    pub fn from_document(document: ReferenceDocument, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        validate(&document, &source)?;

        let class_rules = ClassRules::from_groups(
            document.class_rules.iter().chain(&document.coarse_classes),
            &document.default_class,
        );
        let tables = Self {
            gram_positive: name_set(&document.organisms.gram_positive),
            gram_negative: name_set(&document.organisms.gram_negative),
            eskape: name_set(&document.organisms.eskape),
            relevant: name_set(&document.organisms.relevant),
            antibiotics: name_set(&document.antibiotics),
            class_rules,
            document,
            source,
        };
        debug!(
            source = %tables.source.display(),
            organisms = tables.document.organisms.relevant.len(),
            antibiotics = tables.document.antibiotics.len(),
            class_rules = tables.class_rules.len(),
            "loaded reference tables"
        );
        Ok(tables)
    }

    /// Where the tables were loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn document(&self) -> &ReferenceDocument {
        &self.document
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.document.columns
    }

    /// Relevant organisms in table order.
    pub fn relevant_organisms(&self) -> &[String] {
        &self.document.organisms.relevant
    }

    pub fn is_relevant_organism(&self, organism: &str) -> bool {
        self.relevant.contains(organism.trim())
    }

    /// Recognized antibiotic names in table order.
    pub fn antibiotics(&self) -> &[String] {
        &self.document.antibiotics
    }

    pub fn is_antibiotic(&self, name: &str) -> bool {
        self.antibiotics.contains(name.trim())
    }

    pub fn class_rules(&self) -> &ClassRules {
        &self.class_rules
    }

    /// Override groups in precedence order.
    pub fn override_groups(&self) -> &[ClassGroup] {
        &self.document.class_rules
    }

    /// Coarse class table in document order.
    pub fn coarse_classes(&self) -> &[ClassGroup] {
        &self.document.coarse_classes
    }

    pub fn intrinsic_resistance(&self) -> &BTreeMap<String, Vec<String>> {
        &self.document.intrinsic_resistance
    }

    /// Gram stain by exact lookup; anything in neither list is `Unknown`.
    pub fn gram_stain(&self, organism: &str) -> GramStain {
        let organism = organism.trim();
        if self.gram_positive.contains(organism) {
            GramStain::Positive
        } else if self.gram_negative.contains(organism) {
            GramStain::Negative
        } else {
            GramStain::Unknown
        }
    }

    /// Whether `organism` belongs to `group`. `All` admits every organism.
    pub fn in_group(&self, organism: &str, group: OrganismGroup) -> bool {
        let organism = organism.trim();
        match group {
            OrganismGroup::All => true,
            OrganismGroup::GramPositive => self.gram_positive.contains(organism),
            OrganismGroup::GramNegative => self.gram_negative.contains(organism),
            OrganismGroup::Eskape => self.eskape.contains(organism),
        }
    }
}

fn name_set(names: &[String]) -> HashSet<String> {
    names.iter().map(|name| name.trim().to_string()).collect()
}

fn validate(document: &ReferenceDocument, source: &Path) -> Result<()> {
    let header = &document.reference;
    if header.schema != SCHEMA_NAME || header.schema_version > SUPPORTED_SCHEMA_VERSION {
        return Err(StandardsError::UnsupportedSchema {
            path: source.to_path_buf(),
            schema: header.schema.clone(),
            version: header.schema_version,
        });
    }
    if document.organisms.relevant.is_empty() {
        return Err(StandardsError::invalid(source, "relevant organism list is empty"));
    }
    if document.antibiotics.is_empty() {
        return Err(StandardsError::invalid(source, "antibiotic list is empty"));
    }
    if document.default_class.trim().is_empty() {
        return Err(StandardsError::invalid(source, "default_class is empty"));
    }
    let columns = &document.columns;
    for (role, name) in [
        ("process_id", &columns.process_id),
        ("organism", &columns.organism),
        ("collection_date", &columns.collection_date),
    ] {
        if name.trim().is_empty() {
            return Err(StandardsError::invalid(
                source,
                format!("column name for {role} is empty"),
            ));
        }
    }
    for group in document.class_rules.iter().chain(&document.coarse_classes) {
        if group.class.trim().is_empty() {
            return Err(StandardsError::invalid(source, "class group without a name"));
        }
    }
    Ok(())
}
