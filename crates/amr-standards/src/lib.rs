//! Reference tables for antimicrobial resistance reporting.
//!
//! The tables (relevant organisms, Gram stain lists, antibiotic names, class
//! rules and the intrinsic-resistance map) live in a versioned TOML document.
//! A default copy is embedded at compile time; another can be loaded from a
//! path or from the directory named by [`STANDARDS_ENV_VAR`].
//!
//! Once loaded, [`ReferenceTables`] is immutable and is passed by reference
//! into every operation that needs it.

#![deny(unsafe_code)]

pub mod check;
pub mod classify;
pub mod document;
pub mod error;
pub mod paths;
pub mod tables;

pub use check::{FindingKind, ReferenceFinding};
pub use classify::{ClassRule, ClassRules, resistance_category};
pub use document::{ClassGroup, ColumnNames, ReferenceDocument, ReferenceHeader};
pub use error::{Result, StandardsError};
pub use paths::{STANDARDS_ENV_VAR, reference_path, standards_root};
pub use tables::{ReferenceTables, SCHEMA_NAME, SUPPORTED_SCHEMA_VERSION};
