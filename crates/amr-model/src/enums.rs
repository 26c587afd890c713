//! Type-safe enumerations for laboratory and reporting vocabulary.
//!
//! The laboratory export writes results in Portuguese; parsing also accepts
//! the English terms so hand-built test data and other laboratories' exports
//! read the same way.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reported outcome of one organism/antibiotic susceptibility test.
///
/// An untested pair has no result at all (`Option::None`), never a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SusceptibilityResult {
    /// Resistant (R).
    Resistant,
    /// Susceptible, standard dosing regimen (S).
    Sensitive,
    /// Susceptible, increased exposure (I under EUCAST 2019+).
    SensitiveIncreasedExposure,
    /// Intermediate, pre-2019 reporting.
    Intermediate,
}

impl SusceptibilityResult {
    /// The label as written by the laboratory export.
    pub fn as_str(&self) -> &'static str {
        match self {
            SusceptibilityResult::Resistant => "Resistente",
            SusceptibilityResult::Sensitive => "Sensível",
            SusceptibilityResult::SensitiveIncreasedExposure => "Sensível, com maior exposição.",
            SusceptibilityResult::Intermediate => "Intermédio",
        }
    }

    /// Returns true for the one result that counts towards resistance.
    pub fn is_resistant(&self) -> bool {
        matches!(self, SusceptibilityResult::Resistant)
    }
}

impl fmt::Display for SusceptibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SusceptibilityResult {
    type Err = String;

    /// Parse a result tag (case-insensitive, trailing period ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_end_matches('.').trim().to_lowercase();
        match normalized.as_str() {
            "resistente" | "resistant" | "r" => Ok(SusceptibilityResult::Resistant),
            "sensível" | "sensivel" | "sensitive" | "susceptible" | "s" => {
                Ok(SusceptibilityResult::Sensitive)
            }
            "sensível, com maior exposição"
            | "sensível com maior exposição"
            | "sensivel, com maior exposicao"
            | "sensivel com maior exposicao"
            | "sensitive, increased exposure"
            | "susceptible, increased exposure" => {
                Ok(SusceptibilityResult::SensitiveIncreasedExposure)
            }
            "intermédio" | "intermedio" | "intermediate" => Ok(SusceptibilityResult::Intermediate),
            _ => Err(format!("Unknown susceptibility result: {s}")),
        }
    }
}

/// Gram stain classification of an organism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GramStain {
    Negative,
    Positive,
    /// Not present in either reference list.
    Unknown,
}

impl GramStain {
    /// Display label used in the matrix row key.
    pub fn as_str(&self) -> &'static str {
        match self {
            GramStain::Negative => "Gram-Negativo",
            GramStain::Positive => "Gram-Positivo",
            GramStain::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for GramStain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Categorical band derived from a resistance percentage.
///
/// Both band edges belong to [`ResistanceCategory::Moderate`]: exactly 40%
/// and exactly 80% are moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResistanceCategory {
    /// Below 40%.
    Low,
    /// 40% to 80%, both ends inclusive.
    Moderate,
    /// Above 80%.
    High,
}

impl ResistanceCategory {
    /// Lower edge of the moderate band.
    pub const MODERATE_FROM: f64 = 40.0;
    /// Upper edge of the moderate band.
    pub const MODERATE_TO: f64 = 80.0;

    /// Classify a resistance percentage.
    ///
    /// Anything that is neither below 40 nor above 80 is moderate, so the
    /// function is total over `f64`.
    pub fn from_percentage(value: f64) -> Self {
        if value < Self::MODERATE_FROM {
            ResistanceCategory::Low
        } else if value > Self::MODERATE_TO {
            ResistanceCategory::High
        } else {
            ResistanceCategory::Moderate
        }
    }

    /// Legend text shown next to the band colour.
    pub fn label(&self) -> &'static str {
        match self {
            ResistanceCategory::Low => "Menos de 40% de estirpes resistentes",
            ResistanceCategory::Moderate => "40% a 80% de estirpes resistentes",
            ResistanceCategory::High => "Mais de 80% de estirpes resistentes",
        }
    }

    /// All bands from lowest to highest.
    pub fn all() -> [ResistanceCategory; 3] {
        [
            ResistanceCategory::Low,
            ResistanceCategory::Moderate,
            ResistanceCategory::High,
        ]
    }
}

impl fmt::Display for ResistanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Organism subsets used to filter frequency tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrganismGroup {
    #[default]
    All,
    GramPositive,
    GramNegative,
    /// Enterococcus faecium, S. aureus, K. pneumoniae, A. baumannii,
    /// P. aeruginosa and Enterobacter.
    Eskape,
}

impl OrganismGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganismGroup::All => "all",
            OrganismGroup::GramPositive => "gram-positive",
            OrganismGroup::GramNegative => "gram-negative",
            OrganismGroup::Eskape => "eskape",
        }
    }
}

impl FromStr for OrganismGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "all" | "microorganismo" => Ok(OrganismGroup::All),
            "gram-positive" | "gram-positivo" => Ok(OrganismGroup::GramPositive),
            "gram-negative" | "gram-negativo" => Ok(OrganismGroup::GramNegative),
            "eskape" => Ok(OrganismGroup::Eskape),
            _ => Err(format!("Unknown organism group: {s}")),
        }
    }
}
