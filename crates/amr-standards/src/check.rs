//! Informational self-check of the reference tables.

#![deny(unsafe_code)]

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::tables::ReferenceTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    OrganismInBothGramLists,
    RelevantWithoutGramStain,
    AntibioticInSeveralOverrideGroups,
    EmptyIntrinsicEntry,
    IntrinsicEntryNotAnAntibiotic,
}

/// A table inconsistency worth reporting. Findings never abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceFinding {
    pub kind: FindingKind,
    pub subject: String,
    pub message: String,
}

impl ReferenceFinding {
    fn new(kind: FindingKind, subject: &str, message: String) -> Self {
        Self {
            kind,
            subject: subject.to_string(),
            message,
        }
    }
}

impl ReferenceTables {
    /// Inspect the tables for overlaps and gaps.
    pub fn check(&self) -> Vec<ReferenceFinding> {
        let document = self.document();
        let mut findings = Vec::new();

        let positive: HashSet<&str> = document
            .organisms
            .gram_positive
            .iter()
            .map(|name| name.trim())
            .collect();
        for organism in &document.organisms.gram_negative {
            if positive.contains(organism.trim()) {
                findings.push(ReferenceFinding::new(
                    FindingKind::OrganismInBothGramLists,
                    organism,
                    format!("{organism} is listed as both Gram-positive and Gram-negative"),
                ));
            }
        }

        for organism in &document.organisms.relevant {
            if self.gram_stain(organism) == amr_model::GramStain::Unknown {
                findings.push(ReferenceFinding::new(
                    FindingKind::RelevantWithoutGramStain,
                    organism,
                    format!("{organism} is relevant but has no Gram stain classification"),
                ));
            }
        }

        let mut groups_by_antibiotic: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for group in self.override_groups() {
            for antibiotic in &group.antibiotics {
                groups_by_antibiotic
                    .entry(antibiotic.trim())
                    .or_default()
                    .push(group.class.as_str());
            }
        }
        for (antibiotic, groups) in groups_by_antibiotic {
            if groups.len() > 1 {
                findings.push(ReferenceFinding::new(
                    FindingKind::AntibioticInSeveralOverrideGroups,
                    antibiotic,
                    format!(
                        "{antibiotic} appears in override groups {}; {} wins",
                        groups.join(", "),
                        groups[0]
                    ),
                ));
            }
        }

        for (organism, antibiotics) in &document.intrinsic_resistance {
            if antibiotics.is_empty() {
                findings.push(ReferenceFinding::new(
                    FindingKind::EmptyIntrinsicEntry,
                    organism,
                    format!("{organism} has no intrinsic resistances listed"),
                ));
            }
            for antibiotic in antibiotics {
                if !self.is_antibiotic(antibiotic) {
                    findings.push(ReferenceFinding::new(
                        FindingKind::IntrinsicEntryNotAnAntibiotic,
                        organism,
                        format!(
                            "{organism}: intrinsic entry {antibiotic} is not a recognized antibiotic column"
                        ),
                    ));
                }
            }
        }

        findings
    }
}
