//! Classification helpers usable standalone by a presentation layer.
//!
//! Antibiotic classes resolve through an ordered rule list: override groups
//! first (carbapenems, anti-MRSA agents, polymyxins, ...), then the coarse
//! class table, then the default class. The first matching rule wins, so an
//! antibiotic listed in several groups always takes the earliest one.

#![deny(unsafe_code)]

use std::collections::HashSet;

use amr_model::{INTRINSIC_MARKER, ResistanceCategory};

use crate::document::ClassGroup;
use crate::tables::ReferenceTables;

/// One `(membership, class)` rule.
#[derive(Debug, Clone)]
pub struct ClassRule {
    class: String,
    members: HashSet<String>,
}

impl ClassRule {
    pub fn new<I, S>(class: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            class: class.into(),
            members: members
                .into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .collect(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn matches(&self, antibiotic: &str) -> bool {
        self.members.contains(antibiotic)
    }
}

/// Ordered class rules with an explicit default.
#[derive(Debug, Clone)]
pub struct ClassRules {
    rules: Vec<ClassRule>,
    default_class: String,
}

impl ClassRules {
    pub fn new(rules: Vec<ClassRule>, default_class: impl Into<String>) -> Self {
        Self {
            rules,
            default_class: default_class.into(),
        }
    }

    pub fn from_groups<'a>(
        groups: impl IntoIterator<Item = &'a ClassGroup>,
        default_class: &str,
    ) -> Self {
        let rules = groups
            .into_iter()
            .map(|group| ClassRule::new(group.class.clone(), &group.antibiotics))
            .collect();
        Self::new(rules, default_class)
    }

    /// Class of `antibiotic`; never empty.
    pub fn resolve(&self, antibiotic: &str) -> &str {
        let antibiotic = antibiotic.trim();
        self.rules
            .iter()
            .find(|rule| rule.matches(antibiotic))
            .map_or(self.default_class.as_str(), ClassRule::class)
    }

    pub fn default_class(&self) -> &str {
        &self.default_class
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Band for a resistance percentage.
pub fn resistance_category(percentage: f64) -> ResistanceCategory {
    ResistanceCategory::from_percentage(percentage)
}

impl ReferenceTables {
    pub fn antibiotic_class(&self, antibiotic: &str) -> &str {
        self.class_rules().resolve(antibiotic)
    }

    /// Exact lookup in the intrinsic-resistance map.
    ///
    /// Informational only: the flag never alters a measured percentage.
    pub fn is_intrinsically_resistant(&self, organism: &str, antibiotic: &str) -> bool {
        let antibiotic = antibiotic.trim();
        self.intrinsic_resistance()
            .get(organism.trim())
            .is_some_and(|list| list.iter().any(|name| name.trim() == antibiotic))
    }

    /// [`INTRINSIC_MARKER`] when intrinsically resistant, empty otherwise.
    pub fn intrinsic_marker(&self, organism: &str, antibiotic: &str) -> &'static str {
        if self.is_intrinsically_resistant(organism, antibiotic) {
            INTRINSIC_MARKER
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_wins() {
        let rules = ClassRules::new(
            vec![
                ClassRule::new("Carbapenemes", ["Meropenem"]),
                ClassRule::new("Beta-lactâmicos", ["Meropenem", "Ampicillina"]),
            ],
            "Outros",
        );
        assert_eq!(rules.resolve("Meropenem"), "Carbapenemes");
        assert_eq!(rules.resolve(" Ampicillina "), "Beta-lactâmicos");
        assert_eq!(rules.resolve("Novobiocina"), "Outros");
    }

    #[test]
    fn empty_rules_fall_back_to_default() {
        let rules = ClassRules::new(Vec::new(), "Outros");
        assert!(rules.is_empty());
        assert_eq!(rules.resolve(""), "Outros");
    }
}
