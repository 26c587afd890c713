//! Tests for amr-model types.

use amr_model::{
    AnalysisOptions, GramStain, ResistanceCategory, ResistanceCell, SusceptibilityResult,
};

fn cell(percentage: f64, intrinsic: bool) -> ResistanceCell {
    ResistanceCell {
        organism: "Pseudomonas aeruginosa".to_string(),
        antibiotic: "Colistina".to_string(),
        tested: 10,
        resistant: 8,
        percentage,
        category: ResistanceCategory::from_percentage(percentage),
        gram_stain: GramStain::Negative,
        antibiotic_class: "Polimixina".to_string(),
        intrinsic_resistance: intrinsic,
    }
}

#[test]
fn intrinsic_marker_is_independent_of_percentage() {
    let flagged = cell(80.0, true);
    assert_eq!(flagged.intrinsic_marker(), "x");
    assert_eq!(flagged.category, ResistanceCategory::Moderate);
    assert!(flagged.intrinsic_disagrees());

    let plain = cell(80.0, false);
    assert_eq!(plain.intrinsic_marker(), "");
    assert!(!plain.intrinsic_disagrees());
}

#[test]
fn cell_serializes() {
    let json = serde_json::to_string(&cell(30.0, false)).expect("serialize cell");
    assert!(json.contains("\"category\":\"low\""));
    let round: ResistanceCell = serde_json::from_str(&json).expect("deserialize cell");
    assert_eq!(round.percentage, 30.0);
    assert_eq!(round.gram_stain, GramStain::Negative);
}

#[test]
fn default_window_is_fifteen_days() {
    let options = AnalysisOptions::default();
    assert_eq!(options.window_days, 15);
    assert_eq!(AnalysisOptions::new().with_window_days(7).window_days, 7);
}

#[test]
fn only_resistant_counts_as_resistant() {
    assert!(SusceptibilityResult::Resistant.is_resistant());
    assert!(!SusceptibilityResult::Intermediate.is_resistant());
    assert!(!SusceptibilityResult::SensitiveIncreasedExposure.is_resistant());
}
