//! Tests for the summaries built on a deduplicated frame.

use amr_core::{
    AgeGroup, BreakdownKey, CaseFilter, aggregate, antibiotic_legend, class_profile,
    high_resistance_pairs, isolate_breakdown, most_resistant, organism_frequency,
    organism_profile, result_distribution, result_tally, susceptibility_summary,
};
use amr_ingest::{CaseSchema, match_schema};
use amr_model::{OrganismGroup, SusceptibilityResult};
use amr_standards::ReferenceTables;
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

const R: Option<&str> = Some("Resistente");
const S: Option<&str> = Some("Sensível");
const SIE: Option<&str> = Some("Sensível, com maior exposição.");

struct Case {
    organism: &'static str,
    sex: Option<&'static str>,
    age: Option<&'static str>,
    service: &'static str,
    meropenem: Option<&'static str>,
    vancomicina: Option<&'static str>,
    ciprofloxacina: Option<&'static str>,
}

fn case(organism: &'static str, results: [Option<&'static str>; 3]) -> Case {
    Case {
        organism,
        sex: Some("F"),
        age: Some("40"),
        service: "Medicina",
        meropenem: results[0],
        vancomicina: results[1],
        ciprofloxacina: results[2],
    }
}

fn frame(cases: &[Case]) -> DataFrame {
    let text = |f: fn(&Case) -> Option<&'static str>| cases.iter().map(f).collect::<Vec<_>>();
    DataFrame::new(vec![
        Column::from(Series::new(
            "Nº Processo".into(),
            (0..cases.len()).map(|i| format!("P{i}")).collect::<Vec<_>>(),
        )),
        Column::from(Series::new("Microorganismo".into(), text(|c| Some(c.organism)))),
        Column::from(Series::new("Sexo".into(), text(|c| c.sex))),
        Column::from(Series::new("Idade".into(), text(|c| c.age))),
        Column::from(Series::new("Serviço".into(), text(|c| Some(c.service)))),
        Column::from(Series::new("Meropenem".into(), text(|c| c.meropenem))),
        Column::from(Series::new("Vancomicina".into(), text(|c| c.vancomicina))),
        Column::from(Series::new("Ciprofloxacina".into(), text(|c| c.ciprofloxacina))),
    ])
    .expect("build frame")
}

fn setup(cases: &[Case]) -> (DataFrame, CaseSchema, ReferenceTables) {
    let tables = ReferenceTables::builtin().expect("builtin tables");
    let df = frame(cases);
    let schema = match_schema(&df, &tables);
    (df, schema, tables)
}

fn ecoli_and_friends() -> Vec<Case> {
    let mut cases = vec![
        case("Escherichia coli", [S, None, R]),
        case("Escherichia coli", [S, None, R]),
        case("Escherichia coli", [S, None, SIE]),
        case("Staphylococcus aureus", [None, R, S]),
        case("Klebsiella pneumoniae", [R, None, R]),
    ];
    cases[1].sex = Some("M");
    cases[2].age = Some("7");
    cases[3].service = "Urgência";
    cases[4].age = Some("sem registo");
    cases
}

#[test]
fn susceptibility_summary_lists_uniform_antibiotics() {
    let (df, schema, tables) = setup(&ecoli_and_friends());
    let summary =
        susceptibility_summary(&df, &schema, &tables, "Escherichia coli").expect("has records");

    assert_eq!(summary.isolates, 3);
    assert_eq!(summary.all_sensitive, vec!["Meropenem"]);
    assert!(summary.all_resistant.is_empty());
    assert!(summary.all_increased_exposure.is_empty());

    assert!(susceptibility_summary(&df, &schema, &tables, "Proteus mirabilis").is_none());
}

#[test]
fn class_profile_averages_cells() {
    let (df, schema, tables) = setup(&ecoli_and_friends());
    let matrix = aggregate(&df, &schema, &tables);
    let profile = class_profile(&matrix, "Escherichia coli");

    let classes: Vec<(&str, f64)> = profile
        .iter()
        .map(|entry| (entry.class.as_str(), entry.mean_percentage))
        .collect();
    assert_eq!(classes, vec![("Carbapenemes", 0.0), ("Fluoroquinolona", 66.7)]);
}

#[test]
fn tally_sorts_by_count_then_name() {
    let (df, schema, tables) = setup(&ecoli_and_friends());
    let tally = result_tally(&df, &schema, &tables, SusceptibilityResult::Resistant);

    let entries: Vec<(&str, usize)> = tally
        .iter()
        .map(|entry| (entry.antibiotic.as_str(), entry.count))
        .collect();
    assert_eq!(
        entries,
        vec![("Ciprofloxacina", 3), ("Meropenem", 1), ("Vancomicina", 1)]
    );
}

#[test]
fn organism_frequency_honours_group_and_top() {
    let (df, schema, tables) = setup(&ecoli_and_friends());

    let all = organism_frequency(&df, &schema, &tables, OrganismGroup::All, Some(2));
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].organism, "Escherichia coli");
    assert_eq!(all[0].count, 3);
    assert_eq!(all[1].organism, "Klebsiella pneumoniae");

    let eskape = organism_frequency(&df, &schema, &tables, OrganismGroup::Eskape, None);
    let names: Vec<&str> = eskape.iter().map(|c| c.organism.as_str()).collect();
    assert_eq!(names, vec!["Klebsiella pneumoniae", "Staphylococcus aureus"]);
}

#[test]
fn high_resistance_pairs_split_at_one_hundred() {
    let mut cases = ecoli_and_friends();
    cases.extend((0..4).map(|_| case("Klebsiella pneumoniae", [R, None, None])));
    cases.push(case("Klebsiella pneumoniae", [S, None, None]));
    let (df, schema, tables) = setup(&cases);
    let matrix = aggregate(&df, &schema, &tables);
    let pairs = high_resistance_pairs(&matrix);

    let total: Vec<(&str, &str)> = pairs
        .total
        .iter()
        .map(|c| (c.organism.as_str(), c.antibiotic.as_str()))
        .collect();
    let high: Vec<(&str, f64)> = pairs
        .high
        .iter()
        .map(|c| (c.antibiotic.as_str(), c.percentage))
        .collect();
    assert_eq!(
        total,
        vec![
            ("Klebsiella pneumoniae", "Ciprofloxacina"),
            ("Staphylococcus aureus", "Vancomicina"),
        ]
    );
    assert_eq!(high, vec![("Meropenem", 83.3)]);
}

#[test]
fn most_resistant_prefers_earlier_column_on_ties() {
    let (df, schema, tables) = setup(&[
        case("Escherichia coli", [R, None, R]),
        case("Escherichia coli", [S, None, S]),
    ]);
    let matrix = aggregate(&df, &schema, &tables);
    let cell = most_resistant(&matrix, "Escherichia coli").expect("has cells");

    assert_eq!(cell.antibiotic, "Ciprofloxacina");
    assert_eq!(cell.percentage, 50.0);
    assert!(most_resistant(&matrix, "Proteus mirabilis").is_none());
}

#[test]
fn breakdown_by_sex_and_age() {
    let (df, schema, _) = setup(&ecoli_and_friends());

    let by_sex = isolate_breakdown(&df, &schema, BreakdownKey::Sex, None);
    let sexes: Vec<(&str, usize, f64)> = by_sex
        .iter()
        .map(|e| (e.label.as_str(), e.count, e.percentage))
        .collect();
    assert_eq!(sexes, vec![("F", 4, 80.0), ("M", 1, 20.0)]);

    let by_age = isolate_breakdown(&df, &schema, BreakdownKey::Age, Some("Escherichia coli"));
    let ages: Vec<(&str, usize)> = by_age.iter().map(|e| (e.label.as_str(), e.count)).collect();
    assert_eq!(ages, vec![("0-9", 1), ("40-49", 2)]);

    let all_ages = isolate_breakdown(&df, &schema, BreakdownKey::Age, None);
    let counted: usize = all_ages.iter().map(|e| e.count).sum();
    assert_eq!(counted, 4);
}

#[test]
fn case_filter_combines_criteria() {
    let (df, schema, tables) = setup(&ecoli_and_friends());

    let adults = CaseFilter::new()
        .with_organism("Escherichia coli")
        .with_age_group(AgeGroup::Adult)
        .apply(&df, &schema, &tables)
        .expect("filter");
    assert_eq!(adults.height(), 2);

    let urgent = CaseFilter::new()
        .with_service("Urgência")
        .apply(&df, &schema, &tables)
        .expect("filter");
    assert_eq!(urgent.height(), 1);

    let no_product_column = CaseFilter::new()
        .with_product("Sangue")
        .apply(&df, &schema, &tables)
        .expect("filter");
    assert_eq!(no_product_column.height(), 0);

    let gram_positive = CaseFilter::new()
        .with_group(OrganismGroup::GramPositive)
        .apply(&df, &schema, &tables)
        .expect("filter");
    assert_eq!(gram_positive.height(), 1);
}

#[test]
fn relevant_only_filter_drops_unlisted_organisms() {
    let mut cases = ecoli_and_friends();
    cases.push(case("Candida albicans", [None, None, None]));
    let (df, schema, tables) = setup(&cases);

    let relevant = CaseFilter::new()
        .with_relevant_only(true)
        .apply(&df, &schema, &tables)
        .expect("filter");
    assert_eq!(relevant.height(), 5);
    assert!(!CaseFilter::new().with_relevant_only(true).is_empty());
}

#[test]
fn result_distribution_counts_each_selected_antibiotic() {
    let (df, schema, _) = setup(&ecoli_and_friends());
    let organisms = ["Escherichia coli", "Klebsiella pneumoniae"];

    let distribution = result_distribution(
        &df,
        &schema,
        &organisms,
        &["Ciprofloxacina", "Meropenem", "Vancomicina"],
    );

    assert_eq!(distribution.len(), 3);
    assert_eq!(distribution[0].antibiotic, "Ciprofloxacina");
    assert_eq!(
        distribution[0].counts,
        vec![
            ("Resistente".to_string(), 3),
            ("Sensível, com maior exposição.".to_string(), 1),
        ]
    );
    assert_eq!(
        distribution[1].counts,
        vec![("Sensível".to_string(), 3), ("Resistente".to_string(), 1)]
    );
    assert_eq!(distribution[1].total(), 4);
    assert!(distribution[2].counts.is_empty());

    let everyone = result_distribution(&df, &schema, &[], &["Vancomicina", "Amicacina"]);
    assert_eq!(everyone[0].counts, vec![("Resistente".to_string(), 1)]);
    assert!(everyone[1].counts.is_empty());
}

#[test]
fn case_filter_accepts_several_organisms() {
    let (df, schema, tables) = setup(&ecoli_and_friends());

    let selected = CaseFilter::new()
        .with_organisms(["Escherichia coli", " Klebsiella pneumoniae "])
        .apply(&df, &schema, &tables)
        .expect("filter");
    assert_eq!(selected.height(), 4);
}

#[test]
fn organism_profile_collects_everything() {
    let (df, schema, tables) = setup(&ecoli_and_friends());
    let matrix = aggregate(&df, &schema, &tables);
    let profile =
        organism_profile(&df, &schema, &tables, &matrix, "Escherichia coli").expect("profile");

    assert_eq!(profile.isolates, 3);
    assert_eq!(profile.top_service, Some(("Medicina".to_string(), 3)));
    assert_eq!(profile.top_product, None);
    assert_eq!(
        profile.most_resistant.map(|cell| cell.antibiotic),
        Some("Ciprofloxacina".to_string())
    );
}

#[test]
fn legend_follows_coarse_table_order() {
    let tables = ReferenceTables::builtin().expect("builtin tables");
    let legend = antibiotic_legend(&tables);

    assert_eq!(legend[0].class, "Aminoglicosídeos");
    assert_eq!(legend[0].antibiotic, "Amicacina");
    assert!(
        legend
            .iter()
            .any(|entry| entry.class == "Glicopeptídeos" && entry.antibiotic == "Vancomicina")
    );
    assert_eq!(legend.last().map(|e| e.antibiotic.as_str()), Some("Daptomicina"));
}
