//! Tests for resistance aggregation and the matrix.

use amr_common::column_string_values;
use amr_core::aggregate;
use amr_ingest::match_schema;
use amr_model::{GramStain, ResistanceCategory};
use amr_standards::ReferenceTables;
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

fn tables() -> ReferenceTables {
    ReferenceTables::builtin().expect("builtin tables")
}

/// One record per entry: organism and its (antibiotic column, result) pairs.
fn records(antibiotics: &[&str], rows: &[(&str, Vec<Option<&str>>)]) -> DataFrame {
    let mut columns = vec![
        Column::from(Series::new(
            "Nº Processo".into(),
            (0..rows.len()).map(|i| format!("P{i}")).collect::<Vec<_>>(),
        )),
        Column::from(Series::new(
            "Microorganismo".into(),
            rows.iter().map(|(organism, _)| *organism).collect::<Vec<_>>(),
        )),
    ];
    for (position, antibiotic) in antibiotics.iter().enumerate() {
        let values: Vec<Option<&str>> =
            rows.iter().map(|(_, results)| results[position]).collect();
        columns.push(Column::from(Series::new((*antibiotic).into(), values)));
    }
    DataFrame::new(columns).expect("build frame")
}

type Row = (&'static str, Vec<Option<&'static str>>);

fn repeat(organism: &'static str, result: Option<&'static str>, times: usize) -> Vec<Row> {
    (0..times).map(|_| (organism, vec![result])).collect()
}

const R: Option<&str> = Some("Resistente");
const S: Option<&str> = Some("Sensível");

#[test]
fn klebsiella_meropenem_three_of_ten() {
    let mut rows = repeat("Klebsiella pneumoniae", R, 3);
    rows.extend(repeat("Klebsiella pneumoniae", S, 7));
    let df = records(&["Meropenem"], &rows);
    let tables = tables();
    let matrix = aggregate(&df, &match_schema(&df, &tables), &tables);

    let cell = matrix
        .cell("Klebsiella pneumoniae", "Meropenem")
        .expect("cell present");
    assert_eq!(cell.tested, 10);
    assert_eq!(cell.resistant, 3);
    assert_eq!(cell.percentage, 30.0);
    assert_eq!(cell.category, ResistanceCategory::Low);
    assert_eq!(cell.antibiotic_class, "Carbapenemes");
    assert_eq!(cell.gram_stain, GramStain::Negative);
    assert_eq!(matrix.value("Klebsiella pneumoniae", "Meropenem").as_deref(), Some("30"));
}

#[test]
fn intrinsic_flag_is_independent_of_measured_resistance() {
    let mut rows = repeat("Pseudomonas aeruginosa", R, 8);
    rows.extend(repeat("Pseudomonas aeruginosa", S, 2));
    let df = records(&["Colistina"], &rows);
    let tables = tables();
    let matrix = aggregate(&df, &match_schema(&df, &tables), &tables);

    let cell = matrix
        .cell("Pseudomonas aeruginosa", "Colistina")
        .expect("cell present");
    assert_eq!(cell.percentage, 80.0);
    assert_eq!(cell.category, ResistanceCategory::Moderate);
    assert!(cell.intrinsic_resistance);
    assert_eq!(cell.intrinsic_marker(), "x");
    assert_eq!(matrix.intrinsic_disagreements().len(), 1);
}

#[test]
fn band_edges_are_moderate() {
    let mut rows = repeat("Escherichia coli", R, 2);
    rows.extend(repeat("Escherichia coli", S, 3));
    let df = records(&["Ciprofloxacina"], &rows);
    let tables = tables();
    let matrix = aggregate(&df, &match_schema(&df, &tables), &tables);

    let cell = matrix
        .cell("Escherichia coli", "Ciprofloxacina")
        .expect("cell present");
    assert_eq!(cell.percentage, 40.0);
    assert_eq!(cell.category, ResistanceCategory::Moderate);
}

#[test]
fn untested_pair_is_absent_not_zero() {
    let rows = vec![
        ("Escherichia coli", vec![S, None]),
        ("Escherichia coli", vec![S, None]),
        ("Staphylococcus aureus", vec![None, R]),
    ];
    let df = records(&["Meropenem", "Vancomicina"], &rows);
    let tables = tables();
    let matrix = aggregate(&df, &match_schema(&df, &tables), &tables);

    assert!(matrix.cell("Escherichia coli", "Vancomicina").is_none());
    assert!(matrix.cell("Staphylococcus aureus", "Meropenem").is_none());
    assert_eq!(matrix.value("Escherichia coli", "Meropenem").as_deref(), Some("0"));

    let frame = matrix.to_dataframe().expect("matrix frame");
    assert_eq!(
        column_string_values(&frame, "Vancomicina"),
        vec![None, Some("100".to_string())]
    );
}

#[test]
fn rows_sort_by_gram_label_then_organism_and_columns_by_name() {
    let rows = vec![
        ("Staphylococcus aureus", vec![R, S]),
        ("Klebsiella pneumoniae", vec![S, S]),
        ("Escherichia coli", vec![S, R]),
    ];
    let df = records(&["Vancomicina", "Amicacina"], &rows);
    let tables = tables();
    let matrix = aggregate(&df, &match_schema(&df, &tables), &tables);

    let labels: Vec<String> = matrix.rows().iter().map(|row| row.label()).collect();
    assert_eq!(
        labels,
        vec![
            "Escherichia coli (n=1)",
            "Klebsiella pneumoniae (n=1)",
            "Staphylococcus aureus (n=1)"
        ]
    );
    assert_eq!(matrix.rows()[2].gram_stain, GramStain::Positive);
    assert_eq!(matrix.antibiotics(), ["Amicacina", "Vancomicina"]);

    let frame = matrix.to_dataframe().expect("matrix frame");
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        names,
        ["Gram_Stain", "Microorganismo", "Isolates", "Amicacina", "Vancomicina"]
    );
    assert_eq!(
        column_string_values(&frame, "Isolates"),
        vec![Some("1".to_string()); 3]
    );
}

#[test]
fn one_decimal_rounding() {
    let rows = vec![
        ("Escherichia coli", vec![R]),
        ("Escherichia coli", vec![R]),
        ("Escherichia coli", vec![S]),
    ];
    let df = records(&["Gentamicina"], &rows);
    let tables = tables();
    let matrix = aggregate(&df, &match_schema(&df, &tables), &tables);

    assert_eq!(matrix.value("Escherichia coli", "Gentamicina").as_deref(), Some("66.7"));
}

#[test]
fn irrelevant_organisms_and_unknown_tags() {
    let rows = vec![
        ("Candida albicans", vec![R]),
        ("Escherichia coli", vec![Some("Positivo")]),
        ("Escherichia coli", vec![R]),
    ];
    let df = records(&["Meropenem"], &rows);
    let tables = tables();
    let matrix = aggregate(&df, &match_schema(&df, &tables), &tables);

    assert!(matrix.cell("Candida albicans", "Meropenem").is_none());
    let cell = matrix.cell("Escherichia coli", "Meropenem").expect("cell");
    assert_eq!((cell.tested, cell.resistant), (2, 1));
    assert_eq!(matrix.notes().unrecognized_results, 1);
    assert!(
        matrix
            .notes()
            .organisms_without_records
            .contains(&"Staphylococcus aureus".to_string())
    );
}

#[test]
fn aggregation_is_idempotent() {
    let rows = vec![
        ("Escherichia coli", vec![R, S]),
        ("Staphylococcus aureus", vec![S, None]),
        ("Escherichia coli", vec![S, S]),
    ];
    let df = records(&["Meropenem", "Vancomicina"], &rows);
    let tables = tables();
    let schema = match_schema(&df, &tables);

    assert_eq!(aggregate(&df, &schema, &tables), aggregate(&df, &schema, &tables));
}

#[test]
fn empty_frame_gives_empty_matrix() {
    let df = records(&["Meropenem"], &[]);
    let tables = tables();
    let matrix = aggregate(&df, &match_schema(&df, &tables), &tables);

    assert!(matrix.is_empty());
    assert_eq!(matrix.to_dataframe().expect("frame").height(), 0);
}
