//! Property tests for deduplication and aggregation invariants.

use std::collections::HashSet;

use amr_common::{column_string_values, day_gap};
use amr_core::{aggregate, deduplicate};
use amr_ingest::match_schema;
use amr_model::ResistanceCategory;
use amr_standards::ReferenceTables;
use chrono::{Days, NaiveDate};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use proptest::prelude::*;

const PROCESS_IDS: [&str; 3] = ["P1", "P2", "P3"];
const ORGANISMS: [&str; 3] = [
    "Escherichia coli",
    "Klebsiella pneumoniae",
    "Pseudomonas aeruginosa",
];
const RESULTS: [Option<&str>; 5] = [
    Some("Resistente"),
    Some("Sensível"),
    Some("Sensível, com maior exposição."),
    Some("Indeterminado"),
    None,
];

#[derive(Debug, Clone)]
struct Row {
    process_id: usize,
    organism: usize,
    day: Option<u64>,
    meropenem: usize,
    colistina: usize,
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        0..PROCESS_IDS.len(),
        0..ORGANISMS.len(),
        proptest::option::weighted(0.9, 0u64..60),
        0..RESULTS.len(),
        0..RESULTS.len(),
    )
        .prop_map(|(process_id, organism, day, meropenem, colistina)| Row {
            process_id,
            organism,
            day,
            meropenem,
            colistina,
        })
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

fn frame(rows: &[Row]) -> DataFrame {
    let dates: Vec<Option<String>> = rows
        .iter()
        .map(|row| {
            row.day.map(|day| {
                (base_date() + Days::new(day))
                    .format("%d/%m/%Y")
                    .to_string()
            })
        })
        .collect();
    DataFrame::new(vec![
        Column::from(Series::new(
            "Nº Processo".into(),
            rows.iter().map(|r| PROCESS_IDS[r.process_id]).collect::<Vec<_>>(),
        )),
        Column::from(Series::new(
            "Microorganismo".into(),
            rows.iter().map(|r| ORGANISMS[r.organism]).collect::<Vec<_>>(),
        )),
        Column::from(Series::new("Data Colheita".into(), dates)),
        Column::from(Series::new(
            "Meropenem".into(),
            rows.iter().map(|r| RESULTS[r.meropenem]).collect::<Vec<_>>(),
        )),
        Column::from(Series::new(
            "Colistina".into(),
            rows.iter().map(|r| RESULTS[r.colistina]).collect::<Vec<_>>(),
        )),
    ])
    .expect("build frame")
}

proptest! {
    #[test]
    fn retained_pairs_differ_or_fall_outside_window(
        rows in prop::collection::vec(row_strategy(), 0..40),
        window in 0u32..30,
    ) {
        let tables = ReferenceTables::builtin().expect("builtin tables");
        let df = frame(&rows);
        let schema = match_schema(&df, &tables);
        let result = deduplicate(&df, &schema, window).expect("deduplicate");
        let kept = &result.kept;

        let process_ids = column_string_values(kept, "Nº Processo");
        let organisms = column_string_values(kept, "Microorganismo");
        let dates: Vec<Option<NaiveDate>> = column_string_values(kept, "Data Colheita")
            .into_iter()
            .map(|d| d.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()))
            .collect();
        let meropenem = column_string_values(kept, "Meropenem");
        let colistina = column_string_values(kept, "Colistina");

        for i in 0..kept.height() {
            for j in (i + 1)..kept.height() {
                let same_case = process_ids[i] == process_ids[j] && organisms[i] == organisms[j];
                let same_signature = meropenem[i] == meropenem[j] && colistina[i] == colistina[j];
                if same_case && same_signature {
                    if let (Some(a), Some(b)) = (dates[i], dates[j]) {
                        prop_assert!(day_gap(a, b) > i64::from(window));
                    } else {
                        prop_assert!(dates[i] != dates[j]);
                    }
                }
            }
        }

        prop_assert!(kept.height() <= df.height());
        prop_assert_eq!(result.summary.cases_after, kept.height());
    }

    #[test]
    fn every_patient_organism_pair_survives(
        rows in prop::collection::vec(row_strategy(), 0..40),
        window in 0u32..30,
    ) {
        let tables = ReferenceTables::builtin().expect("builtin tables");
        let df = frame(&rows);
        let schema = match_schema(&df, &tables);
        let result = deduplicate(&df, &schema, window).expect("deduplicate");

        let pairs = |frame: &DataFrame| -> HashSet<(Option<String>, Option<String>)> {
            column_string_values(frame, "Nº Processo")
                .into_iter()
                .zip(column_string_values(frame, "Microorganismo"))
                .collect()
        };
        prop_assert_eq!(pairs(&df), pairs(&result.kept));
        prop_assert_eq!(result.summary.organisms_before, result.summary.organisms_after);
    }

    #[test]
    fn cells_stay_within_bounds(rows in prop::collection::vec(row_strategy(), 0..60)) {
        let tables = ReferenceTables::builtin().expect("builtin tables");
        let df = frame(&rows);
        let schema = match_schema(&df, &tables);
        let matrix = aggregate(&df, &schema, &tables);

        for cell in matrix.cells() {
            prop_assert!(cell.tested > 0);
            prop_assert!(cell.resistant <= cell.tested);
            prop_assert!((0.0..=100.0).contains(&cell.percentage));
            prop_assert_eq!(cell.category, ResistanceCategory::from_percentage(cell.percentage));
        }
    }

    #[test]
    fn every_percentage_has_one_band(value in -1000.0f64..1000.0) {
        let expected = if value < 40.0 {
            ResistanceCategory::Low
        } else if value <= 80.0 {
            ResistanceCategory::Moderate
        } else {
            ResistanceCategory::High
        };
        prop_assert_eq!(ResistanceCategory::from_percentage(value), expected);
    }
}
