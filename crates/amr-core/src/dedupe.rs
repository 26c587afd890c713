//! Temporal-window deduplication of repeat isolates.
//!
//! Rows are ordered by (process id, organism, collection date) with null
//! dates last. Within each (process id, organism) run, a row whose gap to the
//! previous row is at most `window_days` is flagged when its result
//! signature is shared by another row of the same (process id, organism).
//! Flagged rows leave the kept set; every row of a flagged signature group
//! goes to the duplicate report, including the one that stays. Rows
//! without a process id or organism are always kept.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use amr_common::{day_gap, parse_collection_date};
use amr_ingest::CaseSchema;
use chrono::NaiveDate;
use polars::prelude::{DataFrame, NamedFrom, Series};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::frame::{role_values, take_rows};

/// Separator between antibiotic results in a signature.
const SIGNATURE_SEPARATOR: &str = "_";

/// Case and organism counts around deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DeduplicationSummary {
    pub cases_before: usize,
    pub cases_after: usize,
    pub organisms_before: usize,
    pub organisms_after: usize,
    /// Rows listed in the duplicate report.
    pub duplicate_rows: usize,
    /// Non-blank collection dates that could not be parsed.
    pub coerced_dates: usize,
    pub window_days: u32,
}

impl DeduplicationSummary {
    /// Cases removed from the input.
    pub fn removed(&self) -> usize {
        self.cases_before - self.cases_after
    }
}

/// Output of [`deduplicate`].
#[derive(Debug, Clone)]
pub struct Deduplication {
    /// One representative per clinical episode, in sort order.
    pub kept: DataFrame,
    /// Every member of a flagged signature group, in sort order.
    pub duplicates: DataFrame,
    pub summary: DeduplicationSummary,
}

/// Per-row keys extracted once from the frame.
///
/// A row without a process id or organism has no case: it is never compared
/// with a neighbour and never joins a signature group.
struct CaseKeys {
    process_ids: Vec<Option<String>>,
    organisms: Vec<Option<String>>,
    dates: Vec<Option<NaiveDate>>,
    signatures: Vec<String>,
}

type SignatureKey<'a> = (&'a str, &'a str, &'a str);

impl CaseKeys {
    fn extract(df: &DataFrame, schema: &CaseSchema) -> (Self, usize) {
        let height = df.height();
        let process_ids = role_values(df, schema.process_id.as_deref());
        let organisms = role_values(df, schema.organism.as_deref());

        let mut coerced = 0;
        let dates = role_values(df, schema.collection_date.as_deref())
            .into_iter()
            .map(|raw| {
                let raw = raw?;
                let parsed = parse_collection_date(&raw, &schema.date_format);
                if parsed.is_none() {
                    coerced += 1;
                }
                parsed
            })
            .collect();

        let results: Vec<Vec<Option<String>>> = schema
            .antibiotics
            .iter()
            .map(|name| role_values(df, Some(name)))
            .collect();
        let signatures = (0..height)
            .map(|row| {
                results
                    .iter()
                    .map(|column| column[row].as_deref().unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join(SIGNATURE_SEPARATOR)
            })
            .collect();

        (
            Self {
                process_ids,
                organisms,
                dates,
                signatures,
            },
            coerced,
        )
    }

    fn compare(&self, a: usize, b: usize) -> Ordering {
        compare_nulls_last(&self.process_ids[a], &self.process_ids[b])
            .then_with(|| compare_nulls_last(&self.organisms[a], &self.organisms[b]))
            .then_with(|| compare_nulls_last(&self.dates[a], &self.dates[b]))
    }

    fn case(&self, row: usize) -> Option<(&str, &str)> {
        Some((
            self.process_ids[row].as_deref()?,
            self.organisms[row].as_deref()?,
        ))
    }

    fn same_case(&self, a: usize, b: usize) -> bool {
        self.case(a).is_some_and(|case| self.case(b) == Some(case))
    }

    fn signature_key(&self, row: usize) -> Option<SignatureKey<'_>> {
        let (process_id, organism) = self.case(row)?;
        Some((process_id, organism, &self.signatures[row]))
    }

    fn distinct_organisms(&self, rows: impl Iterator<Item = usize>) -> usize {
        rows.filter_map(|row| self.organisms[row].as_deref())
            .collect::<HashSet<_>>()
            .len()
    }
}

fn compare_nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Split `df` into kept episodes and the duplicate report.
///
/// Never fails on malformed values: unparseable dates become null and sort
/// last, and a missing role column reads as all null. The collection date
/// column of both outputs is rewritten as ISO `YYYY-MM-DD` text.
pub fn deduplicate(df: &DataFrame, schema: &CaseSchema, window_days: u32) -> Result<Deduplication> {
    let (keys, coerced_dates) = CaseKeys::extract(df, schema);
    if coerced_dates > 0 {
        warn!(
            count = coerced_dates,
            "unparseable collection dates treated as missing"
        );
    }

    let mut order: Vec<usize> = (0..df.height()).collect();
    order.sort_by(|&a, &b| keys.compare(a, b));

    let mut group_sizes: HashMap<SignatureKey<'_>, usize> = HashMap::new();
    for key in (0..df.height()).filter_map(|row| keys.signature_key(row)) {
        *group_sizes.entry(key).or_default() += 1;
    }

    let window = i64::from(window_days);
    let mut flagged = vec![false; df.height()];
    for pair in order.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        if !keys.same_case(previous, current) {
            continue;
        }
        let within_window = match (keys.dates[previous], keys.dates[current]) {
            (Some(a), Some(b)) => day_gap(a, b) <= window,
            _ => false,
        };
        let shared = keys
            .signature_key(current)
            .and_then(|key| group_sizes.get(&key))
            .is_some_and(|&size| size >= 2);
        flagged[current] = within_window && shared;
    }

    let flagged_groups: HashSet<SignatureKey<'_>> = order
        .iter()
        .filter(|&&row| flagged[row])
        .filter_map(|&row| keys.signature_key(row))
        .collect();
    let duplicate_rows: Vec<usize> = order
        .iter()
        .copied()
        .filter(|&row| {
            keys.signature_key(row)
                .is_some_and(|key| flagged_groups.contains(&key))
        })
        .collect();

    let mut seen = HashSet::new();
    let kept_rows: Vec<usize> = order
        .iter()
        .copied()
        .filter(|&row| !flagged[row])
        .filter(|&row| match keys.signature_key(row) {
            Some(key) => seen.insert((key, keys.dates[row])),
            None => true,
        })
        .collect();

    let summary = DeduplicationSummary {
        cases_before: df.height(),
        cases_after: kept_rows.len(),
        organisms_before: keys.distinct_organisms(0..df.height()),
        organisms_after: keys.distinct_organisms(kept_rows.iter().copied()),
        duplicate_rows: duplicate_rows.len(),
        coerced_dates,
        window_days,
    };
    info!(
        cases_before = summary.cases_before,
        cases_after = summary.cases_after,
        removed = summary.removed(),
        organisms_before = summary.organisms_before,
        organisms_after = summary.organisms_after,
        duplicate_rows = summary.duplicate_rows,
        window_days,
        "deduplication complete"
    );

    let kept = with_normalized_dates(take_rows(df, &kept_rows)?, schema, &keys, &kept_rows)?;
    let duplicates =
        with_normalized_dates(take_rows(df, &duplicate_rows)?, schema, &keys, &duplicate_rows)?;

    Ok(Deduplication {
        kept,
        duplicates,
        summary,
    })
}

fn with_normalized_dates(
    mut frame: DataFrame,
    schema: &CaseSchema,
    keys: &CaseKeys,
    rows: &[usize],
) -> Result<DataFrame> {
    let Some(column) = schema.collection_date.as_deref() else {
        return Ok(frame);
    };
    let values: Vec<Option<String>> = rows
        .iter()
        .map(|&row| keys.dates[row].map(|date| date.format("%Y-%m-%d").to_string()))
        .collect();
    frame.with_column(Series::new(column.into(), values))?;
    Ok(frame)
}
