use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use amr_common::{column_string_values, format_percentage, percentage};
use amr_core::{
    BreakdownKey, DeduplicationSummary, HighResistancePairs, LegendEntry, OrganismProfile,
    ResistanceMatrix,
};
use amr_model::{ResistanceCategory, ResistanceCell, SusceptibilityResult};
use amr_standards::ReferenceFinding;

use crate::types::{
    Analysis, BreakdownResult, DistributionResult, OrganismResult, ReportResult, TallyResult,
};

pub fn print_report(result: &ReportResult) {
    println!("Input: {}", result.analysis.input.display());
    print_deduplication(&result.analysis.deduplication.summary);
    if result.analysis.cases.height() != result.analysis.deduplication.kept.height() {
        println!(
            "Filtered: {} of {} kept records",
            result.analysis.cases.height(),
            result.analysis.deduplication.kept.height()
        );
    }
    println!();
    print_band_legend();
    print_matrix(&result.matrix);
    print_notes(&result.matrix);
    print_high_resistance(&result.high);
    if let Some(outputs) = &result.outputs {
        println!();
        println!("Kept records: {}", outputs.kept.display());
        println!("Duplicate report: {}", outputs.duplicates.display());
        println!("Matrix: {}", outputs.matrix.display());
        println!("Cells: {}", outputs.cells.display());
    }
}

fn print_deduplication(summary: &DeduplicationSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(""),
        header_cell("Before"),
        header_cell("After"),
        header_cell("Removed"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new("Cases"),
        Cell::new(summary.cases_before),
        Cell::new(summary.cases_after),
        count_cell(summary.removed(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Organisms"),
        Cell::new(summary.organisms_before),
        Cell::new(summary.organisms_after),
        count_cell(
            summary.organisms_before.saturating_sub(summary.organisms_after),
            Color::Yellow,
        ),
    ]);
    println!("Deduplication (window {} days)", summary.window_days);
    println!("{table}");
    if summary.coerced_dates > 0 {
        println!(
            "{} collection date(s) could not be parsed and were treated as missing",
            summary.coerced_dates
        );
    }
}

fn print_band_legend() {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Band"), header_cell("Resistance")]);
    apply_table_style(&mut table);
    for category in ResistanceCategory::all() {
        table.add_row(vec![
            Cell::new(format!("{category:?}")).fg(band_color(category)),
            Cell::new(category.label()),
        ]);
    }
    println!("{table}");
}

fn print_matrix(matrix: &ResistanceMatrix) {
    if matrix.is_empty() {
        println!("No relevant organism has a tested antibiotic.");
        return;
    }
    let mut table = Table::new();
    let mut header = vec![header_cell("Gram"), header_cell("Organism")];
    header.extend(matrix.antibiotics().iter().map(|name| header_cell(name)));
    table.set_header(header);
    apply_table_style(&mut table);
    table.set_content_arrangement(ContentArrangement::Disabled);
    for index in 2..matrix.antibiotics().len() + 2 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for row in matrix.rows() {
        let mut cells = vec![
            dim_cell(row.gram_stain.as_str()),
            Cell::new(row.label()),
        ];
        cells.extend(
            matrix
                .antibiotics()
                .iter()
                .map(|antibiotic| match matrix.cell(&row.organism, antibiotic) {
                    Some(cell) => resistance_cell(cell),
                    None => dim_cell(""),
                }),
        );
        table.add_row(cells);
    }
    println!("{table}");
    println!("x = intrinsic resistance");
}

fn print_notes(matrix: &ResistanceMatrix) {
    let notes = matrix.notes();
    if notes.unrecognized_results > 0 {
        println!(
            "{} result(s) not recognized; counted as tested, not resistant",
            notes.unrecognized_results
        );
    }
    let disagreements = matrix.intrinsic_disagreements();
    if !disagreements.is_empty() {
        println!(
            "{} intrinsically resistant pair(s) measured below 100%",
            disagreements.len()
        );
    }
}

fn print_high_resistance(high: &HighResistancePairs) {
    let sections = [
        ("Total resistance (100%)", &high.total),
        ("High resistance (80-99%)", &high.high),
    ];
    for (title, cells) in sections {
        if cells.is_empty() {
            continue;
        }
        println!();
        println!("{title}");
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Organism"),
            header_cell("Antibiotic"),
            header_cell("Resistant"),
            header_cell("Tested"),
            header_cell("%"),
        ]);
        apply_table_style(&mut table);
        for index in 2..=4 {
            align_column(&mut table, index, CellAlignment::Right);
        }
        for cell in cells {
            table.add_row(vec![
                Cell::new(&cell.organism),
                Cell::new(&cell.antibiotic),
                Cell::new(cell.resistant),
                Cell::new(cell.tested),
                resistance_cell(cell),
            ]);
        }
        println!("{table}");
    }
}

pub fn print_duplicates(analysis: &Analysis) {
    let duplicates = &analysis.deduplication.duplicates;
    let schema = &analysis.schema;
    println!("Input: {}", analysis.input.display());
    println!(
        "{} record(s) in flagged duplicate groups",
        duplicates.height()
    );
    if duplicates.height() == 0 {
        return;
    }

    let role = |name: Option<&str>| column_string_values(duplicates, name.unwrap_or_default());
    let process_ids = role(schema.process_id.as_deref());
    let organisms = role(schema.organism.as_deref());
    let dates = role(schema.collection_date.as_deref());
    let results: Vec<(&String, Vec<Option<String>>)> = schema
        .antibiotics
        .iter()
        .map(|name| (name, column_string_values(duplicates, name)))
        .collect();

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Process"),
        header_cell("Organism"),
        header_cell("Collected"),
        header_cell("Results"),
    ]);
    apply_table_style(&mut table);
    for row in 0..duplicates.height() {
        let tested: Vec<String> = results
            .iter()
            .filter_map(|(name, values)| {
                values[row]
                    .as_deref()
                    .map(|value| format!("{name}: {value}"))
            })
            .collect();
        table.add_row(vec![
            Cell::new(process_ids[row].as_deref().unwrap_or("")),
            Cell::new(organisms[row].as_deref().unwrap_or("")),
            match dates[row].as_deref() {
                Some(date) => Cell::new(date),
                None => dim_cell("-"),
            },
            Cell::new(tested.join("; ")),
        ]);
    }
    println!("{table}");
}

pub fn print_organism(result: &OrganismResult) {
    let Some(profile) = &result.profile else {
        println!("{}: no records", result.organism);
        return;
    };
    print_profile(profile);
}

fn print_profile(profile: &OrganismProfile) {
    println!("{} (n={})", profile.organism, profile.isolates);
    if let Some((service, count)) = &profile.top_service {
        println!("Most frequent service: {service} ({count})");
    }
    if let Some((product, count)) = &profile.top_product {
        println!("Most frequent product: {product} ({count})");
    }
    if let Some(cell) = &profile.most_resistant {
        println!(
            "Most resistant: {} ({}%)",
            cell.antibiotic,
            format_percentage(cell.percentage)
        );
    }

    let summary = &profile.susceptibility;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Every record"), header_cell("Antibiotics")]);
    apply_table_style(&mut table);
    for (label, names, color) in [
        ("Sensitive", &summary.all_sensitive, Color::Blue),
        ("Resistant", &summary.all_resistant, Color::Red),
        ("Increased exposure", &summary.all_increased_exposure, Color::Yellow),
    ] {
        let listed = if names.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(names.join(", "))
        };
        table.add_row(vec![
            Cell::new(format!("{label} ({})", names.len())).fg(color),
            listed,
        ]);
    }
    println!("{table}");

    if profile.classes.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Class"),
        header_cell("Antibiotics"),
        header_cell("Mean %"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for class in &profile.classes {
        let category = ResistanceCategory::from_percentage(class.mean_percentage);
        table.add_row(vec![
            Cell::new(&class.class),
            Cell::new(class.antibiotics),
            Cell::new(format_percentage(class.mean_percentage)).fg(band_color(category)),
        ]);
    }
    println!("{table}");
}

pub fn print_breakdown(result: &BreakdownResult) {
    let key = match result.key {
        BreakdownKey::Sex => "Sex",
        BreakdownKey::Age => "Age",
    };
    match &result.organism {
        Some(organism) => println!("{organism} by {}", key.to_lowercase()),
        None => println!("All isolates by {}", key.to_lowercase()),
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell(key), header_cell("Isolates"), header_cell("%")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in &result.entries {
        table.add_row(vec![
            Cell::new(&entry.label),
            Cell::new(entry.count),
            Cell::new(format_percentage(entry.percentage)),
        ]);
    }
    println!("{table}");
}

pub fn print_tally(result: &TallyResult) {
    println!("Organisms ({})", result.group.as_str());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Organism"), header_cell("Isolates")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in &result.organisms {
        table.add_row(vec![Cell::new(&entry.organism), Cell::new(entry.count)]);
    }
    println!("{table}");

    println!();
    println!("{} per antibiotic", result.result);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Antibiotic"), header_cell("Records")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in &result.tally {
        table.add_row(vec![Cell::new(&entry.antibiotic), count_cell(entry.count, Color::Cyan)]);
    }
    println!("{table}");
}

pub fn print_distribution(result: &DistributionResult) {
    if result.organisms.is_empty() {
        println!("All organisms");
    } else {
        println!("Organisms: {}", result.organisms.join(", "));
    }
    for distribution in &result.distributions {
        println!();
        println!("{} (n={})", distribution.antibiotic, distribution.total());
        if distribution.counts.is_empty() {
            println!("No results recorded.");
            continue;
        }
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Result"),
            header_cell("Records"),
            header_cell("%"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        align_column(&mut table, 2, CellAlignment::Right);
        for (value, count) in &distribution.counts {
            let share = percentage(*count, distribution.total()).unwrap_or_default();
            table.add_row(vec![
                result_cell(value),
                Cell::new(count),
                Cell::new(format_percentage(share)),
            ]);
        }
        println!("{table}");
    }
}

pub fn print_legend(entries: &[LegendEntry]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Class"), header_cell("Antibiotic")]);
    apply_table_style(&mut table);
    let mut previous: Option<&str> = None;
    for entry in entries {
        let class = if previous == Some(entry.class.as_str()) {
            dim_cell("")
        } else {
            Cell::new(&entry.class).add_attribute(Attribute::Bold)
        };
        previous = Some(entry.class.as_str());
        table.add_row(vec![class, Cell::new(&entry.antibiotic)]);
    }
    println!("{table}");
}

pub fn print_findings(findings: &[ReferenceFinding]) {
    if findings.is_empty() {
        println!("Reference tables: no findings");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Subject"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for finding in findings {
        table.add_row(vec![
            Cell::new(format!("{:?}", finding.kind)).fg(Color::Yellow),
            Cell::new(&finding.subject),
            Cell::new(&finding.message),
        ]);
    }
    println!("{table}");
}

fn resistance_cell(cell: &ResistanceCell) -> Cell {
    let mut text = format_percentage(cell.percentage);
    if cell.intrinsic_resistance {
        text.push(' ');
        text.push_str(cell.intrinsic_marker());
    }
    Cell::new(text).fg(band_color(cell.category))
}

fn result_cell(value: &str) -> Cell {
    let cell = Cell::new(value);
    match value.parse::<SusceptibilityResult>() {
        Ok(SusceptibilityResult::Resistant) => cell.fg(Color::Red),
        Ok(SusceptibilityResult::Sensitive) => cell.fg(Color::Blue),
        Ok(SusceptibilityResult::SensitiveIncreasedExposure) => cell.fg(Color::Yellow),
        Ok(SusceptibilityResult::Intermediate) | Err(_) => cell,
    }
}

fn band_color(category: ResistanceCategory) -> Color {
    match category {
        ResistanceCategory::Low => Color::Blue,
        ResistanceCategory::Moderate => Color::Yellow,
        ResistanceCategory::High => Color::Red,
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
