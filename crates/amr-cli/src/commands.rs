use std::path::Path;

use amr_cli::logging::redact_value;
use amr_cli::output::write_report_outputs;
use amr_common::column_string_values;
use amr_core::{
    AgeGroup, BreakdownKey, CaseFilter, aggregate, deduplicate, high_resistance_pairs,
    isolate_breakdown, organism_frequency, organism_profile, result_distribution, result_tally,
};
use amr_ingest::{match_schema, read_case_table};
use amr_model::{AnalysisOptions, OrganismGroup, SusceptibilityResult};
use amr_standards::ReferenceTables;
use anyhow::{Context, Result};
use tracing::{info, info_span, trace, warn};

use crate::cli::{
    AgeGroupArg, BreakdownArg, BreakdownArgs, DistributionArgs, GroupArg, InputArgs,
    OrganismArgs, ReportArgs, ResultArg, TallyArgs,
};
use crate::types::{
    Analysis, BreakdownResult, DistributionResult, OrganismResult, ReportResult, TallyResult,
};

/// Reference tables from `--reference`, else the environment or the built-in copy.
pub fn load_tables(reference: Option<&Path>) -> Result<ReferenceTables> {
    let tables = match reference {
        Some(path) => ReferenceTables::load(path)
            .with_context(|| format!("load reference tables from {}", path.display()))?,
        None => ReferenceTables::from_env().context("load reference tables")?,
    };
    info!(source = %tables.source().display(), "reference tables loaded");
    Ok(tables)
}

pub fn run_report(args: &ReportArgs, reference: Option<&Path>) -> Result<ReportResult> {
    let mut filter = case_filter(&args.input);
    if let Some(organism) = &args.organism {
        filter = filter.with_organism(organism.as_str());
    }
    let analysis = analyze(&args.input, reference, &filter)?;
    let matrix = aggregate(&analysis.cases, &analysis.schema, &analysis.tables);
    let high = high_resistance_pairs(&matrix);
    for cell in matrix.intrinsic_disagreements() {
        warn!(
            organism = %cell.organism,
            antibiotic = %cell.antibiotic,
            percentage = cell.percentage,
            "intrinsically resistant pair measured below 100%"
        );
    }

    let outputs = match &args.output_dir {
        Some(dir) => Some(write_report_outputs(dir, &analysis.deduplication, &matrix)?),
        None => None,
    };
    Ok(ReportResult {
        analysis,
        matrix,
        high,
        outputs,
    })
}

pub fn run_duplicates(args: &InputArgs, reference: Option<&Path>) -> Result<Analysis> {
    let analysis = analyze(args, reference, &CaseFilter::new())?;
    let duplicates = &analysis.deduplication.duplicates;
    let process_ids = column_string_values(
        duplicates,
        analysis.schema.process_id.as_deref().unwrap_or_default(),
    );
    for process_id in process_ids.iter().flatten() {
        trace!(process_id = redact_value(process_id), "duplicate group member");
    }
    Ok(analysis)
}

pub fn run_organism(args: &OrganismArgs, reference: Option<&Path>) -> Result<OrganismResult> {
    let analysis = analyze(&args.input, reference, &case_filter(&args.input))?;
    let matrix = aggregate(&analysis.cases, &analysis.schema, &analysis.tables);
    let profile = organism_profile(
        &analysis.cases,
        &analysis.schema,
        &analysis.tables,
        &matrix,
        &args.organism,
    );
    if profile.is_none() {
        warn!(organism = %args.organism, "organism has no records after deduplication");
    }
    Ok(OrganismResult {
        organism: args.organism.trim().to_string(),
        profile,
    })
}

pub fn run_breakdown(args: &BreakdownArgs, reference: Option<&Path>) -> Result<BreakdownResult> {
    let analysis = analyze(&args.input, reference, &case_filter(&args.input))?;
    let key = match args.by {
        BreakdownArg::Sex => BreakdownKey::Sex,
        BreakdownArg::Age => BreakdownKey::Age,
    };
    let entries = isolate_breakdown(
        &analysis.cases,
        &analysis.schema,
        key,
        args.organism.as_deref(),
    );
    Ok(BreakdownResult {
        key,
        organism: args.organism.clone(),
        entries,
    })
}

pub fn run_tally(args: &TallyArgs, reference: Option<&Path>) -> Result<TallyResult> {
    let group = match args.group {
        GroupArg::All => OrganismGroup::All,
        GroupArg::GramPositive => OrganismGroup::GramPositive,
        GroupArg::GramNegative => OrganismGroup::GramNegative,
        GroupArg::Eskape => OrganismGroup::Eskape,
    };
    let result = match args.result {
        ResultArg::Resistant => SusceptibilityResult::Resistant,
        ResultArg::Sensitive => SusceptibilityResult::Sensitive,
        ResultArg::IncreasedExposure => SusceptibilityResult::SensitiveIncreasedExposure,
        ResultArg::Intermediate => SusceptibilityResult::Intermediate,
    };
    let filter = case_filter(&args.input).with_group(group);
    let analysis = analyze(&args.input, reference, &filter)?;
    let organisms = organism_frequency(
        &analysis.cases,
        &analysis.schema,
        &analysis.tables,
        group,
        args.top,
    );
    let tally = result_tally(&analysis.cases, &analysis.schema, &analysis.tables, result);
    Ok(TallyResult {
        group,
        result,
        organisms,
        tally,
    })
}

pub fn run_distribution(
    args: &DistributionArgs,
    reference: Option<&Path>,
) -> Result<DistributionResult> {
    let filter = case_filter(&args.input).with_organisms(args.organisms.iter().cloned());
    let analysis = analyze(&args.input, reference, &filter)?;
    for antibiotic in &args.antibiotics {
        if !analysis.schema.has_antibiotic(antibiotic.trim()) {
            warn!(antibiotic = %antibiotic, "antibiotic column not recognized in input");
        }
    }
    let organisms: Vec<&str> = args.organisms.iter().map(String::as_str).collect();
    let antibiotics: Vec<&str> = args.antibiotics.iter().map(String::as_str).collect();
    let distributions =
        result_distribution(&analysis.cases, &analysis.schema, &organisms, &antibiotics);
    Ok(DistributionResult {
        organisms: args.organisms.clone(),
        distributions,
    })
}

/// Ingest, validate, deduplicate and filter one export.
fn analyze(args: &InputArgs, reference: Option<&Path>, filter: &CaseFilter) -> Result<Analysis> {
    let span = info_span!("analysis", input = %args.input.display());
    let _guard = span.enter();

    let options = AnalysisOptions::new()
        .with_window_days(args.window_days)
        .with_relevant_only(args.relevant_only);
    let tables = load_tables(reference)?;
    let df = read_case_table(&args.input, &tables)
        .with_context(|| format!("read {}", args.input.display()))?;
    let schema = match_schema(&df, &tables);
    schema.validate().context("match input columns")?;

    let deduplication =
        deduplicate(&df, &schema, options.window_days).context("deduplicate records")?;
    let filter = filter.clone().with_relevant_only(options.relevant_only);
    let cases = filter
        .apply(&deduplication.kept, &schema, &tables)
        .context("apply case filter")?;

    Ok(Analysis {
        input: args.input.clone(),
        tables,
        schema,
        deduplication,
        cases,
    })
}

fn case_filter(args: &InputArgs) -> CaseFilter {
    let mut filter = CaseFilter::new();
    if let Some(sex) = &args.sex {
        filter = filter.with_sex(sex.as_str());
    }
    if let Some(group) = args.age_group {
        filter = filter.with_age_group(match group {
            AgeGroupArg::Paediatric => AgeGroup::Paediatric,
            AgeGroupArg::Adolescent => AgeGroup::Adolescent,
            AgeGroupArg::Adult => AgeGroup::Adult,
            AgeGroupArg::Elderly => AgeGroup::Elderly,
        });
    }
    if let Some(service) = &args.service {
        filter = filter.with_service(service.as_str());
    }
    if let Some(product) = &args.product {
        filter = filter.with_product(product.as_str());
    }
    filter
}
