//! Subcommand implementations.

use std::path::Path;

use seniaura_analytics::AnalyticsError;
use seniaura_analytics_models::{
    ClusterParams, FilterSpec, GapParams, HealthIndicator, HealthTarget, Pathology, RadarParams,
};
use seniaura_catalogue_models::Category;
use seniaura_territory::Dataset;
use serde::Serialize;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Parses a `VARIABLE=LOW:HIGH` range filter.
///
/// The variable name may contain spaces; the bounds are split on the last
/// `=` so that only the range part needs to be numeric.
pub fn parse_filter(raw: &str) -> Result<FilterSpec, String> {
    let (variable, range) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected VARIABLE=LOW:HIGH, got '{raw}'"))?;
    let (low, high) = range
        .split_once(':')
        .ok_or_else(|| format!("expected LOW:HIGH after '=', got '{range}'"))?;

    let bound = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid bound '{s}': {e}"))
    };

    let variable = variable.trim();
    if variable.is_empty() {
        return Err("missing variable name".to_string());
    }

    Ok(FilterSpec::new(variable, bound(low)?, bound(high)?))
}

fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn rejected(e: &AnalyticsError) -> Box<dyn std::error::Error> {
    log::debug!("{e}");
    e.user_message().into()
}

/// Dataset and catalogue overview.
pub fn summary(dataset: &Dataset) {
    let table = &dataset.territories;
    println!("Territories:        {}", table.len());
    println!("Numeric variables:  {}", table.columns().len());
    println!("Catalogue entries:  {}", dataset.catalogue.len());
    println!("Overlay boundaries: {}", dataset.overlay.len());
    println!();

    for category in Category::all().iter().filter(|c| c.is_selectable()) {
        let options = dataset.selection_options(*category);
        println!("{category}: {} selectable", options.len());
        for entry in options {
            let present = table.present_values(&entry.code).len();
            println!("  {:<24} {present:>4}  {}", entry.code, entry.label);
        }
    }
}

pub fn filter(dataset: &Dataset, ranges: &[FilterSpec]) -> CommandResult {
    let evaluation = seniaura_analytics::evaluate_filters(&dataset.territories, ranges);
    log::info!(
        "{} of {} territories retained",
        evaluation.included_count(),
        dataset.territories.len()
    );
    print_json(&evaluation)
}

pub fn gap(
    dataset: &Dataset,
    indicator: HealthIndicator,
    pathology: Pathology,
    context: Vec<String>,
    limit: Option<usize>,
) -> CommandResult {
    let params = GapParams {
        target: HealthTarget {
            indicator,
            pathology,
        },
        context,
        limit,
    };
    let ranking =
        seniaura_analytics::rank_gaps(&dataset.territories, &dataset.catalogue, &params);
    if let Some(reason) = ranking.skipped {
        log::warn!("Gap ranking skipped: {reason}");
    }
    print_json(&ranking)
}

pub fn cluster(dataset: &Dataset, variables: Vec<String>, k: usize) -> CommandResult {
    let params = ClusterParams { variables, k };
    let result = seniaura_analytics::cluster(&dataset.territories, &dataset.catalogue, &params)
        .map_err(|e| rejected(&e))?;
    print_json(&result)
}

pub fn radar(dataset: &Dataset, variables: Vec<String>, territories: Vec<String>) -> CommandResult {
    let params = RadarParams {
        variables,
        territories,
    };
    let profile =
        seniaura_analytics::radar_profile(&dataset.territories, &dataset.catalogue, &params)
            .map_err(|e| rejected(&e))?;
    for code in &profile.unknown_territories {
        log::warn!("Unknown territory '{code}'");
    }
    print_json(&profile)
}

pub fn screen(
    dataset: &Dataset,
    outcomes: &[String],
    determinants: &[String],
    output: Option<&Path>,
    top: usize,
) -> CommandResult {
    let results = seniaura_analytics::screen(&dataset.territories, outcomes, determinants);
    log::info!("{} outcome/determinant pairs screened", results.len());

    if let Some(path) = output {
        let mut writer = csv::Writer::from_path(path)?;
        for stats in &results {
            writer.serialize(stats)?;
        }
        writer.flush()?;
        log::info!("Wrote {}", path.display());
    }

    print_json(&results.iter().take(top).collect::<Vec<_>>())
}
