use std::fmt::Write as _;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::info;

use super::logging::LogFormat;
use crate::core::{
    CompareError, CompareOptions, ComparisonReport, FormatConfig, InsightKind, Metric, compare,
    format_currency, format_percentage,
};

#[derive(Parser, Debug)]
#[command(
    name = "taxcompare",
    about = "Compare tax-planning scenarios: differences, rankings, and insights"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "TAXCOMPARE_LOG",
        default_value = "info",
        help = "Log level or filter directive; RUST_LOG takes precedence"
    )]
    pub log_level: String,
    #[arg(
        long,
        global = true,
        value_enum,
        env = "TAXCOMPARE_LOG_FORMAT",
        default_value_t = LogFormat::Compact
    )]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the comparison HTTP API
    Serve(ServeArgs),
    /// Compare scenarios from a JSON file
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "TAXCOMPARE_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(long, env = "TAXCOMPARE_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[arg(help = "JSON file holding a scenario array or {\"scenarios\": [...]}")]
    pub input: PathBuf,
    #[arg(long, help = "Id of the base scenario; defaults to the active scenario, then the first")]
    pub base: Option<String>,
    #[arg(
        long,
        default_value = "afterTaxIncome",
        help = "Metric to rank by, e.g. totalTax or after-tax-income"
    )]
    pub rank_by: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

pub fn build_options(args: &CompareArgs) -> Result<CompareOptions, CompareError> {
    let rank_by = args.rank_by.parse::<Metric>()?;
    let base_scenario_id = args
        .base
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    Ok(CompareOptions {
        base_scenario_id,
        rank_by,
    })
}

/// Loads a scenario file. Both a bare array and a `{"scenarios": [...]}`
/// wrapper are accepted.
pub fn read_scenarios(path: &Path) -> Result<Value, CompareError> {
    let text = fs::read_to_string(path).map_err(|source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str::<Value>(&text).map_err(|source| CompareError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(unwrap_scenarios(value))
}

pub fn unwrap_scenarios(value: Value) -> Value {
    match value {
        Value::Object(mut map) => map.remove("scenarios").unwrap_or(Value::Null),
        other => other,
    }
}

pub fn run_compare(args: &CompareArgs) -> Result<String, CompareError> {
    let options = build_options(args)?;
    let raw = read_scenarios(&args.input)?;
    let report = compare(&raw, &options)?;
    info!(
        input = %args.input.display(),
        scenarios = report.scenarios.len(),
        rank_by = %report.rank_by,
        "comparison complete"
    );

    match args.output {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|e| CompareError::InvalidPayload(format!("could not encode report: {e}"))),
        OutputFormat::Text => Ok(render_text_report(&report, &FormatConfig::default())),
    }
}

fn format_metric(metric: Metric, value: f64, config: &FormatConfig) -> String {
    if metric.is_rate() {
        format_percentage(value, config)
    } else {
        format_currency(value, config)
    }
}

pub fn render_text_report(report: &ComparisonReport, config: &FormatConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Ranking by {}", report.rank_by.label());
    for ranked in &report.ranking {
        let marker = match (ranked.is_best, ranked.is_worst) {
            (true, true) => "  [best, worst]",
            (true, false) => "  [best]",
            (false, true) => "  [worst]",
            (false, false) => "",
        };
        let _ = writeln!(
            out,
            "  {}. {}  {}{marker}",
            ranked.rank,
            ranked.scenario.name,
            format_metric(
                report.rank_by,
                ranked.scenario.metrics.get(report.rank_by),
                config
            ),
        );
    }

    let Some(summary) = &report.summary else {
        out.push_str("\nNo comparison scenarios selected\n");
        return out;
    };

    let _ = writeln!(out, "\nBase scenario: {}", summary.base_scenario);
    let _ = writeln!(out, "Compared: {}", summary.compare_scenarios.join(", "));
    out.push_str("\nRecommendations\n");
    let recs = &summary.recommendations;
    let _ = writeln!(out, "  Best after-tax income: {}", recs.best_after_tax_income);
    let _ = writeln!(out, "  Lowest total tax: {}", recs.lowest_total_tax);
    let _ = writeln!(out, "  Best effective rate: {}", recs.best_effective_rate);

    out.push_str("\nInsights\n");
    for group in &summary.insights {
        let _ = writeln!(out, "  {}", group.scenario_name);
        if group.insights.is_empty() {
            out.push_str("    No significant changes\n");
        }
        for insight in &group.insights {
            let tag = match insight.kind {
                InsightKind::Positive => "+",
                InsightKind::Negative => "-",
                InsightKind::Warning => "!",
            };
            let _ = writeln!(out, "    {tag} {}: {}", insight.category, insight.message);
        }
    }
    out
}
