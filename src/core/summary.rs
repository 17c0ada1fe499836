use serde_json::Value;
use tracing::debug;

use super::diff::calculate_differences;
use super::error::CompareError;
use super::insights::generate_insights;
use super::normalize::{finite_or_zero, normalize_scenarios};
use super::ranking::{best_scenario, rank_scenarios};
use super::types::{
    CompareOptions, ComparisonReport, ComparisonSummary, Metric, MetricRow, MetricValue,
    NormalizedScenario, Recommendations,
};

/// Composes differences, insights, and recommendations for `base` against
/// `compare`. Returns `None` when there is nothing to compare against.
pub fn build_comparison_summary(
    base: &NormalizedScenario,
    compare: &[NormalizedScenario],
) -> Option<ComparisonSummary> {
    if compare.is_empty() {
        return None;
    }

    let differences = calculate_differences(base, compare);
    let insights = generate_insights(&differences);

    let mut all = Vec::with_capacity(compare.len() + 1);
    all.push(base.clone());
    all.extend(compare.iter().cloned());
    let top = |metric: Metric| {
        rank_scenarios(&all, metric)
            .into_iter()
            .next()
            .map(|ranked| ranked.scenario.name)
            .unwrap_or_default()
    };

    Some(ComparisonSummary {
        base_scenario: base.name.clone(),
        compare_scenarios: compare.iter().map(|s| s.name.clone()).collect(),
        total_comparisons: compare.len(),
        differences,
        insights,
        recommendations: Recommendations {
            best_after_tax_income: top(Metric::AfterTaxIncome),
            lowest_total_tax: top(Metric::TotalTax),
            best_effective_rate: top(Metric::EffectiveRate),
        },
    })
}

/// Splits `scenarios` into the base and the rest. An explicit id wins, then
/// the first active scenario, then the first scenario.
pub fn select_base<'a>(
    scenarios: &'a [NormalizedScenario],
    base_id: Option<&str>,
) -> Result<(&'a NormalizedScenario, Vec<NormalizedScenario>), CompareError> {
    if scenarios.is_empty() {
        return Err(CompareError::NoScenarios);
    }

    let index = match base_id {
        Some(id) => scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CompareError::ScenarioNotFound(id.to_string()))?,
        None => scenarios.iter().position(|s| s.is_active).unwrap_or(0),
    };

    let rest = scenarios
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != index)
        .map(|(_, s)| s.clone())
        .collect();
    Ok((&scenarios[index], rest))
}

/// One row per metric with every scenario's value, the best scenario, and the spread.
pub fn metric_table(scenarios: &[NormalizedScenario], metrics: &[Metric]) -> Vec<MetricRow> {
    if scenarios.is_empty() {
        return Vec::new();
    }

    metrics
        .iter()
        .filter_map(|&metric| {
            let best = best_scenario(scenarios, metric)?;
            let values = scenarios
                .iter()
                .map(|s| MetricValue {
                    scenario_id: s.id.clone(),
                    value: s.metrics.get(metric),
                })
                .collect::<Vec<_>>();
            let max = values.iter().map(|v| v.value).fold(f64::MIN, f64::max);
            let min = values.iter().map(|v| v.value).fold(f64::MAX, f64::min);
            Some(MetricRow {
                metric,
                label: metric.label(),
                direction: metric.direction(),
                values,
                best_scenario_id: best.id.clone(),
                spread: finite_or_zero(max - min),
            })
        })
        .collect()
}

/// Runs the whole pipeline over raw scenario records.
pub fn compare(raw: &Value, options: &CompareOptions) -> Result<ComparisonReport, CompareError> {
    let scenarios = normalize_scenarios(raw).ok_or(CompareError::NoScenarios)?;
    let (base, rest) = select_base(&scenarios, options.base_scenario_id.as_deref())?;
    debug!(
        base = %base.id,
        compared = rest.len(),
        rank_by = %options.rank_by,
        "selected base scenario"
    );

    let summary = build_comparison_summary(base, &rest);
    let mut ordered = Vec::with_capacity(scenarios.len());
    ordered.push(base.clone());
    ordered.extend(rest);
    let ranking = rank_scenarios(&ordered, options.rank_by);
    let table = metric_table(&ordered, &Metric::ALL);

    Ok(ComparisonReport {
        scenarios: ordered,
        summary,
        rank_by: options.rank_by,
        ranking,
        table,
    })
}
