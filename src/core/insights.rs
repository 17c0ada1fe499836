use super::format::{FormatConfig, format_currency, format_percentage};
use super::types::{Insight, InsightKind, Metric, ScenarioDifference, ScenarioInsights};

pub const TAX_CHANGE_THRESHOLD: f64 = 1_000.0;
pub const INCOME_IMPROVEMENT_THRESHOLD: f64 = 5_000.0;
/// Percentage points.
pub const RATE_EFFICIENCY_THRESHOLD: f64 = 1.0;
pub const IRMAA_CHANGE_THRESHOLD: f64 = 500.0;

pub fn generate_insights(differences: &[ScenarioDifference]) -> Vec<ScenarioInsights> {
    generate_insights_with(differences, &FormatConfig::default())
}

pub fn generate_insights_with(
    differences: &[ScenarioDifference],
    config: &FormatConfig,
) -> Vec<ScenarioInsights> {
    differences
        .iter()
        .map(|diff| ScenarioInsights {
            scenario_id: diff.scenario_id.clone(),
            scenario_name: diff.scenario_name.clone(),
            insights: scenario_insights(diff, config),
        })
        .collect()
}

fn scenario_insights(diff: &ScenarioDifference, config: &FormatConfig) -> Vec<Insight> {
    let lookup = |metric: Metric| diff.differences.get(&metric);
    let money = |value: f64| format_currency(value.abs(), config);
    let pct = |value: f64| format_percentage(value.abs(), config);
    let mut insights = Vec::new();

    if let Some(tax) = lookup(Metric::TotalTax) {
        if tax.absolute < -TAX_CHANGE_THRESHOLD {
            insights.push(Insight {
                kind: InsightKind::Positive,
                category: "Tax Savings".to_string(),
                message: format!(
                    "Saves {} in total taxes ({} reduction)",
                    money(tax.absolute),
                    pct(tax.percent)
                ),
            });
        } else if tax.absolute > TAX_CHANGE_THRESHOLD {
            insights.push(Insight {
                kind: InsightKind::Negative,
                category: "Tax Increase".to_string(),
                message: format!(
                    "Increases total taxes by {} ({} increase)",
                    money(tax.absolute),
                    pct(tax.percent)
                ),
            });
        }
    }

    if let Some(income) = lookup(Metric::AfterTaxIncome) {
        if income.absolute > INCOME_IMPROVEMENT_THRESHOLD {
            insights.push(Insight {
                kind: InsightKind::Positive,
                category: "Income Improvement".to_string(),
                message: format!(
                    "Increases after-tax income by {} ({} improvement)",
                    money(income.absolute),
                    pct(income.percent)
                ),
            });
        }
    }

    if let Some(rate) = lookup(Metric::EffectiveRate) {
        if rate.absolute < -RATE_EFFICIENCY_THRESHOLD {
            insights.push(Insight {
                kind: InsightKind::Positive,
                category: "Rate Efficiency".to_string(),
                message: format!(
                    "Lowers the effective tax rate by {} points (from {} to {})",
                    pct(rate.absolute).trim_end_matches('%'),
                    format_percentage(rate.base, config),
                    format_percentage(rate.compare, config)
                ),
            });
        }
    }

    if let Some(irmaa) = lookup(Metric::IrmaaAmount) {
        if irmaa.absolute < -IRMAA_CHANGE_THRESHOLD {
            insights.push(Insight {
                kind: InsightKind::Positive,
                category: "Medicare Savings".to_string(),
                message: format!("Reduces IRMAA surcharges by {}", money(irmaa.absolute)),
            });
        } else if irmaa.absolute > IRMAA_CHANGE_THRESHOLD {
            insights.push(Insight {
                kind: InsightKind::Warning,
                category: "Medicare Impact".to_string(),
                message: format!(
                    "Raises IRMAA surcharges by {}; review Medicare income thresholds",
                    money(irmaa.absolute)
                ),
            });
        }
    }

    insights
}
