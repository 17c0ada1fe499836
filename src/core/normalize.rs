use serde_json::Value;
use tracing::debug;

use super::types::{Metric, Metrics, NormalizedScenario};

/// Normalizes a raw scenario list. Returns `None` when there is nothing to
/// compare: the input is not an array, or the array is empty.
pub fn normalize_scenarios(raw: &Value) -> Option<Vec<NormalizedScenario>> {
    let items = raw.as_array()?;
    if items.is_empty() {
        return None;
    }

    let scenarios = items
        .iter()
        .enumerate()
        .map(|(idx, item)| normalize_scenario(item, idx))
        .collect::<Vec<_>>();
    debug!(count = scenarios.len(), "normalized scenarios");
    Some(scenarios)
}

/// Maps one untyped scenario record onto the fixed metric schema. `position`
/// is the zero-based index used to synthesize an id when the record has none.
pub fn normalize_scenario(raw: &Value, position: usize) -> NormalizedScenario {
    let id = scenario_id(raw.get("id")).unwrap_or_else(|| (position + 1).to_string());
    let name = scenario_name(raw.get("name")).unwrap_or_else(|| format!("Scenario {id}"));
    let description = non_blank(raw.get("description"));
    let is_active = raw.get("isActive").and_then(Value::as_bool).unwrap_or(false);

    let calculations = raw.get("data").and_then(|data| data.get("calculations"));
    let mut metrics = Metrics::default();
    for metric in Metric::ALL {
        if metric == Metric::EffectiveRate {
            continue;
        }
        let value = calculations
            .and_then(|calc| calc.get(metric.key()))
            .map(numeric_value)
            .unwrap_or(0.0);
        metrics.set(metric, value);
    }
    metrics.effective_rate = effective_rate(metrics.total_tax, metrics.total_income);

    NormalizedScenario {
        id,
        name,
        description,
        is_active,
        metrics,
    }
}

/// Total tax over total income in percentage points; zero when there is no income.
pub fn effective_rate(total_tax: f64, total_income: f64) -> f64 {
    if total_income > 0.0 {
        finite_or_zero(total_tax / total_income * 100.0)
    } else {
        0.0
    }
}

fn scenario_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Only falsy names (missing, blank, zero, false) fall back to the synthesized label.
fn scenario_name(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        other => non_blank(Some(other)),
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn numeric_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    };
    parsed.map(finite_or_zero).unwrap_or(0.0)
}

// Form inputs arrive as strings like "$12,500".
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Non-finite values become zero and `-0.0` becomes `0.0`, so equal values compare equal.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value + 0.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, proptest};
    use serde_json::json;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn normalize_returns_none_for_non_array_and_empty_input() {
        assert!(normalize_scenarios(&Value::Null).is_none());
        assert!(normalize_scenarios(&json!({"id": 1})).is_none());
        assert!(normalize_scenarios(&json!("scenarios")).is_none());
        assert!(normalize_scenarios(&json!([])).is_none());
    }

    #[test]
    fn normalize_preserves_order_and_length() {
        let raw = json!([{"id": "a"}, {"id": "b"}, {"id": "c"}]);
        let scenarios = normalize_scenarios(&raw).expect("non-empty input");
        let ids = scenarios.iter().map(|s| s.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn normalize_reads_calculations_and_derives_effective_rate() {
        let raw = json!({
            "id": 7,
            "name": "Roth conversion",
            "description": "Convert $50k this year",
            "isActive": true,
            "data": {"calculations": {
                "totalIncome": 100000,
                "federalTax": 14000,
                "stateTax": 4000,
                "ficaTax": 2000,
                "totalTax": 20000,
                "afterTaxIncome": 80000,
                "irmaaAmount": 1200.5
            }}
        });
        let scenario = normalize_scenario(&raw, 0);
        assert_eq!(scenario.id, "7");
        assert_eq!(scenario.name, "Roth conversion");
        assert_eq!(scenario.description.as_deref(), Some("Convert $50k this year"));
        assert!(scenario.is_active);
        assert_approx(scenario.metrics.total_income, 100_000.0);
        assert_approx(scenario.metrics.total_tax, 20_000.0);
        assert_approx(scenario.metrics.after_tax_income, 80_000.0);
        assert_approx(scenario.metrics.irmaa_amount, 1_200.5);
        assert_approx(scenario.metrics.effective_rate, 20.0);
        assert_approx(scenario.metrics.capital_gains, 0.0);
    }

    #[test]
    fn normalize_ignores_supplied_effective_rate() {
        let raw = json!({"id": 1, "data": {"calculations": {
            "totalIncome": 0, "totalTax": 500, "effectiveRate": 0.25
        }}});
        let scenario = normalize_scenario(&raw, 0);
        assert_approx(scenario.metrics.effective_rate, 0.0);
    }

    #[test]
    fn normalize_synthesizes_missing_name_and_id() {
        let named_by_id = normalize_scenario(&json!({"id": "alt", "name": "  "}), 3);
        assert_eq!(named_by_id.name, "Scenario alt");

        let positional = normalize_scenario(&json!({}), 3);
        assert_eq!(positional.id, "4");
        assert_eq!(positional.name, "Scenario 4");
        assert!(!positional.is_active);
        assert!(positional.description.is_none());
    }

    #[test]
    fn normalize_degrades_malformed_fields_to_zero() {
        let raw = json!({"id": 1, "isActive": "yes", "data": {"calculations": {
            "totalIncome": "$120,000",
            "totalTax": "n/a",
            "federalTax": null,
            "stateTax": [1, 2],
            "ficaTax": {"amount": 5},
            "marginalRate": "24"
        }}});
        let scenario = normalize_scenario(&raw, 0);
        assert!(!scenario.is_active);
        assert_approx(scenario.metrics.total_income, 120_000.0);
        assert_approx(scenario.metrics.total_tax, 0.0);
        assert_approx(scenario.metrics.federal_tax, 0.0);
        assert_approx(scenario.metrics.state_tax, 0.0);
        assert_approx(scenario.metrics.fica_tax, 0.0);
        assert_approx(scenario.metrics.marginal_rate, 24.0);
    }

    #[test]
    fn normalize_stringifies_truthy_non_string_names() {
        assert_eq!(normalize_scenario(&json!({"id": 1, "name": 2024}), 0).name, "2024");
        assert_eq!(normalize_scenario(&json!({"id": 1, "name": 0}), 0).name, "Scenario 1");
        assert_eq!(normalize_scenario(&json!({"id": 1, "name": false}), 0).name, "Scenario 1");
        assert_eq!(normalize_scenario(&json!({"id": 1, "name": null}), 0).name, "Scenario 1");
    }

    #[test]
    fn normalize_folds_negative_zero() {
        let raw = json!({"data": {"calculations": {"totalTax": -0.0, "stateTax": "-0"}}});
        let scenario = normalize_scenario(&raw, 0);
        assert!(scenario.metrics.total_tax.is_sign_positive());
        assert!(scenario.metrics.state_tax.is_sign_positive());
    }

    #[test]
    fn normalize_handles_missing_data_or_calculations() {
        for raw in [
            json!({"id": 1}),
            json!({"id": 1, "data": null}),
            json!({"id": 1, "data": {"calculations": "pending"}}),
            json!(42),
        ] {
            let scenario = normalize_scenario(&raw, 0);
            assert_eq!(scenario.metrics, Metrics::default());
        }
    }

    #[test]
    fn normalize_rejects_non_finite_strings() {
        let raw = json!({"data": {"calculations": {"totalIncome": "inf", "totalTax": "NaN"}}});
        let scenario = normalize_scenario(&raw, 0);
        assert_approx(scenario.metrics.total_income, 0.0);
        assert_approx(scenario.metrics.total_tax, 0.0);
        assert_approx(scenario.metrics.effective_rate, 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_every_metric_is_finite(
            income in any::<f64>(),
            tax in any::<f64>(),
            irmaa in ".*",
            use_string_income in any::<bool>(),
        ) {
            let income_value = if use_string_income {
                json!(income.to_string())
            } else {
                serde_json::Number::from_f64(income).map(Value::Number).unwrap_or(Value::Null)
            };
            let raw = json!({"data": {"calculations": {
                "totalIncome": income_value,
                "totalTax": serde_json::Number::from_f64(tax).map(Value::Number).unwrap_or(Value::Null),
                "irmaaAmount": irmaa,
            }}});
            let scenario = normalize_scenario(&raw, 0);
            for (_, value) in scenario.metrics.iter() {
                prop_assert!(value.is_finite());
            }
        }
    }
}
