use std::collections::BTreeMap;

use super::normalize::finite_or_zero;
use super::types::{MetricDifference, NormalizedScenario, ScenarioDifference, Trend};

/// Differences each comparison scenario against `base`, one entry per
/// comparison in input order. The base's metric set defines the domain.
pub fn calculate_differences(
    base: &NormalizedScenario,
    compare: &[NormalizedScenario],
) -> Vec<ScenarioDifference> {
    compare
        .iter()
        .map(|scenario| {
            let differences = base
                .metrics
                .iter()
                .map(|(metric, base_value)| {
                    (
                        metric,
                        metric_difference(base_value, scenario.metrics.get(metric)),
                    )
                })
                .collect::<BTreeMap<_, _>>();
            ScenarioDifference {
                scenario_id: scenario.id.clone(),
                scenario_name: scenario.name.clone(),
                differences,
            }
        })
        .collect()
}

/// Overflowing results are reported as zero so every field stays finite.
pub fn metric_difference(base: f64, compare: f64) -> MetricDifference {
    let absolute = finite_or_zero(compare - base);
    let percent = if base != 0.0 {
        finite_or_zero(absolute / base * 100.0)
    } else {
        0.0
    };
    MetricDifference {
        base,
        compare,
        absolute,
        percent,
        trend: trend_of(absolute),
    }
}

pub fn trend_of(absolute: f64) -> Trend {
    if absolute > 0.0 {
        Trend::Increase
    } else if absolute < 0.0 {
        Trend::Decrease
    } else {
        Trend::Unchanged
    }
}
