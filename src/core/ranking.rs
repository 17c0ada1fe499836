use std::cmp::Ordering;

use super::types::{Direction, Metric, NormalizedScenario, RankedScenario};

/// Orders scenarios best-first by `metric`. The sort is stable, so ties keep
/// input order. Ranks are 1-based; the first entry is best and the last is worst.
pub fn rank_scenarios(scenarios: &[NormalizedScenario], metric: Metric) -> Vec<RankedScenario> {
    let mut ordered = scenarios.iter().collect::<Vec<_>>();
    ordered.sort_by(|a, b| compare_for(metric, a.metrics.get(metric), b.metrics.get(metric)));

    let last = ordered.len();
    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, scenario)| RankedScenario {
            scenario: scenario.clone(),
            rank: idx + 1,
            is_best: idx == 0,
            is_worst: idx + 1 == last,
        })
        .collect()
}

/// Ordering that puts the better value first. `0.0` and `-0.0` are equal.
pub fn compare_for(metric: Metric, a: f64, b: f64) -> Ordering {
    let ordering = a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b));
    match metric.direction() {
        Direction::LowerIsBetter => ordering,
        Direction::HigherIsBetter => ordering.reverse(),
    }
}

/// The best-ranked scenario for `metric`, or `None` for an empty list.
pub fn best_scenario(scenarios: &[NormalizedScenario], metric: Metric) -> Option<&NormalizedScenario> {
    scenarios.iter().reduce(|best, candidate| {
        match compare_for(metric, candidate.metrics.get(metric), best.metrics.get(metric)) {
            Ordering::Less => candidate,
            _ => best,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Metrics;
    use proptest::collection::vec;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn scenario(id: &str, metric: Metric, value: f64) -> NormalizedScenario {
        let mut metrics = Metrics::default();
        metrics.set(metric, value);
        NormalizedScenario {
            id: id.to_string(),
            name: format!("Scenario {id}"),
            description: None,
            is_active: false,
            metrics,
        }
    }

    fn ids(ranked: &[RankedScenario]) -> Vec<&str> {
        ranked.iter().map(|r| r.scenario.id.as_str()).collect()
    }

    #[test]
    fn total_tax_ranks_ascending() {
        let scenarios = vec![
            scenario("a", Metric::TotalTax, 30_000.0),
            scenario("b", Metric::TotalTax, 10_000.0),
            scenario("c", Metric::TotalTax, 20_000.0),
        ];
        let ranked = rank_scenarios(&scenarios, Metric::TotalTax);
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(ranked[0].is_best && !ranked[0].is_worst);
        assert!(!ranked[1].is_best && !ranked[1].is_worst);
        assert!(ranked[2].is_worst && !ranked[2].is_best);
    }

    #[test]
    fn after_tax_income_ranks_descending() {
        let scenarios = vec![
            scenario("a", Metric::AfterTaxIncome, 60_000.0),
            scenario("b", Metric::AfterTaxIncome, 90_000.0),
            scenario("c", Metric::AfterTaxIncome, 75_000.0),
        ];
        let ranked = rank_scenarios(&scenarios, Metric::default());
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn single_scenario_is_both_best_and_worst() {
        let scenarios = vec![scenario("only", Metric::TotalTax, 5.0)];
        let ranked = rank_scenarios(&scenarios, Metric::TotalTax);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
        assert!(ranked[0].is_best);
        assert!(ranked[0].is_worst);
    }

    #[test]
    fn empty_input_ranks_to_empty_output() {
        assert!(rank_scenarios(&[], Metric::TotalTax).is_empty());
        assert!(best_scenario(&[], Metric::TotalTax).is_none());
    }

    #[test]
    fn ties_keep_input_order() {
        let scenarios = vec![
            scenario("first", Metric::IrmaaAmount, 0.0),
            scenario("second", Metric::IrmaaAmount, 0.0),
            scenario("third", Metric::IrmaaAmount, 0.0),
        ];
        let ranked = rank_scenarios(&scenarios, Metric::IrmaaAmount);
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
        let best = best_scenario(&scenarios, Metric::IrmaaAmount).expect("non-empty");
        assert_eq!(best.id, "first");
    }

    #[test]
    fn signed_zero_ties_keep_input_order() {
        let scenarios = vec![
            scenario("a", Metric::TotalTax, 0.0),
            scenario("b", Metric::TotalTax, -0.0),
        ];
        let ranked = rank_scenarios(&scenarios, Metric::TotalTax);
        assert_eq!(ids(&ranked), vec!["a", "b"]);
        let best = best_scenario(&scenarios, Metric::TotalTax).expect("non-empty");
        assert_eq!(best.id, "a");

        let ranked = rank_scenarios(&scenarios, Metric::AfterTaxIncome);
        assert_eq!(ids(&ranked), vec!["a", "b"]);
    }

    #[test]
    fn best_scenario_agrees_with_rank_one() {
        let scenarios = vec![
            scenario("a", Metric::EffectiveRate, 22.0),
            scenario("b", Metric::EffectiveRate, 18.5),
            scenario("c", Metric::EffectiveRate, 24.0),
        ];
        let ranked = rank_scenarios(&scenarios, Metric::EffectiveRate);
        let best = best_scenario(&scenarios, Metric::EffectiveRate).expect("non-empty");
        assert_eq!(ranked[0].scenario.id, best.id);
        assert_eq!(best.id, "c");
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_ranks_are_a_permutation_with_one_best_and_worst(
            values in vec(-1.0e7f64..1.0e7, 1..12),
            lower_is_better in proptest::bool::ANY,
        ) {
            let metric = if lower_is_better { Metric::TotalTax } else { Metric::AfterTaxIncome };
            let scenarios = values
                .iter()
                .enumerate()
                .map(|(idx, v)| scenario(&idx.to_string(), metric, *v))
                .collect::<Vec<_>>();
            let ranked = rank_scenarios(&scenarios, metric);

            let mut ranks = ranked.iter().map(|r| r.rank).collect::<Vec<_>>();
            ranks.sort_unstable();
            prop_assert_eq!(ranks, (1..=values.len()).collect::<Vec<_>>());
            prop_assert_eq!(ranked.iter().filter(|r| r.is_best).count(), 1);
            prop_assert_eq!(ranked.iter().filter(|r| r.is_worst).count(), 1);

            for pair in ranked.windows(2) {
                let a = pair[0].scenario.metrics.get(metric);
                let b = pair[1].scenario.metrics.get(metric);
                if lower_is_better {
                    prop_assert!(a <= b);
                } else {
                    prop_assert!(a >= b);
                }
            }
        }
    }
}
