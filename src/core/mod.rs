mod diff;
mod error;
mod format;
mod insights;
mod normalize;
mod ranking;
mod summary;
mod types;

pub use diff::{calculate_differences, metric_difference, trend_of};
pub use error::CompareError;
pub use format::{FormatConfig, format_currency, format_percentage};
pub use insights::{
    INCOME_IMPROVEMENT_THRESHOLD, IRMAA_CHANGE_THRESHOLD, RATE_EFFICIENCY_THRESHOLD,
    TAX_CHANGE_THRESHOLD, generate_insights, generate_insights_with,
};
pub use normalize::{effective_rate, normalize_scenario, normalize_scenarios};
pub use ranking::{best_scenario, compare_for, rank_scenarios};
pub use summary::{build_comparison_summary, compare, metric_table, select_base};
pub use types::{
    CompareOptions, ComparisonReport, ComparisonSummary, Direction, Insight, InsightKind, Metric,
    MetricDifference, MetricRow, MetricValue, Metrics, NormalizedScenario, RankedScenario,
    Recommendations, ScenarioDifference, ScenarioInsights, Trend,
};
