use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::CompareError;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    TotalIncome,
    OrdinaryIncome,
    CapitalGains,
    SocialSecurityIncome,
    FederalTax,
    StateTax,
    FicaTax,
    TotalTax,
    MarginalRate,
    EffectiveRate,
    #[default]
    AfterTaxIncome,
    StandardDeduction,
    ItemizedDeductions,
    TotalDeductions,
    TaxableIncome,
    IrmaaAmount,
    MedicarePartB,
    MedicarePartD,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

impl Metric {
    pub const ALL: [Metric; 18] = [
        Metric::TotalIncome,
        Metric::OrdinaryIncome,
        Metric::CapitalGains,
        Metric::SocialSecurityIncome,
        Metric::FederalTax,
        Metric::StateTax,
        Metric::FicaTax,
        Metric::TotalTax,
        Metric::MarginalRate,
        Metric::EffectiveRate,
        Metric::AfterTaxIncome,
        Metric::StandardDeduction,
        Metric::ItemizedDeductions,
        Metric::TotalDeductions,
        Metric::TaxableIncome,
        Metric::IrmaaAmount,
        Metric::MedicarePartB,
        Metric::MedicarePartD,
    ];

    /// Key used both in `data.calculations` and in serialized output.
    pub fn key(self) -> &'static str {
        match self {
            Metric::TotalIncome => "totalIncome",
            Metric::OrdinaryIncome => "ordinaryIncome",
            Metric::CapitalGains => "capitalGains",
            Metric::SocialSecurityIncome => "socialSecurityIncome",
            Metric::FederalTax => "federalTax",
            Metric::StateTax => "stateTax",
            Metric::FicaTax => "ficaTax",
            Metric::TotalTax => "totalTax",
            Metric::MarginalRate => "marginalRate",
            Metric::EffectiveRate => "effectiveRate",
            Metric::AfterTaxIncome => "afterTaxIncome",
            Metric::StandardDeduction => "standardDeduction",
            Metric::ItemizedDeductions => "itemizedDeductions",
            Metric::TotalDeductions => "totalDeductions",
            Metric::TaxableIncome => "taxableIncome",
            Metric::IrmaaAmount => "irmaaAmount",
            Metric::MedicarePartB => "medicarePartB",
            Metric::MedicarePartD => "medicarePartD",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalIncome => "Total Income",
            Metric::OrdinaryIncome => "Ordinary Income",
            Metric::CapitalGains => "Capital Gains",
            Metric::SocialSecurityIncome => "Social Security Income",
            Metric::FederalTax => "Federal Tax",
            Metric::StateTax => "State Tax",
            Metric::FicaTax => "FICA Tax",
            Metric::TotalTax => "Total Tax",
            Metric::MarginalRate => "Marginal Rate",
            Metric::EffectiveRate => "Effective Rate",
            Metric::AfterTaxIncome => "After-Tax Income",
            Metric::StandardDeduction => "Standard Deduction",
            Metric::ItemizedDeductions => "Itemized Deductions",
            Metric::TotalDeductions => "Total Deductions",
            Metric::TaxableIncome => "Taxable Income",
            Metric::IrmaaAmount => "IRMAA Surcharge",
            Metric::MedicarePartB => "Medicare Part B",
            Metric::MedicarePartD => "Medicare Part D",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Metric::TotalTax
            | Metric::FederalTax
            | Metric::StateTax
            | Metric::FicaTax
            | Metric::IrmaaAmount => Direction::LowerIsBetter,
            _ => Direction::HigherIsBetter,
        }
    }

    /// Rate metrics hold percentage points rather than dollars.
    pub fn is_rate(self) -> bool {
        matches!(self, Metric::MarginalRate | Metric::EffectiveRate)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Metric::ALL
            .into_iter()
            .find(|metric| metric.key().to_lowercase() == folded)
            .ok_or_else(|| CompareError::UnknownMetric(s.to_string()))
    }
}

/// Fixed-schema metric record. Every field is finite once it leaves the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_income: f64,
    pub ordinary_income: f64,
    pub capital_gains: f64,
    pub social_security_income: f64,
    pub federal_tax: f64,
    pub state_tax: f64,
    pub fica_tax: f64,
    pub total_tax: f64,
    pub marginal_rate: f64,
    /// Percentage points (0-100), not a fraction.
    pub effective_rate: f64,
    pub after_tax_income: f64,
    pub standard_deduction: f64,
    pub itemized_deductions: f64,
    pub total_deductions: f64,
    pub taxable_income: f64,
    pub irmaa_amount: f64,
    pub medicare_part_b: f64,
    pub medicare_part_d: f64,
}

impl Metrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalIncome => self.total_income,
            Metric::OrdinaryIncome => self.ordinary_income,
            Metric::CapitalGains => self.capital_gains,
            Metric::SocialSecurityIncome => self.social_security_income,
            Metric::FederalTax => self.federal_tax,
            Metric::StateTax => self.state_tax,
            Metric::FicaTax => self.fica_tax,
            Metric::TotalTax => self.total_tax,
            Metric::MarginalRate => self.marginal_rate,
            Metric::EffectiveRate => self.effective_rate,
            Metric::AfterTaxIncome => self.after_tax_income,
            Metric::StandardDeduction => self.standard_deduction,
            Metric::ItemizedDeductions => self.itemized_deductions,
            Metric::TotalDeductions => self.total_deductions,
            Metric::TaxableIncome => self.taxable_income,
            Metric::IrmaaAmount => self.irmaa_amount,
            Metric::MedicarePartB => self.medicare_part_b,
            Metric::MedicarePartD => self.medicare_part_d,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::TotalIncome => &mut self.total_income,
            Metric::OrdinaryIncome => &mut self.ordinary_income,
            Metric::CapitalGains => &mut self.capital_gains,
            Metric::SocialSecurityIncome => &mut self.social_security_income,
            Metric::FederalTax => &mut self.federal_tax,
            Metric::StateTax => &mut self.state_tax,
            Metric::FicaTax => &mut self.fica_tax,
            Metric::TotalTax => &mut self.total_tax,
            Metric::MarginalRate => &mut self.marginal_rate,
            Metric::EffectiveRate => &mut self.effective_rate,
            Metric::AfterTaxIncome => &mut self.after_tax_income,
            Metric::StandardDeduction => &mut self.standard_deduction,
            Metric::ItemizedDeductions => &mut self.itemized_deductions,
            Metric::TotalDeductions => &mut self.total_deductions,
            Metric::TaxableIncome => &mut self.taxable_income,
            Metric::IrmaaAmount => &mut self.irmaa_amount,
            Metric::MedicarePartB => &mut self.medicare_part_b,
            Metric::MedicarePartD => &mut self.medicare_part_d,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(|metric| (metric, self.get(metric)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedScenario {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub metrics: Metrics,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increase,
    Decrease,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDifference {
    pub base: f64,
    pub compare: f64,
    pub absolute: f64,
    pub percent: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDifference {
    pub scenario_id: String,
    pub scenario_name: String,
    pub differences: BTreeMap<Metric, MetricDifference>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Negative,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub category: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInsights {
    pub scenario_id: String,
    pub scenario_name: String,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedScenario {
    #[serde(flatten)]
    pub scenario: NormalizedScenario,
    pub rank: usize,
    pub is_best: bool,
    pub is_worst: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub best_after_tax_income: String,
    pub lowest_total_tax: String,
    pub best_effective_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub base_scenario: String,
    pub compare_scenarios: Vec<String>,
    pub total_comparisons: usize,
    pub differences: Vec<ScenarioDifference>,
    pub insights: Vec<ScenarioInsights>,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub scenario_id: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRow {
    pub metric: Metric,
    pub label: &'static str,
    pub direction: Direction,
    pub values: Vec<MetricValue>,
    pub best_scenario_id: String,
    pub spread: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub scenarios: Vec<NormalizedScenario>,
    pub summary: Option<ComparisonSummary>,
    pub rank_by: Metric,
    pub ranking: Vec<RankedScenario>,
    pub table: Vec<MetricRow>,
}

#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    pub base_scenario_id: Option<String>,
    pub rank_by: Metric,
}
