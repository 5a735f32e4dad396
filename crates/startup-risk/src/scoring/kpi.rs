use serde::{Deserialize, Serialize};

/// Cross-cutting measures used to compare submissions on a single dimension.
///
/// KPIs re-run selected heuristics directly and are never weighted into the
/// total risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiScores {
    #[serde(rename = "kpi_regulatory")]
    pub regulatory: f64,
    #[serde(rename = "kpi_unit_economics")]
    pub unit_economics: f64,
    #[serde(rename = "kpi_growth_stability")]
    pub growth_stability: f64,
    #[serde(rename = "kpi_customer_concentration")]
    pub customer_concentration: f64,
    #[serde(rename = "kpi_execution_complexity")]
    pub execution_complexity: f64,
    #[serde(rename = "kpi_exit_clarity")]
    pub exit_clarity: f64,
}

impl KpiScores {
    pub const KEYS: [&'static str; 6] = [
        "kpi_regulatory",
        "kpi_unit_economics",
        "kpi_growth_stability",
        "kpi_customer_concentration",
        "kpi_execution_complexity",
        "kpi_exit_clarity",
    ];

    /// Values paired with their serialized keys, in a fixed order.
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        let [regulatory, unit_economics, growth, concentration, execution, exit] = Self::KEYS;
        [
            (regulatory, self.regulatory),
            (unit_economics, self.unit_economics),
            (growth, self.growth_stability),
            (concentration, self.customer_concentration),
            (execution, self.execution_complexity),
            (exit, self.exit_clarity),
        ]
    }

    /// Per-KPI movement from `self` to `later`. Positive changes mean the
    /// later submission is riskier on that dimension.
    pub fn compare(&self, later: &KpiScores) -> Vec<KpiDelta> {
        self.entries()
            .into_iter()
            .zip(later.entries())
            .map(|((kpi, before), (_, after))| KpiDelta {
                kpi,
                before,
                after,
                change: round_to_cents(after - before),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiDelta {
    pub kpi: &'static str,
    pub before: f64,
    pub after: f64,
    pub change: f64,
}

pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
