use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::{BandThresholds, DecisionText};

/// Categorical risk band, ordered from least to most risky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub const fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk",
            RiskBand::Medium => "Medium Risk",
            RiskBand::High => "High Risk",
        }
    }

    /// Reads either the short ("High") or the display ("High Risk") form.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        let short = normalized
            .strip_suffix(" risk")
            .unwrap_or(normalized.as_str());
        match short {
            "low" => Some(RiskBand::Low),
            "medium" => Some(RiskBand::Medium),
            "high" => Some(RiskBand::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn band_for(score: f64, thresholds: &BandThresholds) -> RiskBand {
    if score <= thresholds.low_max {
        RiskBand::Low
    } else if score <= thresholds.medium_max {
        RiskBand::Medium
    } else {
        RiskBand::High
    }
}

pub(crate) fn decision_for(band: RiskBand, decisions: &DecisionText) -> &str {
    match band {
        RiskBand::Low => &decisions.low,
        RiskBand::Medium => &decisions.medium,
        RiskBand::High => &decisions.high,
    }
}

/// Decision for a band label read back from storage. Labels that no longer
/// parse get the medium recommendation.
pub fn decision_for_label<'a>(label: &str, decisions: &'a DecisionText) -> &'a str {
    decision_for(RiskBand::parse(label).unwrap_or(RiskBand::Medium), decisions)
}
