use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Survey-level scoring configuration the engine is constructed with.
///
/// Survey versions may carry their own section weights and band thresholds;
/// the engine never reaches for globals, so whichever value the caller hands
/// in is the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Sections scored independently, in reporting order.
    pub sections: Vec<String>,
    /// Pseudo-sections whose score is the plain mean of their members.
    pub combined_sections: BTreeMap<String, Vec<String>>,
    /// Weight of each (pseudo-)section in the overall score.
    pub section_weights: BTreeMap<String, f64>,
    pub bands: BandThresholds,
    pub decisions: DecisionText,
}

impl Default for RiskConfig {
    fn default() -> Self {
        let sections = ["B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"]
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut combined_sections = BTreeMap::new();
        combined_sections.insert(
            "JKL".to_string(),
            vec!["J".to_string(), "K".to_string(), "L".to_string()],
        );

        let section_weights = [
            ("B", 15.0),
            ("C", 15.0),
            ("D", 15.0),
            ("E", 5.0),
            ("F", 15.0),
            ("G", 10.0),
            ("H", 15.0),
            ("I", 5.0),
            ("JKL", 5.0),
        ]
        .into_iter()
        .map(|(section, weight)| (section.to_string(), weight))
        .collect();

        Self {
            sections,
            combined_sections,
            section_weights,
            bands: BandThresholds::default(),
            decisions: DecisionText::default(),
        }
    }
}

impl RiskConfig {
    /// Reports every problem at once rather than stopping at the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (section, weight) in &self.section_weights {
            if !weight.is_finite() || *weight < 0.0 {
                errors.push(format!(
                    "section_weights.{section}: must be a non-negative number (found {weight})"
                ));
            }
        }

        for (name, members) in &self.combined_sections {
            if members.is_empty() {
                errors.push(format!("combined_sections.{name}: needs at least one section"));
            }
            for member in members {
                if !self.sections.contains(member) {
                    errors.push(format!(
                        "combined_sections.{name}: unknown section '{member}'"
                    ));
                }
            }
        }

        let BandThresholds {
            low_max,
            medium_max,
        } = self.bands;
        if !low_max.is_finite() || !medium_max.is_finite() {
            errors.push("bands: thresholds must be finite".to_string());
        } else if low_max > medium_max {
            errors.push(format!(
                "bands: low_max ({low_max}) must not exceed medium_max ({medium_max})"
            ));
        }

        for (band, text) in [
            ("low", &self.decisions.low),
            ("medium", &self.decisions.medium),
            ("high", &self.decisions.high),
        ] {
            if text.trim().is_empty() {
                errors.push(format!("decisions.{band}: must not be empty"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Inclusive upper bounds of the low and medium risk bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandThresholds {
    pub low_max: f64,
    pub medium_max: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            low_max: 30.0,
            medium_max: 60.0,
        }
    }
}

/// Investment recommendation shown for each band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionText {
    pub low: String,
    pub medium: String,
    pub high: String,
}

impl Default for DecisionText {
    fn default() -> Self {
        Self {
            low: "Strong candidate for investment (subject to diligence)".to_string(),
            medium: "Proceed with caution; require mitigations".to_string(),
            high: "Not recommended unless major risks resolved".to_string(),
        }
    }
}
