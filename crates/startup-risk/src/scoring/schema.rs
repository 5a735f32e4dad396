use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Static lookup table from an answer option to a risk value (or multiplier).
pub type ScoreTable = BTreeMap<String, f64>;

/// Canonical labels the cross-question rules read their inputs from.
pub mod labels {
    pub const DESCRIPTION: &str = "Description of Offering(s)";
    pub const STARTUP_STAGE: &str = "Startup Stage";
    pub const PRIMARY_MARKETS: &str = "Primary Geographic Markets";
    pub const OTHER_MARKETS: &str = "Other Markets (Active/Planned)";
    pub const REGULATORY_BODIES: &str = "Regulatory Bodies";
    pub const COMPLIANCE_READINESS: &str = "Compliance Readiness";
    pub const IP_APPLICABLE: &str = "IP Applicable?";
    pub const IP_TYPE: &str = "IP Type";
    pub const IP_STATUS: &str = "IP Status";
    pub const CAC: &str = "Expected CAC (Customer Acquisition Cost)";
    pub const LTV: &str = "Expected LTV (Lifetime Value)";
    pub const TAM: &str = "TAM (Total Addressable Market)";
    pub const SAM: &str = "SAM (Serviceable Addressable Market)";
    pub const SOM: &str = "SOM (Serviceable Obtainable Market)";
    pub const DATA_SOURCES: &str = "Data Sources";
    pub const SOURCE_TYPE: &str = "Source Type";
    pub const REVENUE_STATUS: &str = "Revenue Status";
    pub const GROWTH_RATES: &str = "MoM Growth Rate (Last 6-12 Months)";
    pub const CUSTOMER_CONTRACTS: &str = "Customer Contracts";
    pub const TOP3_SHARE: &str = "Top 3 Customers Revenue Share (%)";
    pub const EXPENSE_ALLOCATION: &str = "Expense Allocation";
    pub const EXIT_TYPE: &str = "Exit Type";
    pub const EXIT_TIMELINE: &str = "Exit Timeline";
    pub const TARGET_VALUATION: &str = "Target Valuation";
    pub const TARGET_BUYER: &str = "Target Buyer Profile";
    pub const SELF_RISKS: [&str; 3] = ["Top Risk #1", "Top Risk #2", "Top Risk #3"];
    pub const SELF_RISK_CATEGORIES: [&str; 3] =
        ["Risk #1 Category", "Risk #2 Category", "Risk #3 Category"];
}

/// One question of a survey version, as configured by an administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub label: String,
    pub section: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub required: bool,
    #[serde(
        default,
        alias = "scoring_rules",
        skip_serializing_if = "Option::is_none"
    )]
    pub scoring: Option<ScoringRule>,
}

impl QuestionDefinition {
    pub fn new(section: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            section: section.into(),
            weight,
            required: false,
            scoring: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn scored(mut self, rule: ScoringRule) -> Self {
        self.scoring = Some(rule);
        self
    }

    /// Informational questions carry no weight and never enter a section score.
    pub fn is_scored(&self) -> bool {
        self.weight.is_finite() && self.weight > 0.0
    }
}

/// Heuristic selected by a question's scoring descriptor.
///
/// Serialized with a `type` tag so descriptors stored alongside survey
/// versions round-trip unchanged. Tags this build does not know deserialize to
/// [`ScoringRule::Unknown`] and score neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringRule {
    DescriptionCompleteness,
    StageRisk {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        map: ScoreTable,
    },
    GeographyComplexity,
    RegulatoryBurden {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        burden: ScoreTable,
    },
    ComplianceMultiplier {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        map: ScoreTable,
    },
    IpRisk {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        map: ScoreTable,
    },
    UnitEconomics,
    MarketSizing,
    SourceQuality {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        map: ScoreTable,
    },
    RevenueStage,
    GrowthConsistency,
    ContractConcentration,
    CustomerConcentration,
    ExpenseBalance,
    ExitClarity {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        map: ScoreTable,
    },
    ExitTimeline {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        map: ScoreTable,
    },
    SelfRiskCompleteness,
    #[serde(other)]
    Unknown,
}

impl ScoringRule {
    pub fn stage_risk(map: ScoreTable) -> Self {
        ScoringRule::StageRisk { map }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScoringRule::DescriptionCompleteness => "description_completeness",
            ScoringRule::StageRisk { .. } => "stage_risk",
            ScoringRule::GeographyComplexity => "geography_complexity",
            ScoringRule::RegulatoryBurden { .. } => "regulatory_burden",
            ScoringRule::ComplianceMultiplier { .. } => "compliance_multiplier",
            ScoringRule::IpRisk { .. } => "ip_risk",
            ScoringRule::UnitEconomics => "unit_economics",
            ScoringRule::MarketSizing => "market_sizing",
            ScoringRule::SourceQuality { .. } => "source_quality",
            ScoringRule::RevenueStage => "revenue_stage",
            ScoringRule::GrowthConsistency => "growth_consistency",
            ScoringRule::ContractConcentration => "contract_concentration",
            ScoringRule::CustomerConcentration => "customer_concentration",
            ScoringRule::ExpenseBalance => "expense_balance",
            ScoringRule::ExitClarity { .. } => "exit_clarity",
            ScoringRule::ExitTimeline { .. } => "exit_timeline",
            ScoringRule::SelfRiskCompleteness => "self_risk_completeness",
            ScoringRule::Unknown => "unknown",
        }
    }
}

/// Built-in lookup tables, overridable per survey version through rule payloads.
pub mod tables {
    use super::ScoreTable;

    fn table(entries: &[(&str, f64)]) -> ScoreTable {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), *value))
            .collect()
    }

    pub fn stage_risk() -> ScoreTable {
        table(&[
            ("Idea", 90.0),
            ("MVP", 75.0),
            ("Alpha", 65.0),
            ("Beta", 55.0),
            ("Early Revenue", 40.0),
            ("Scale-up", 25.0),
        ])
    }

    pub fn regulatory_burden() -> ScoreTable {
        table(&[
            ("GDPR", 15.0),
            ("HIPAA", 20.0),
            ("FDA", 25.0),
            ("SEC", 15.0),
            ("FINRA", 25.0),
            ("FCA", 20.0),
            ("EMA", 20.0),
            ("OCC", 15.0),
            ("CFPB", 15.0),
            ("MAS", 15.0),
            ("SFC", 15.0),
            ("ASIC", 15.0),
            ("CFTC", 20.0),
            ("ISO 27001", 10.0),
            ("Other", 15.0),
            ("None", 0.0),
        ])
    }

    pub fn compliance_multiplier() -> ScoreTable {
        table(&[
            ("Not Started", 1.20),
            ("In Progress", 1.00),
            ("Fully Compliant", 0.80),
        ])
    }

    pub fn ip_status() -> ScoreTable {
        table(&[
            ("Granted", 25.0),
            ("Filed", 45.0),
            ("Pending", 55.0),
            ("Rejected", 80.0),
        ])
    }

    pub fn source_quality() -> ScoreTable {
        table(&[
            ("Analyst Report", 45.0),
            ("Government Data", 45.0),
            ("Academic", 45.0),
            ("Internal Survey", 55.0),
            ("Other", 65.0),
        ])
    }

    pub fn exit_type() -> ScoreTable {
        table(&[
            ("Undecided", 80.0),
            ("Acquisition", 45.0),
            ("IPO", 55.0),
            ("Secondary Sale", 50.0),
        ])
    }

    pub fn exit_timeline() -> ScoreTable {
        table(&[
            ("<3 years", 65.0),
            ("3-5 years", 40.0),
            ("5-7 years", 45.0),
            ("7-10 years", 55.0),
            ("10+ years", 70.0),
        ])
    }
}

/// The default startup-assessment questionnaire (sections A through L).
///
/// Section A is informational only; every other section carries at least one
/// weighted, scored question.
pub fn standard_questionnaire() -> Vec<QuestionDefinition> {
    use labels::*;

    let [risk1, risk2, risk3] = SELF_RISKS;
    let [category1, category2, category3] = SELF_RISK_CATEGORIES;

    vec![
        QuestionDefinition::new("A", "Startup Name", 0.0).required(),
        QuestionDefinition::new("A", "Website", 0.0),
        QuestionDefinition::new("A", "Industry/Sector", 0.0).required(),
        QuestionDefinition::new("A", "Year Founded", 0.0).required(),
        QuestionDefinition::new("A", "Number of Employees", 0.0).required(),
        QuestionDefinition::new("A", "Founders' LinkedIn Profiles", 0.0),
        QuestionDefinition::new("B", DESCRIPTION, 1.5)
            .required()
            .scored(ScoringRule::DescriptionCompleteness),
        QuestionDefinition::new("B", STARTUP_STAGE, 2.0)
            .required()
            .scored(ScoringRule::stage_risk(tables::stage_risk())),
        QuestionDefinition::new("C", PRIMARY_MARKETS, 1.5)
            .required()
            .scored(ScoringRule::GeographyComplexity),
        QuestionDefinition::new("C", OTHER_MARKETS, 1.0).scored(ScoringRule::GeographyComplexity),
        QuestionDefinition::new("C", "Go-to-Market Motion", 0.5),
        QuestionDefinition::new("D", REGULATORY_BODIES, 2.0)
            .required()
            .scored(ScoringRule::RegulatoryBurden {
                burden: tables::regulatory_burden(),
            }),
        QuestionDefinition::new("D", COMPLIANCE_READINESS, 1.5)
            .required()
            .scored(ScoringRule::ComplianceMultiplier {
                map: tables::compliance_multiplier(),
            }),
        QuestionDefinition::new("E", IP_APPLICABLE, 1.5).required(),
        QuestionDefinition::new("E", IP_TYPE, 0.0),
        QuestionDefinition::new("E", IP_STATUS, 0.0).scored(ScoringRule::IpRisk {
            map: tables::ip_status(),
        }),
        QuestionDefinition::new("E", "IP Jurisdictions", 0.0),
        QuestionDefinition::new("E", "IP Reference/Link", 0.0),
        QuestionDefinition::new("F", "Revenue Model", 0.5).required(),
        QuestionDefinition::new("F", CAC, 1.5)
            .required()
            .scored(ScoringRule::UnitEconomics),
        QuestionDefinition::new("F", LTV, 1.5)
            .required()
            .scored(ScoringRule::UnitEconomics),
        QuestionDefinition::new("F", "Currency", 0.0).required(),
        QuestionDefinition::new("G", TAM, 1.0)
            .required()
            .scored(ScoringRule::MarketSizing),
        QuestionDefinition::new("G", SAM, 1.0)
            .required()
            .scored(ScoringRule::MarketSizing),
        QuestionDefinition::new("G", SOM, 1.0)
            .required()
            .scored(ScoringRule::MarketSizing),
        QuestionDefinition::new("G", "Market Size Currency", 0.0).required(),
        QuestionDefinition::new("G", DATA_SOURCES, 0.5),
        QuestionDefinition::new("G", SOURCE_TYPE, 1.0)
            .required()
            .scored(ScoringRule::SourceQuality {
                map: tables::source_quality(),
            }),
        QuestionDefinition::new("H", REVENUE_STATUS, 1.5)
            .required()
            .scored(ScoringRule::RevenueStage),
        QuestionDefinition::new("H", "Current MRR/ARR", 1.0),
        QuestionDefinition::new("H", "Revenue Currency", 0.0),
        QuestionDefinition::new("H", GROWTH_RATES, 2.0).scored(ScoringRule::GrowthConsistency),
        QuestionDefinition::new("I", CUSTOMER_CONTRACTS, 1.5)
            .scored(ScoringRule::ContractConcentration),
        QuestionDefinition::new("I", TOP3_SHARE, 1.0).scored(ScoringRule::CustomerConcentration),
        QuestionDefinition::new("J", EXPENSE_ALLOCATION, 1.5)
            .required()
            .scored(ScoringRule::ExpenseBalance),
        QuestionDefinition::new("K", EXIT_TYPE, 1.5)
            .required()
            .scored(ScoringRule::ExitClarity {
                map: tables::exit_type(),
            }),
        QuestionDefinition::new("K", EXIT_TIMELINE, 1.0)
            .required()
            .scored(ScoringRule::ExitTimeline {
                map: tables::exit_timeline(),
            }),
        QuestionDefinition::new("K", TARGET_VALUATION, 0.5),
        QuestionDefinition::new("K", TARGET_BUYER, 0.5),
        QuestionDefinition::new("L", risk1, 1.0)
            .required()
            .scored(ScoringRule::SelfRiskCompleteness),
        QuestionDefinition::new("L", category1, 0.0).required(),
        QuestionDefinition::new("L", risk2, 1.0)
            .required()
            .scored(ScoringRule::SelfRiskCompleteness),
        QuestionDefinition::new("L", category2, 0.0).required(),
        QuestionDefinition::new("L", risk3, 1.0)
            .required()
            .scored(ScoringRule::SelfRiskCompleteness),
        QuestionDefinition::new("L", category3, 0.0).required(),
    ]
}

/// Accepts `true`/`false` as well as the `1`/`0` integers older exports use.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Int(value) => value != 0,
    })
}
