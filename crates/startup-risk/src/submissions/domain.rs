use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    standard_questionnaire, AnswerSet, QuestionDefinition, RiskBreakdown, RiskConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StartupId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurveyVersionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

macro_rules! display_id {
    ($($id:ty),+) => {
        $(impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })+
    };
}

display_id!(StartupId, SurveyVersionId, SubmissionId);

/// Published questionnaire together with the scoring configuration it is
/// assessed under. Submissions keep pointing at the version they were
/// answered against even after a newer one goes live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyVersion {
    pub id: SurveyVersionId,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub questions: Vec<QuestionDefinition>,
    #[serde(default)]
    pub risk_config: RiskConfig,
}

impl SurveyVersion {
    /// Active version carrying the standard questionnaire and built-in config.
    pub fn standard(id: impl Into<String>) -> Self {
        Self {
            id: SurveyVersionId(id.into()),
            active: true,
            notes: None,
            questions: standard_questionnaire(),
            risk_config: RiskConfig::default(),
        }
    }
}

/// Work-in-progress answers. Drafts are never scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub startup: StartupId,
    pub version: SurveyVersionId,
    pub answers: AnswerSet,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub startup: StartupId,
    pub version: SurveyVersionId,
    pub answers: AnswerSet,
    pub breakdown: RiskBreakdown,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recomputed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartupStatus {
    Invited,
    Active,
    Locked,
}

impl StartupStatus {
    pub const fn label(self) -> &'static str {
        match self {
            StartupStatus::Invited => "invited",
            StartupStatus::Active => "active",
            StartupStatus::Locked => "locked",
        }
    }
}
