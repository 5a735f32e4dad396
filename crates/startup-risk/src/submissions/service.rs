use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{
    Draft, StartupId, StartupStatus, SubmissionId, SubmissionRecord, SurveyVersion,
    SurveyVersionId,
};
use super::repository::{RepositoryError, SubmissionRepository};
use crate::scoring::{AnswerSet, ScoringEngine};

/// Drives drafts, final submissions and recomputes against a repository.
///
/// Scoring happens exactly once per submission event: on `submit` and on an
/// explicit `recompute`. Saving a draft never scores.
pub struct SubmissionService<R> {
    repository: Arc<R>,
    now: fn() -> DateTime<Utc>,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

impl<R> SubmissionService<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_clock(repository, Utc::now)
    }

    pub fn with_clock(repository: Arc<R>, now: fn() -> DateTime<Utc>) -> Self {
        Self { repository, now }
    }

    /// Store answers against the draft's version, or the active version for a
    /// first draft.
    pub fn save_draft(
        &self,
        startup: &StartupId,
        answers: AnswerSet,
    ) -> Result<Draft, SubmissionError> {
        let version = match self.repository.latest_draft(startup)? {
            Some(existing) => existing.version,
            None => self.active_version()?.id,
        };

        let draft = Draft {
            startup: startup.clone(),
            version,
            answers,
            updated_at: (self.now)(),
        };
        self.repository.save_draft(draft.clone())?;
        Ok(draft)
    }

    /// Score the final answers, persist the record and lock the startup.
    pub fn submit(
        &self,
        startup: &StartupId,
        answers: AnswerSet,
    ) -> Result<SubmissionRecord, SubmissionError> {
        if self.repository.status(startup)? == Some(StartupStatus::Locked) {
            return Err(SubmissionError::Locked(startup.clone()));
        }

        let version = match self.repository.latest_draft(startup)? {
            Some(draft) => self.version(&draft.version)?,
            None => self.active_version()?,
        };

        let breakdown =
            ScoringEngine::new(version.risk_config.clone()).score(&answers, &version.questions);
        let record = SubmissionRecord {
            id: next_submission_id(),
            startup: startup.clone(),
            version: version.id,
            answers,
            breakdown,
            submitted_at: (self.now)(),
            recomputed_at: None,
        };

        let stored = self.repository.insert_submission(record)?;
        self.repository.set_status(startup, StartupStatus::Locked)?;

        info!(
            submission = %stored.id,
            startup = %startup,
            total_risk_score = stored.breakdown.total_risk_score,
            band = stored.breakdown.risk_band.label(),
            "submission scored"
        );
        Ok(stored)
    }

    /// Re-score stored answers with the stored version, replacing the
    /// breakdown wholesale.
    pub fn recompute(&self, id: &SubmissionId) -> Result<SubmissionRecord, SubmissionError> {
        let mut record = self
            .repository
            .fetch_submission(id)?
            .ok_or_else(|| SubmissionError::UnknownSubmission(id.clone()))?;
        let version = self.version(&record.version)?;

        let breakdown =
            ScoringEngine::new(version.risk_config).score(&record.answers, &version.questions);
        let previous = record.breakdown.total_risk_score;
        record.breakdown = breakdown;
        record.recomputed_at = Some((self.now)());
        self.repository.update_submission(record.clone())?;

        info!(
            submission = %id,
            previous,
            total_risk_score = record.breakdown.total_risk_score,
            "submission recomputed"
        );
        Ok(record)
    }

    pub fn latest(&self, startup: &StartupId) -> Result<Option<SubmissionRecord>, SubmissionError> {
        Ok(self.repository.latest_submission(startup)?)
    }

    pub fn history(&self, startup: &StartupId) -> Result<Vec<SubmissionRecord>, SubmissionError> {
        Ok(self.repository.submissions(startup)?)
    }

    fn active_version(&self) -> Result<SurveyVersion, SubmissionError> {
        self.repository
            .active_version()?
            .ok_or(SubmissionError::NoActiveVersion)
    }

    fn version(&self, id: &SurveyVersionId) -> Result<SurveyVersion, SubmissionError> {
        self.repository
            .version(id)?
            .ok_or_else(|| SubmissionError::UnknownVersion(id.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("startup {0} has already submitted and is locked")]
    Locked(StartupId),
    #[error("no active survey version is published")]
    NoActiveVersion,
    #[error("survey version {0} does not exist")]
    UnknownVersion(SurveyVersionId),
    #[error("submission {0} does not exist")]
    UnknownSubmission(SubmissionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
