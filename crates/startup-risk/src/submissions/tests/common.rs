use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::scoring::{labels, AnswerSet};
use crate::submissions::domain::{
    Draft, StartupId, StartupStatus, SubmissionId, SubmissionRecord, SurveyVersion,
    SurveyVersionId,
};
use crate::submissions::repository::{
    InMemorySubmissionRepository, RepositoryError, SubmissionRepository,
};
use crate::submissions::SubmissionService;

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn startup(id: &str) -> StartupId {
    StartupId(id.to_string())
}

pub(super) fn service() -> (
    SubmissionService<InMemorySubmissionRepository>,
    Arc<InMemorySubmissionRepository>,
) {
    let repository = Arc::new(InMemorySubmissionRepository::with_version(
        SurveyVersion::standard("v1"),
    ));
    let service = SubmissionService::with_clock(repository.clone(), fixed_now);
    (service, repository)
}

pub(super) fn mvp_answers() -> AnswerSet {
    AnswerSet::new()
        .with(labels::STARTUP_STAGE, "MVP")
        .with(labels::PRIMARY_MARKETS, vec!["USA"])
        .with(labels::CAC, "200")
        .with(labels::LTV, "800")
        .with(labels::REVENUE_STATUS, "Pre-revenue")
        .with(labels::EXIT_TYPE, "Acquisition")
        .with(labels::EXIT_TIMELINE, "3-5 years")
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn active_version(&self) -> Result<Option<SurveyVersion>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn version(&self, _id: &SurveyVersionId) -> Result<Option<SurveyVersion>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_draft(&self, _draft: Draft) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_draft(&self, _startup: &StartupId) -> Result<Option<Draft>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn status(&self, _startup: &StartupId) -> Result<Option<StartupStatus>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_status(
        &self,
        _startup: &StartupId,
        _status: StartupStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_submission(
        &self,
        _record: SubmissionRecord,
    ) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_submission(&self, _record: SubmissionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_submission(
        &self,
        _id: &SubmissionId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_submission(
        &self,
        _startup: &StartupId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn submissions(
        &self,
        _startup: &StartupId,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
