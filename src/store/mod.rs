pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::Application;
use crate::models::interview::{Interview, InterviewKey, InterviewStatus};
use crate::models::job::Job;

pub use memory::MemoryStore;
pub use postgres::PgRecordStore;

/// Record-store contract the pipeline components depend on. The service only
/// trusts per-row atomicity from implementations; there is no cross-entity
/// transaction at this boundary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>>;

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>>;

    /// Insert-or-update by primary key. Implementations must reject a write
    /// that would leave two live interviews on the same (job, seeker) key;
    /// that rejection surfaces as `Error::SchedulingConflict`.
    async fn upsert_interview(&self, interview: &Interview) -> Result<Interview>;

    /// Permanently removes the interview. Irreversible.
    async fn delete_interview(&self, id: Uuid) -> Result<()>;

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>>;

    async fn find_application(&self, job_id: Uuid, seeker_id: Uuid)
        -> Result<Option<Application>>;

    async fn upsert_application(&self, application: &Application) -> Result<Application>;

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>>;
}

/// Interview lookup filter. Every field is conjunctive; `company_id` filters
/// through the owning job.
#[derive(Debug, Clone, Default)]
pub struct InterviewFilter {
    pub application_id: Option<Uuid>,
    pub seeker_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub statuses: Option<Vec<InterviewStatus>>,
    pub scheduled_from: Option<DateTime<Utc>>,
    pub scheduled_to: Option<DateTime<Utc>>,
    pub company_id: Option<Uuid>,
}

impl InterviewFilter {
    pub fn for_key(key: &InterviewKey) -> Self {
        match key {
            InterviewKey::Application(app_id) => InterviewFilter {
                application_id: Some(*app_id),
                ..Default::default()
            },
            InterviewKey::Direct { seeker_id, job_id } => InterviewFilter {
                seeker_id: Some(*seeker_id),
                job_id: Some(*job_id),
                ..Default::default()
            },
        }
    }

    pub fn for_pair(job_id: Uuid, seeker_id: Uuid) -> Self {
        InterviewFilter {
            job_id: Some(job_id),
            seeker_id: Some(seeker_id),
            ..Default::default()
        }
    }

    /// Restrict to live interviews (scheduled or in progress).
    pub fn live(mut self) -> Self {
        self.statuses = Some(InterviewStatus::live_set());
        self
    }

    pub fn with_statuses(mut self, statuses: Vec<InterviewStatus>) -> Self {
        self.statuses = Some(statuses);
        self
    }
}
