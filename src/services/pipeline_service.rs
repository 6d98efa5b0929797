use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::dto::interview_dto::{
    InterviewFeedbackPayload, InterviewListQuery, RescheduleInterviewPayload,
    ScheduleInterviewPayload,
};
use crate::error::{Error, Result};
use crate::middleware::auth::ActorContext;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::{Interview, InterviewKey, InterviewStatus};
use crate::services::interview_service::InterviewService;
use crate::services::progression_service::{NextRoundCheck, Progression, ProgressionService};
use crate::services::status_sync_service::StatusSyncService;
use crate::store::{InterviewFilter, RecordStore};

/// The single caller-facing surface of the pipeline. Sequences the guard,
/// tracker, lifecycle and synchronizer; surfaces the first failure
/// unmodified and adds no invariants of its own beyond call ordering.
#[derive(Clone)]
pub struct PipelineService {
    store: Arc<dyn RecordStore>,
    interviews: InterviewService,
    sync: StatusSyncService,
    progression: ProgressionService,
}

impl PipelineService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        interviews: InterviewService,
        sync: StatusSyncService,
        progression: ProgressionService,
    ) -> Self {
        Self {
            store,
            interviews,
            sync,
            progression,
        }
    }

    pub async fn schedule_interview(
        &self,
        actor: &ActorContext,
        payload: ScheduleInterviewPayload,
    ) -> Result<Interview> {
        let interview = self.interviews.create(actor, payload).await?;

        // A first interview moves a fresh application into the interviewing
        // column. Best-effort, same swallow policy as the rest of the sync.
        if interview.application_status == Some(ApplicationStatus::New) {
            if let Err(error) = self
                .sync
                .manage_application_status(
                    interview.job_id,
                    interview.seeker_id,
                    ApplicationStatus::Interviewing,
                    None,
                )
                .await
            {
                warn!(
                    interview_id = %interview.id,
                    %error,
                    "could not move application to interviewing after scheduling"
                );
                return Ok(interview);
            }
            // Return the refreshed mirror when we can get it; the interview
            // itself was already written, so a failed re-read is not fatal.
            return Ok(match self.store.get_interview(interview.id).await {
                Ok(Some(refreshed)) => refreshed,
                _ => interview,
            });
        }

        Ok(interview)
    }

    pub async fn reschedule_interview(
        &self,
        actor: &ActorContext,
        id: Uuid,
        payload: RescheduleInterviewPayload,
    ) -> Result<Interview> {
        self.interviews.update(actor, id, payload).await
    }

    pub async fn cancel_interview(&self, actor: &ActorContext, id: Uuid) -> Result<Interview> {
        self.interviews
            .set_status(actor, id, InterviewStatus::Cancelled)
            .await
    }

    pub async fn set_interview_status(
        &self,
        actor: &ActorContext,
        id: Uuid,
        status: InterviewStatus,
    ) -> Result<Interview> {
        self.interviews.set_status(actor, id, status).await
    }

    pub async fn attach_feedback(
        &self,
        actor: &ActorContext,
        id: Uuid,
        payload: InterviewFeedbackPayload,
    ) -> Result<Interview> {
        self.interviews.attach_feedback(actor, id, payload).await
    }

    /// Permanently removes an interview. The route owning this call is
    /// expected to have confirmed the destructive intent with the end user.
    pub async fn delete_interview(&self, actor: &ActorContext, id: Uuid) -> Result<()> {
        self.interviews.delete(actor, id).await
    }

    pub async fn get_interview(&self, actor: &ActorContext, id: Uuid) -> Result<Interview> {
        self.interviews.get(actor, id).await
    }

    /// Employer-facing listing, always scoped to the actor's company.
    pub async fn list_interviews(
        &self,
        actor: &ActorContext,
        query: InterviewListQuery,
    ) -> Result<Vec<Interview>> {
        let statuses = query
            .status
            .as_deref()
            .map(parse_status_filter)
            .transpose()?;
        let filter = InterviewFilter {
            application_id: query.application_id,
            seeker_id: query.seeker_id,
            job_id: query.job_id,
            statuses,
            scheduled_from: query.scheduled_from,
            scheduled_to: query.scheduled_to,
            company_id: Some(actor.company_id),
        };
        self.store.find_interviews(&filter).await
    }

    /// Moves a candidate to a pipeline status, creating the application when
    /// the contact started with a direct interview.
    pub async fn advance_status(
        &self,
        actor: &ActorContext,
        job_id: Uuid,
        seeker_id: Uuid,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application> {
        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        if job.company_id != actor.company_id {
            return Err(Error::Ownership(
                "This job belongs to another company".to_string(),
            ));
        }

        self.sync
            .manage_application_status(job_id, seeker_id, status, notes)
            .await
    }

    pub async fn progression(&self, key: &InterviewKey) -> Result<Progression> {
        self.progression.progression(key).await
    }

    pub async fn can_schedule_next(&self, key: &InterviewKey) -> Result<NextRoundCheck> {
        self.progression.can_schedule_next(key).await
    }
}

/// Parses a comma-separated status set; an unknown status fails the whole
/// request rather than silently narrowing the filter.
fn parse_status_filter(raw: &str) -> Result<Vec<InterviewStatus>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}
