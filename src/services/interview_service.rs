use std::sync::Arc;

use uuid::Uuid;

use crate::dto::interview_dto::{
    InterviewFeedbackPayload, RescheduleInterviewPayload, ScheduleInterviewPayload,
};
use crate::error::{Error, Result};
use crate::middleware::auth::ActorContext;
use crate::models::interview::{Interview, InterviewKey, InterviewStatus};
use crate::services::progression_service::ProgressionService;
use crate::services::scheduling_guard::SchedulingGuard;
use crate::store::RecordStore;
use crate::utils::time::now;

const DEFAULT_DURATION_MINUTES: i32 = 60;

/// Owns create/update/delete and status transitions for a single interview.
///
/// Mutation rights are scoped two ways: every operation requires the actor's
/// company to own the job, and update/delete additionally require the actor
/// to be the interviewer who created the record. Scheduling is a personal
/// calendar commitment, so changing or removing a slot is stricter than
/// recording its outcome.
#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn RecordStore>,
    guard: SchedulingGuard,
    progression: ProgressionService,
}

impl InterviewService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        guard: SchedulingGuard,
        progression: ProgressionService,
    ) -> Self {
        Self {
            store,
            guard,
            progression,
        }
    }

    pub async fn create(
        &self,
        actor: &ActorContext,
        payload: ScheduleInterviewPayload,
    ) -> Result<Interview> {
        let key =
            InterviewKey::from_parts(payload.application_id, payload.seeker_id, payload.job_id)?;

        let (application, job_id, seeker_id) = match key {
            InterviewKey::Application(app_id) => {
                let app = self
                    .store
                    .get_application(app_id)
                    .await?
                    .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
                if payload.job_id.is_some_and(|job_id| job_id != app.job_id) {
                    return Err(Error::BadRequest(
                        "The supplied job id does not match the application's job".to_string(),
                    ));
                }
                let (job_id, seeker_id) = (app.job_id, app.seeker_id);
                (Some(app), job_id, seeker_id)
            }
            InterviewKey::Direct { seeker_id, job_id } => {
                // The pair may already have applied; resolving the
                // application here keeps the interview linked and the status
                // mirror populated even when the caller only knew the pair.
                let app = self.store.find_application(job_id, seeker_id).await?;
                (app, job_id, seeker_id)
            }
        };

        self.assert_job_owned(actor, job_id).await?;
        self.guard.validate(&key).await?;

        let check = self.progression.can_schedule_next(&key).await?;
        if !check.allowed {
            return Err(Error::ProgressionBlocked(check.reason.unwrap_or_else(|| {
                "A live interview already exists for this candidate".to_string()
            })));
        }

        let timestamp = now();
        let interview = Interview {
            id: Uuid::new_v4(),
            job_id,
            interviewer_id: actor.user_id,
            application_id: application.as_ref().map(|app| app.id),
            seeker_id,
            stage: payload.stage,
            status: InterviewStatus::Scheduled,
            application_status: application.as_ref().map(|app| app.status),
            scheduled_at: payload.scheduled_at,
            duration_minutes: payload.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            format: payload.format,
            location: payload.location,
            meeting_link: payload.meeting_link,
            agenda: payload.agenda,
            feedback: None,
            rating: None,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.store.upsert_interview(&interview).await
    }

    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        payload: RescheduleInterviewPayload,
    ) -> Result<Interview> {
        let mut interview = self.load_owned(actor, id, true).await?;

        if let Some(scheduled_at) = payload.scheduled_at {
            interview.scheduled_at = scheduled_at;
        }
        if let Some(duration) = payload.duration_minutes {
            interview.duration_minutes = duration;
        }
        if let Some(format) = payload.format {
            interview.format = format;
        }
        if payload.location.is_some() {
            interview.location = payload.location;
        }
        if payload.meeting_link.is_some() {
            interview.meeting_link = payload.meeting_link;
        }
        if payload.agenda.is_some() {
            interview.agenda = payload.agenda;
        }
        interview.updated_at = now();

        self.store.upsert_interview(&interview).await
    }

    /// Permanently removes the interview. Callers must confirm with the end
    /// user before invoking; there is no soft delete.
    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<()> {
        self.load_owned(actor, id, true).await?;
        self.store.delete_interview(id).await
    }

    /// Status-only change, open to any team member in the owning company.
    /// `in_progress` is not settable through this operation.
    pub async fn set_status(
        &self,
        actor: &ActorContext,
        id: Uuid,
        status: InterviewStatus,
    ) -> Result<Interview> {
        if status == InterviewStatus::InProgress {
            return Err(Error::InvalidStatus(
                "Interview status must be one of scheduled, completed, cancelled, rescheduled"
                    .to_string(),
            ));
        }

        let mut interview = self.load_owned(actor, id, false).await?;
        interview.status = status;
        interview.updated_at = now();
        self.store.upsert_interview(&interview).await
    }

    pub async fn attach_feedback(
        &self,
        actor: &ActorContext,
        id: Uuid,
        payload: InterviewFeedbackPayload,
    ) -> Result<Interview> {
        if let Some(rating) = payload.rating {
            if !(1..=5).contains(&rating) {
                return Err(Error::BadRequest(
                    "Rating must be an integer between 1 and 5".to_string(),
                ));
            }
        }

        let mut interview = self.load_owned(actor, id, false).await?;
        interview.feedback = Some(payload.feedback);
        interview.rating = payload.rating;
        interview.updated_at = now();
        self.store.upsert_interview(&interview).await
    }

    /// Company-scoped read used by the facade.
    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<Interview> {
        self.load_owned(actor, id, false).await
    }

    async fn assert_job_owned(&self, actor: &ActorContext, job_id: Uuid) -> Result<()> {
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
        Ok(())
    }

    async fn load_owned(
        &self,
        actor: &ActorContext,
        id: Uuid,
        require_interviewer: bool,
    ) -> Result<Interview> {
        let interview = self
            .store
            .get_interview(id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;

        self.assert_job_owned(actor, interview.job_id).await?;

        if require_interviewer && interview.interviewer_id != actor.user_id {
            return Err(Error::Ownership(
                "Only the interviewer who scheduled this interview may change it".to_string(),
            ));
        }

        Ok(interview)
    }
}
