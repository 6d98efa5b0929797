use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::interview_dto::InterviewResponse;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::InterviewStage;
use crate::services::progression_service::Progression;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdvanceStatusPayload {
    pub job_id: Uuid,
    pub seeker_id: Uuid,
    pub status: ApplicationStatus,
    #[validate(length(min = 1))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub seeker_id: Uuid,
    pub status: ApplicationStatus,
    pub employer_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(application: Application) -> Self {
        Self {
            id: application.id,
            job_id: application.job_id,
            seeker_id: application.seeker_id,
            status: application.status,
            employer_notes: application.employer_notes,
            submitted_at: application.submitted_at,
            updated_at: application.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressionQuery {
    pub application_id: Option<Uuid>,
    pub seeker_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressionResponse {
    pub interviews: Vec<InterviewResponse>,
    pub completed_interviews: Vec<InterviewResponse>,
    pub scheduled_interviews: Vec<InterviewResponse>,
    pub current_stage: usize,
    pub can_proceed: bool,
    pub next_stage: Option<InterviewStage>,
}

impl From<Progression> for ProgressionResponse {
    fn from(progression: Progression) -> Self {
        Self {
            current_stage: progression.current_stage,
            can_proceed: progression.can_proceed,
            next_stage: progression.next_stage,
            completed_interviews: progression
                .completed_interviews
                .into_iter()
                .map(Into::into)
                .collect(),
            scheduled_interviews: progression
                .scheduled_interviews
                .into_iter()
                .map(Into::into)
                .collect(),
            interviews: progression.interviews.into_iter().map(Into::into).collect(),
        }
    }
}
