use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::ApplicationStatus;
use crate::models::interview::{Interview, InterviewFormat, InterviewStage, InterviewStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleInterviewPayload {
    pub application_id: Option<Uuid>,
    pub seeker_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub stage: InterviewStage,
    pub scheduled_at: DateTime<Utc>,
    #[validate(range(min = 15, max = 480))]
    pub duration_minutes: Option<i32>,
    pub format: InterviewFormat,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[validate(length(min = 1))]
    pub meeting_link: Option<String>,
    pub agenda: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RescheduleInterviewPayload {
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(range(min = 15, max = 480))]
    pub duration_minutes: Option<i32>,
    pub format: Option<InterviewFormat>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[validate(length(min = 1))]
    pub meeting_link: Option<String>,
    pub agenda: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetInterviewStatusPayload {
    pub status: InterviewStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InterviewFeedbackPayload {
    #[validate(length(min = 1))]
    pub feedback: String,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewListQuery {
    pub application_id: Option<Uuid>,
    pub seeker_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    /// Comma-separated set of interview statuses, e.g. `scheduled,completed`.
    pub status: Option<String>,
    pub scheduled_from: Option<DateTime<Utc>>,
    pub scheduled_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub interviewer_id: Uuid,
    pub application_id: Option<Uuid>,
    pub seeker_id: Uuid,
    pub stage: InterviewStage,
    pub status: InterviewStatus,
    pub application_status: Option<ApplicationStatus>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub format: InterviewFormat,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub agenda: Option<String>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interview> for InterviewResponse {
    fn from(interview: Interview) -> Self {
        Self {
            id: interview.id,
            job_id: interview.job_id,
            interviewer_id: interview.interviewer_id,
            application_id: interview.application_id,
            seeker_id: interview.seeker_id,
            stage: interview.stage,
            status: interview.status,
            application_status: interview.application_status,
            scheduled_at: interview.scheduled_at,
            duration_minutes: interview.duration_minutes,
            format: interview.format,
            location: interview.location,
            meeting_link: interview.meeting_link,
            agenda: interview.agenda,
            feedback: interview.feedback,
            rating: interview.rating,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewListResponse {
    pub items: Vec<InterviewResponse>,
}
