use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;

/// One scheduled meeting between a candidate and a job's hiring team.
///
/// `seeker_id` and `job_id` are always populated, even when the interview was
/// created from an application: the application is resolved at creation time
/// so that status synchronization can key on the (job, seeker) pair alone.
/// `application_status` is a denormalized mirror of the owning application's
/// status, kept so lists render without a join.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
}

impl InterviewStatus {
    /// A live interview has not been resolved yet and blocks further
    /// scheduling for its key.
    pub fn is_live(&self) -> bool {
        matches!(self, InterviewStatus::Scheduled | InterviewStatus::InProgress)
    }

    pub fn live_set() -> Vec<InterviewStatus> {
        vec![InterviewStatus::Scheduled, InterviewStatus::InProgress]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
            InterviewStatus::Rescheduled => "rescheduled",
        }
    }
}

impl std::fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InterviewStatus {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "scheduled" => Ok(InterviewStatus::Scheduled),
            "in_progress" => Ok(InterviewStatus::InProgress),
            "completed" => Ok(InterviewStatus::Completed),
            "cancelled" => Ok(InterviewStatus::Cancelled),
            "rescheduled" => Ok(InterviewStatus::Rescheduled),
            other => Err(Error::InvalidStatus(format!(
                "Unknown interview status `{}`",
                other
            ))),
        }
    }
}

/// Interview rounds in pipeline order. Progression is stage-counted rather
/// than type-validated: an employer may book a `final` round first, and the
/// tracker only reports how many rounds have completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterviewStage {
    FirstRound,
    Technical,
    Hr,
    Final,
}

pub const STAGE_ORDER: [InterviewStage; 4] = [
    InterviewStage::FirstRound,
    InterviewStage::Technical,
    InterviewStage::Hr,
    InterviewStage::Final,
];

impl InterviewStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStage::FirstRound => "first_round",
            InterviewStage::Technical => "technical",
            InterviewStage::Hr => "hr",
            InterviewStage::Final => "final",
        }
    }
}

impl std::fmt::Display for InterviewStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_format", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterviewFormat {
    Phone,
    Video,
    InPerson,
}

/// The candidate/job relationship an interview belongs to: either an
/// application, or a direct (seeker, job) pair when the employer reached out
/// without a prior application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewKey {
    Application(Uuid),
    Direct { seeker_id: Uuid, job_id: Uuid },
}

impl InterviewKey {
    /// Builds a key from the optional identifiers a caller supplied. An
    /// incomplete key is a caller programming error, not a business conflict.
    pub fn from_parts(
        application_id: Option<Uuid>,
        seeker_id: Option<Uuid>,
        job_id: Option<Uuid>,
    ) -> Result<Self> {
        match (application_id, seeker_id, job_id) {
            (Some(app_id), _, _) => Ok(InterviewKey::Application(app_id)),
            (None, Some(seeker_id), Some(job_id)) => {
                Ok(InterviewKey::Direct { seeker_id, job_id })
            }
            _ => Err(Error::BadRequest(
                "An application id, or both a seeker id and a job id, is required".to_string(),
            )),
        }
    }
}
