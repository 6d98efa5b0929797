use std::sync::Arc;

use crate::error::Result;
use crate::models::interview::{Interview, InterviewKey, InterviewStage, InterviewStatus, STAGE_ORDER};
use crate::store::{InterviewFilter, RecordStore};
use crate::utils::time::format_schedule;

/// Computes how far a candidate has advanced through the round sequence and
/// whether the next round may be booked. Pure reads, no persistence effects.
#[derive(Clone)]
pub struct ProgressionService {
    store: Arc<dyn RecordStore>,
}

/// Result of the next-round gate check.
#[derive(Debug, Clone)]
pub struct NextRoundCheck {
    pub allowed: bool,
    pub reason: Option<String>,
    pub active_interview: Option<Interview>,
}

/// Full progression view for a candidate/job key, used for display.
#[derive(Debug, Clone)]
pub struct Progression {
    pub interviews: Vec<Interview>,
    pub completed_interviews: Vec<Interview>,
    pub scheduled_interviews: Vec<Interview>,
    /// Count of completed interviews; index into the stage order.
    pub current_stage: usize,
    pub can_proceed: bool,
    pub next_stage: Option<InterviewStage>,
}

impl ProgressionService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Blocks a new round while any live interview exists for the key. The
    /// reason names the blocking round so the employer knows what to resolve
    /// first. Redundant with `SchedulingGuard` by design; this is the gate
    /// the lifecycle consults after the conflict pre-check.
    pub async fn can_schedule_next(&self, key: &InterviewKey) -> Result<NextRoundCheck> {
        let live = self
            .store
            .find_interviews(&InterviewFilter::for_key(key).live())
            .await?;

        match live.into_iter().next() {
            Some(active) => Ok(NextRoundCheck {
                allowed: false,
                reason: Some(format!(
                    "The {} interview {} for {} must be completed or cancelled first",
                    active.stage,
                    active.status,
                    format_schedule(&active.scheduled_at)
                )),
                active_interview: Some(active),
            }),
            None => Ok(NextRoundCheck {
                allowed: true,
                reason: None,
                active_interview: None,
            }),
        }
    }

    /// Progression is stage-counted, not type-validated: the current stage is
    /// the number of completed interviews, regardless of which round types
    /// they were. Out-of-order round types are deliberately permitted.
    pub async fn progression(&self, key: &InterviewKey) -> Result<Progression> {
        let interviews = self
            .store
            .find_interviews(&InterviewFilter::for_key(key))
            .await?;

        let completed_interviews: Vec<Interview> = interviews
            .iter()
            .filter(|i| i.status == InterviewStatus::Completed)
            .cloned()
            .collect();
        let scheduled_interviews: Vec<Interview> = interviews
            .iter()
            .filter(|i| i.status == InterviewStatus::Scheduled)
            .cloned()
            .collect();

        let current_stage = completed_interviews.len();
        // The next stage to book: rounds already completed plus rounds booked
        // but not yet resolved. With nothing in flight this is simply the
        // stage at the completed count.
        let next_index = current_stage + scheduled_interviews.len();

        Ok(Progression {
            current_stage,
            can_proceed: scheduled_interviews.is_empty(),
            next_stage: STAGE_ORDER.get(next_index).copied(),
            completed_interviews,
            scheduled_interviews,
            interviews,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use crate::models::interview::InterviewFormat;
    use crate::store::MemoryStore;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn interview(
        job_id: Uuid,
        seeker_id: Uuid,
        stage: InterviewStage,
        status: InterviewStatus,
        offset_days: i64,
    ) -> Interview {
        let now = Utc::now();
        Interview {
            id: Uuid::new_v4(),
            job_id,
            interviewer_id: Uuid::new_v4(),
            application_id: None,
            seeker_id,
            stage,
            status,
            application_status: Some(ApplicationStatus::Interviewing),
            scheduled_at: now + Duration::days(offset_days),
            duration_minutes: 60,
            format: InterviewFormat::Video,
            location: None,
            meeting_link: None,
            agenda: None,
            feedback: None,
            rating: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn job(id: Uuid) -> crate::models::job::Job {
        let now = Utc::now();
        crate::models::job::Job {
            id,
            company_id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn stage_counting_ignores_round_type_order() {
        let store = Arc::new(MemoryStore::new());
        let job_id = Uuid::new_v4();
        let seeker_id = Uuid::new_v4();
        store.seed_job(job(job_id));

        // A final round completed before any first_round ever happened still
        // counts as exactly one completed stage.
        store
            .upsert_interview(&interview(
                job_id,
                seeker_id,
                InterviewStage::Final,
                InterviewStatus::Completed,
                -7,
            ))
            .await
            .unwrap();

        let tracker = ProgressionService::new(store);
        let key = InterviewKey::Direct { seeker_id, job_id };
        let progression = tracker.progression(&key).await.unwrap();

        assert_eq!(progression.current_stage, 1);
        assert_eq!(progression.next_stage, Some(InterviewStage::Technical));
        assert!(progression.can_proceed);
    }

    #[tokio::test]
    async fn pipeline_exhausts_after_four_completed_rounds() {
        let store = Arc::new(MemoryStore::new());
        let job_id = Uuid::new_v4();
        let seeker_id = Uuid::new_v4();
        store.seed_job(job(job_id));

        for (offset, stage) in STAGE_ORDER.iter().enumerate() {
            store
                .upsert_interview(&interview(
                    job_id,
                    seeker_id,
                    *stage,
                    InterviewStatus::Completed,
                    offset as i64,
                ))
                .await
                .unwrap();
        }

        let tracker = ProgressionService::new(store);
        let key = InterviewKey::Direct { seeker_id, job_id };
        let progression = tracker.progression(&key).await.unwrap();

        assert_eq!(progression.current_stage, 4);
        assert_eq!(progression.next_stage, None);
    }

    #[tokio::test]
    async fn live_interview_blocks_the_next_round() {
        let store = Arc::new(MemoryStore::new());
        let job_id = Uuid::new_v4();
        let seeker_id = Uuid::new_v4();
        store.seed_job(job(job_id));
        store
            .upsert_interview(&interview(
                job_id,
                seeker_id,
                InterviewStage::FirstRound,
                InterviewStatus::Scheduled,
                3,
            ))
            .await
            .unwrap();

        let tracker = ProgressionService::new(store);
        let key = InterviewKey::Direct { seeker_id, job_id };
        let check = tracker.can_schedule_next(&key).await.unwrap();

        assert!(!check.allowed);
        assert!(check.reason.unwrap().contains("first_round"));
        assert!(check.active_interview.is_some());
    }
}
