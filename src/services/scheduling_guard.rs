use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::interview::InterviewKey;
use crate::store::{InterviewFilter, RecordStore};
use crate::utils::time::format_schedule;

/// Read-only pre-check that blocks a second live interview for the same
/// candidate/job key. The storage layer's partial unique index remains the
/// authoritative enforcement; this check exists to give the employer a
/// message naming the conflicting round before anything is written.
#[derive(Clone)]
pub struct SchedulingGuard {
    store: Arc<dyn RecordStore>,
}

impl SchedulingGuard {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn validate(&self, key: &InterviewKey) -> Result<()> {
        let live = self
            .store
            .find_interviews(&InterviewFilter::for_key(key).live())
            .await?;

        if let Some(existing) = live.first() {
            return Err(Error::SchedulingConflict(format!(
                "A {} interview is already {} for {}; resolve it before booking another round",
                existing.stage,
                existing.status,
                format_schedule(&existing.scheduled_at)
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use crate::models::interview::{
        Interview, InterviewFormat, InterviewStage, InterviewStatus,
    };
    use crate::store::MockRecordStore;
    use chrono::Utc;
    use uuid::Uuid;

    fn interview(status: InterviewStatus) -> Interview {
        let now = Utc::now();
        Interview {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            interviewer_id: Uuid::new_v4(),
            application_id: Some(Uuid::new_v4()),
            seeker_id: Uuid::new_v4(),
            stage: InterviewStage::Technical,
            status,
            application_status: Some(ApplicationStatus::Interviewing),
            scheduled_at: now,
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

    #[tokio::test]
    async fn passes_when_no_live_interview_exists() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_interviews()
            .returning(|_| Ok(Vec::new()));

        let guard = SchedulingGuard::new(Arc::new(store));
        let key = InterviewKey::Application(Uuid::new_v4());
        assert!(guard.validate(&key).await.is_ok());
    }

    #[tokio::test]
    async fn conflict_names_the_blocking_round() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_interviews()
            .returning(|_| Ok(vec![interview(InterviewStatus::Scheduled)]));

        let guard = SchedulingGuard::new(Arc::new(store));
        let key = InterviewKey::Application(Uuid::new_v4());
        match guard.validate(&key).await {
            Err(Error::SchedulingConflict(msg)) => {
                assert!(msg.contains("technical"));
                assert!(msg.contains("scheduled"));
            }
            other => panic!("expected SchedulingConflict, got {:?}", other),
        }
    }
}
