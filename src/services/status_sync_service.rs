use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::InterviewStatus;
use crate::store::{InterviewFilter, RecordStore};
use crate::utils::time::now;

/// Keeps `Application.status` and the denormalized
/// `Interview.application_status` consistent without a cross-entity
/// transaction. Propagation is best-effort: a partial failure must never
/// fail the application write that triggered it, so per-interview errors
/// are logged and swallowed.
#[derive(Clone)]
pub struct StatusSyncService {
    store: Arc<dyn RecordStore>,
}

impl StatusSyncService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Mirrors `new_status` into every interview for the (job, seeker) pair
    /// and applies the status cascade: a rejected or withdrawn application
    /// cancels its live interviews. Completed interviews are never
    /// retroactively overwritten. Idempotent: replaying the same status
    /// yields the same final state.
    pub async fn on_application_status_changed(
        &self,
        job_id: Uuid,
        seeker_id: Uuid,
        new_status: ApplicationStatus,
    ) {
        let interviews = match self
            .store
            .find_interviews(&InterviewFilter::for_pair(job_id, seeker_id))
            .await
        {
            Ok(interviews) => interviews,
            Err(error) => {
                warn!(
                    %job_id,
                    %seeker_id,
                    status = %new_status,
                    %error,
                    "status sync: interview lookup failed"
                );
                return;
            }
        };

        for mut interview in interviews {
            interview.application_status = Some(new_status);

            // Exhaustive on purpose: a new application status must force a
            // review of this cascade table.
            match new_status {
                ApplicationStatus::Rejected | ApplicationStatus::Withdrawn => {
                    if interview.status.is_live() {
                        interview.status = InterviewStatus::Cancelled;
                    }
                }
                ApplicationStatus::New
                | ApplicationStatus::Interviewing
                | ApplicationStatus::Offered
                | ApplicationStatus::Hired => {}
            }

            interview.updated_at = now();
            if let Err(error) = self.store.upsert_interview(&interview).await {
                warn!(
                    interview_id = %interview.id,
                    status = %new_status,
                    %error,
                    "status sync: failed to mirror application status"
                );
            }
        }
    }

    /// Updates the application for (job, seeker), creating one when none
    /// exists — the direct-interview case, where an employer retroactively
    /// opens a pipeline entry for an ad-hoc interview. The interview mirror
    /// runs unconditionally afterwards.
    pub async fn manage_application_status(
        &self,
        job_id: Uuid,
        seeker_id: Uuid,
        new_status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application> {
        let timestamp = now();

        let application = match self.store.find_application(job_id, seeker_id).await? {
            Some(mut existing) => {
                existing.status = new_status;
                if notes.is_some() {
                    existing.employer_notes = notes;
                }
                existing.updated_at = timestamp;
                self.store.upsert_application(&existing).await?
            }
            None => {
                let created = Application {
                    id: Uuid::new_v4(),
                    job_id,
                    seeker_id,
                    status: new_status,
                    employer_notes: notes,
                    submitted_at: timestamp,
                    updated_at: timestamp,
                };
                self.store.upsert_application(&created).await?
            }
        };

        self.on_application_status_changed(job_id, seeker_id, new_status)
            .await;

        Ok(application)
    }
}
