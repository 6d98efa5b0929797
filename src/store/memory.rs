use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::job::Job;
use crate::store::{InterviewFilter, RecordStore};

/// In-process record store used by the test suites. It mirrors the Postgres
/// schema constraints that matter to the pipeline: one application per
/// (job, seeker) pair and at most one live interview per key, so the
/// storage-level conflict path is exercised without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<Uuid, Job>,
    applications: HashMap<Uuid, Application>,
    interviews: HashMap<Uuid, Interview>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_job(&self, job: Job) {
        self.lock().jobs.insert(job.id, job);
    }

    pub fn seed_application(&self, application: Application) {
        self.lock()
            .applications
            .insert(application.id, application);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }
}

fn filter_matches(filter: &InterviewFilter, interview: &Interview, job: Option<&Job>) -> bool {
    if let Some(app_id) = filter.application_id {
        if interview.application_id != Some(app_id) {
            return false;
        }
    }
    if let Some(seeker_id) = filter.seeker_id {
        if interview.seeker_id != seeker_id {
            return false;
        }
    }
    if let Some(job_id) = filter.job_id {
        if interview.job_id != job_id {
            return false;
        }
    }
    if let Some(statuses) = &filter.statuses {
        if !statuses.contains(&interview.status) {
            return false;
        }
    }
    if let Some(from) = filter.scheduled_from {
        if interview.scheduled_at < from {
            return false;
        }
    }
    if let Some(to) = filter.scheduled_to {
        if interview.scheduled_at > to {
            return false;
        }
    }
    if let Some(company_id) = filter.company_id {
        match job {
            Some(job) if job.company_id == company_id => {}
            _ => return false,
        }
    }
    true
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>> {
        let inner = self.lock();
        let mut matched: Vec<Interview> = inner
            .interviews
            .values()
            .filter(|interview| {
                filter_matches(filter, interview, inner.jobs.get(&interview.job_id))
            })
            .cloned()
            .collect();
        matched.sort_by_key(|interview| interview.scheduled_at);
        Ok(matched)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        Ok(self.lock().interviews.get(&id).cloned())
    }

    async fn upsert_interview(&self, interview: &Interview) -> Result<Interview> {
        let mut inner = self.lock();
        if interview.status.is_live() {
            let clash = inner.interviews.values().any(|other| {
                other.id != interview.id
                    && other.status.is_live()
                    && other.job_id == interview.job_id
                    && other.seeker_id == interview.seeker_id
            });
            if clash {
                return Err(Error::SchedulingConflict(
                    "A live interview already exists for this candidate and job".to_string(),
                ));
            }
        }
        inner.interviews.insert(interview.id, interview.clone());
        Ok(interview.clone())
    }

    async fn delete_interview(&self, id: Uuid) -> Result<()> {
        if self.lock().interviews.remove(&id).is_none() {
            return Err(Error::NotFound("Interview not found".to_string()));
        }
        Ok(())
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.lock().applications.get(&id).cloned())
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        seeker_id: Uuid,
    ) -> Result<Option<Application>> {
        Ok(self
            .lock()
            .applications
            .values()
            .find(|app| app.job_id == job_id && app.seeker_id == seeker_id)
            .cloned())
    }

    async fn upsert_application(&self, application: &Application) -> Result<Application> {
        let mut inner = self.lock();
        let pair_taken = inner.applications.values().any(|other| {
            other.id != application.id
                && other.job_id == application.job_id
                && other.seeker_id == application.seeker_id
        });
        if pair_taken {
            return Err(Error::Internal(
                "An application already exists for this job and seeker".to_string(),
            ));
        }
        inner
            .applications
            .insert(application.id, application.clone());
        Ok(application.clone())
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.lock().jobs.get(&id).cloned())
    }
}
