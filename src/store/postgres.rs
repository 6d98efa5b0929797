use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::job::Job;
use crate::store::{InterviewFilter, RecordStore};

const INTERVIEW_COLUMNS: &str = "i.id, i.job_id, i.interviewer_id, i.application_id, i.seeker_id, \
     i.stage, i.status, i.application_status, i.scheduled_at, i.duration_minutes, i.format, \
     i.location, i.meeting_link, i.agenda, i.feedback, i.rating, i.created_at, i.updated_at";

/// Postgres-backed record store. Each call is a single suspendable request
/// run under a fixed timeout; an elapsed timeout surfaces as
/// `Error::Timeout` rather than being retried.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgRecordStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn run<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = sqlx::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(Error::from),
            Err(_) => Err(Error::Timeout(format!(
                "Store request `{}` exceeded {}s",
                what,
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn find_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>> {
        let statuses: Option<Vec<String>> = filter
            .statuses
            .as_ref()
            .map(|set| set.iter().map(|s| s.as_str().to_string()).collect());

        let sql = format!(
            r#"
            SELECT {INTERVIEW_COLUMNS}
            FROM interviews i
            JOIN jobs j ON j.id = i.job_id
            WHERE ($1::uuid IS NULL OR i.application_id = $1)
              AND ($2::uuid IS NULL OR i.seeker_id = $2)
              AND ($3::uuid IS NULL OR i.job_id = $3)
              AND ($4::text[] IS NULL OR i.status::text = ANY($4))
              AND ($5::timestamptz IS NULL OR i.scheduled_at >= $5)
              AND ($6::timestamptz IS NULL OR i.scheduled_at <= $6)
              AND ($7::uuid IS NULL OR j.company_id = $7)
            ORDER BY i.scheduled_at ASC
            "#
        );

        let query = sqlx::query_as::<_, Interview>(&sql)
            .bind(filter.application_id)
            .bind(filter.seeker_id)
            .bind(filter.job_id)
            .bind(statuses)
            .bind(filter.scheduled_from)
            .bind(filter.scheduled_to)
            .bind(filter.company_id);

        self.run("find_interviews", query.fetch_all(&self.pool))
            .await
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let sql = format!("SELECT {INTERVIEW_COLUMNS} FROM interviews i WHERE i.id = $1");
        let query = sqlx::query_as::<_, Interview>(&sql).bind(id);
        self.run("get_interview", query.fetch_optional(&self.pool))
            .await
    }

    async fn upsert_interview(&self, interview: &Interview) -> Result<Interview> {
        let sql = format!(
            r#"
            INSERT INTO interviews AS i (
                id, job_id, interviewer_id, application_id, seeker_id,
                stage, status, application_status, scheduled_at, duration_minutes,
                format, location, meeting_link, agenda, feedback, rating,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18
            )
            ON CONFLICT (id) DO UPDATE SET
                stage = EXCLUDED.stage,
                status = EXCLUDED.status,
                application_status = EXCLUDED.application_status,
                scheduled_at = EXCLUDED.scheduled_at,
                duration_minutes = EXCLUDED.duration_minutes,
                format = EXCLUDED.format,
                location = EXCLUDED.location,
                meeting_link = EXCLUDED.meeting_link,
                agenda = EXCLUDED.agenda,
                feedback = EXCLUDED.feedback,
                rating = EXCLUDED.rating,
                updated_at = EXCLUDED.updated_at
            RETURNING {INTERVIEW_COLUMNS}
            "#
        );

        let query = sqlx::query_as::<_, Interview>(&sql)
            .bind(interview.id)
            .bind(interview.job_id)
            .bind(interview.interviewer_id)
            .bind(interview.application_id)
            .bind(interview.seeker_id)
            .bind(interview.stage)
            .bind(interview.status)
            .bind(interview.application_status)
            .bind(interview.scheduled_at)
            .bind(interview.duration_minutes)
            .bind(interview.format)
            .bind(interview.location.clone())
            .bind(interview.meeting_link.clone())
            .bind(interview.agenda.clone())
            .bind(interview.feedback.clone())
            .bind(interview.rating)
            .bind(interview.created_at)
            .bind(interview.updated_at);

        self.run("upsert_interview", query.fetch_one(&self.pool))
            .await
    }

    async fn delete_interview(&self, id: Uuid) -> Result<()> {
        let query = sqlx::query("DELETE FROM interviews WHERE id = $1").bind(id);
        let result = self
            .run("delete_interview", query.execute(&self.pool))
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Interview not found".to_string()));
        }
        Ok(())
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let query = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, job_id, seeker_id, status, employer_notes, submitted_at, updated_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(id);
        self.run("get_application", query.fetch_optional(&self.pool))
            .await
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        seeker_id: Uuid,
    ) -> Result<Option<Application>> {
        let query = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, job_id, seeker_id, status, employer_notes, submitted_at, updated_at
            FROM applications
            WHERE job_id = $1 AND seeker_id = $2
            "#,
        )
        .bind(job_id)
        .bind(seeker_id);
        self.run("find_application", query.fetch_optional(&self.pool))
            .await
    }

    async fn upsert_application(&self, application: &Application) -> Result<Application> {
        let query = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (
                id, job_id, seeker_id, status, employer_notes, submitted_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                employer_notes = EXCLUDED.employer_notes,
                updated_at = EXCLUDED.updated_at
            RETURNING id, job_id, seeker_id, status, employer_notes, submitted_at, updated_at
            "#,
        )
        .bind(application.id)
        .bind(application.job_id)
        .bind(application.seeker_id)
        .bind(application.status)
        .bind(application.employer_notes.clone())
        .bind(application.submitted_at)
        .bind(application.updated_at);

        self.run("upsert_application", query.fetch_one(&self.pool))
            .await
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        let query = sqlx::query_as::<_, Job>(
            "SELECT id, company_id, title, created_at, updated_at FROM jobs WHERE id = $1",
        )
        .bind(id);
        self.run("get_job", query.fetch_optional(&self.pool)).await
    }
}
