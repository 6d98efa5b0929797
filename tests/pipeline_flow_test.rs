use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use talentbridge_backend::{
    dto::interview_dto::{
        InterviewFeedbackPayload, InterviewListQuery, RescheduleInterviewPayload,
        ScheduleInterviewPayload,
    },
    error::Error,
    middleware::auth::ActorContext,
    models::{
        application::{Application, ApplicationStatus},
        interview::{Interview, InterviewFormat, InterviewKey, InterviewStage, InterviewStatus},
        job::Job,
    },
    services::status_sync_service::StatusSyncService,
    store::{InterviewFilter, MemoryStore, RecordStore},
    AppState,
};

fn make_job(company_id: Uuid) -> Job {
    let now = Utc::now();
    Job {
        id: Uuid::new_v4(),
        company_id,
        title: "Senior Backend Engineer".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn make_application(job_id: Uuid, seeker_id: Uuid) -> Application {
    let now = Utc::now();
    Application {
        id: Uuid::new_v4(),
        job_id,
        seeker_id,
        status: ApplicationStatus::New,
        employer_notes: None,
        submitted_at: now,
        updated_at: now,
    }
}

fn schedule_payload(
    application_id: Option<Uuid>,
    seeker_id: Option<Uuid>,
    job_id: Option<Uuid>,
    stage: InterviewStage,
    offset_days: i64,
) -> ScheduleInterviewPayload {
    ScheduleInterviewPayload {
        application_id,
        seeker_id,
        job_id,
        stage,
        scheduled_at: Utc::now() + Duration::days(offset_days),
        duration_minutes: Some(60),
        format: InterviewFormat::Video,
        location: None,
        meeting_link: Some("https://meet.example.com/abc".to_string()),
        agenda: None,
    }
}

fn setup() -> (AppState, Arc<MemoryStore>, ActorContext, Job, Application) {
    let store = Arc::new(MemoryStore::new());
    let actor = ActorContext {
        user_id: Uuid::new_v4(),
        company_id: Uuid::new_v4(),
    };
    let job = make_job(actor.company_id);
    let seeker_id = Uuid::new_v4();
    let application = make_application(job.id, seeker_id);
    store.seed_job(job.clone());
    store.seed_application(application.clone());
    let state = AppState::with_store(store.clone());
    (state, store, actor, job, application)
}

#[tokio::test]
async fn conflict_rejection_leaves_store_unchanged() {
    let (state, store, actor, job, application) = setup();

    let first = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::FirstRound,
                1,
            ),
        )
        .await
        .expect("first interview should be scheduled");
    assert_eq!(first.status, InterviewStatus::Scheduled);

    let result = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::Technical,
                8,
            ),
        )
        .await;

    match result {
        Err(Error::SchedulingConflict(msg)) => assert!(msg.contains("first_round")),
        other => panic!("expected SchedulingConflict, got {:?}", other),
    }

    let stored = store
        .find_interviews(&InterviewFilter::for_pair(job.id, application.seeker_id))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1, "no new row may be written on conflict");
}

#[tokio::test]
async fn live_uniqueness_is_enforced_by_the_store_itself() {
    let (_, store, actor, job, application) = setup();
    let now = Utc::now();

    let template = Interview {
        id: Uuid::new_v4(),
        job_id: job.id,
        interviewer_id: actor.user_id,
        application_id: Some(application.id),
        seeker_id: application.seeker_id,
        stage: InterviewStage::FirstRound,
        status: InterviewStatus::Scheduled,
        application_status: Some(ApplicationStatus::New),
        scheduled_at: now + Duration::days(1),
        duration_minutes: 60,
        format: InterviewFormat::Phone,
        location: None,
        meeting_link: None,
        agenda: None,
        feedback: None,
        rating: None,
        created_at: now,
        updated_at: now,
    };

    store.upsert_interview(&template).await.unwrap();

    // Bypassing the guard entirely still cannot produce a second live row.
    let duplicate = Interview {
        id: Uuid::new_v4(),
        stage: InterviewStage::Technical,
        scheduled_at: now + Duration::days(2),
        ..template
    };
    match store.upsert_interview(&duplicate).await {
        Err(Error::SchedulingConflict(_)) => {}
        other => panic!("expected SchedulingConflict from the store, got {:?}", other),
    }
}

#[tokio::test]
async fn scheduling_moves_a_new_application_to_interviewing() {
    let (state, store, actor, job, application) = setup();

    let interview = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::FirstRound,
                2,
            ),
        )
        .await
        .unwrap();

    let refreshed = store
        .find_application(job.id, application.seeker_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.status, ApplicationStatus::Interviewing);
    assert_eq!(
        interview.application_status,
        Some(ApplicationStatus::Interviewing)
    );
}

#[tokio::test]
async fn rejection_cascades_to_live_interviews_only() {
    let (state, store, actor, job, application) = setup();
    let now = Utc::now();

    // A round that already completed last week.
    let completed = Interview {
        id: Uuid::new_v4(),
        job_id: job.id,
        interviewer_id: actor.user_id,
        application_id: Some(application.id),
        seeker_id: application.seeker_id,
        stage: InterviewStage::FirstRound,
        status: InterviewStatus::Completed,
        application_status: Some(ApplicationStatus::Interviewing),
        scheduled_at: now - Duration::days(7),
        duration_minutes: 60,
        format: InterviewFormat::Video,
        location: None,
        meeting_link: None,
        agenda: None,
        feedback: Some("Strong communication".to_string()),
        rating: Some(4),
        created_at: now - Duration::days(10),
        updated_at: now - Duration::days(7),
    };
    store.upsert_interview(&completed).await.unwrap();

    let live = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::Technical,
                3,
            ),
        )
        .await
        .unwrap();

    let rejected = state
        .pipeline_service
        .advance_status(
            &actor,
            job.id,
            application.seeker_id,
            ApplicationStatus::Rejected,
            Some("Position filled".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(rejected.status, ApplicationStatus::Rejected);

    let cancelled = store.get_interview(live.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, InterviewStatus::Cancelled);
    assert_eq!(
        cancelled.application_status,
        Some(ApplicationStatus::Rejected)
    );

    let untouched = store.get_interview(completed.id).await.unwrap().unwrap();
    assert_eq!(
        untouched.status,
        InterviewStatus::Completed,
        "a completed interview is never retroactively cancelled"
    );
    assert_eq!(
        untouched.application_status,
        Some(ApplicationStatus::Rejected),
        "the mirror field still follows the application"
    );
}

#[tokio::test]
async fn status_mirroring_is_idempotent() {
    let (state, store, actor, _, application) = setup();

    let interview = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::FirstRound,
                1,
            ),
        )
        .await
        .unwrap();

    let sync = StatusSyncService::new(store.clone());
    sync.on_application_status_changed(
        application.job_id,
        application.seeker_id,
        ApplicationStatus::Offered,
    )
    .await;
    let after_first = store.get_interview(interview.id).await.unwrap().unwrap();

    sync.on_application_status_changed(
        application.job_id,
        application.seeker_id,
        ApplicationStatus::Offered,
    )
    .await;
    let after_second = store.get_interview(interview.id).await.unwrap().unwrap();

    assert_eq!(
        after_first.application_status,
        Some(ApplicationStatus::Offered)
    );
    assert_eq!(after_first.application_status, after_second.application_status);
    assert_eq!(after_first.status, after_second.status);
}

#[tokio::test]
async fn ownership_is_enforced_per_operation() {
    let (state, store, actor, _, application) = setup();

    let interview = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::FirstRound,
                1,
            ),
        )
        .await
        .unwrap();

    // Same company, different user: may record an outcome but not reschedule
    // or delete someone else's calendar slot.
    let colleague = ActorContext {
        user_id: Uuid::new_v4(),
        company_id: actor.company_id,
    };
    let patch = RescheduleInterviewPayload {
        scheduled_at: Some(Utc::now() + Duration::days(5)),
        duration_minutes: None,
        format: None,
        location: None,
        meeting_link: None,
        agenda: None,
    };
    match state
        .pipeline_service
        .reschedule_interview(&colleague, interview.id, patch)
        .await
    {
        Err(Error::Ownership(_)) => {}
        other => panic!("expected Ownership error, got {:?}", other),
    }
    match state
        .pipeline_service
        .delete_interview(&colleague, interview.id)
        .await
    {
        Err(Error::Ownership(_)) => {}
        other => panic!("expected Ownership error, got {:?}", other),
    }
    state
        .pipeline_service
        .set_interview_status(&colleague, interview.id, InterviewStatus::Completed)
        .await
        .expect("status-only changes are open to the whole company");

    // Different company: nothing is allowed.
    let outsider = ActorContext {
        user_id: Uuid::new_v4(),
        company_id: Uuid::new_v4(),
    };
    match state
        .pipeline_service
        .set_interview_status(&outsider, interview.id, InterviewStatus::Cancelled)
        .await
    {
        Err(Error::Ownership(_)) => {}
        other => panic!("expected Ownership error, got {:?}", other),
    }

    let stored = store.get_interview(interview.id).await.unwrap().unwrap();
    assert_eq!(stored.status, InterviewStatus::Completed);
    assert_eq!(stored.scheduled_at, interview.scheduled_at);
}

#[tokio::test]
async fn end_to_end_round_sequencing() {
    let (state, _, actor, _, application) = setup();

    let first = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::FirstRound,
                1,
            ),
        )
        .await
        .expect("first_round should be scheduled");

    match state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::Technical,
                8,
            ),
        )
        .await
    {
        Err(Error::SchedulingConflict(msg)) => assert!(msg.contains("first_round")),
        other => panic!("expected SchedulingConflict, got {:?}", other),
    }

    state
        .pipeline_service
        .set_interview_status(&actor, first.id, InterviewStatus::Completed)
        .await
        .unwrap();

    let second = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::Technical,
                8,
            ),
        )
        .await
        .expect("technical round should be schedulable after completion");
    assert_eq!(second.status, InterviewStatus::Scheduled);

    let progression = state
        .pipeline_service
        .progression(&InterviewKey::Application(application.id))
        .await
        .unwrap();
    assert_eq!(progression.current_stage, 1);
    assert_eq!(progression.next_stage, Some(InterviewStage::Hr));
    assert!(!progression.can_proceed, "a scheduled round is in flight");
    assert_eq!(progression.interviews.len(), 2);
    assert_eq!(progression.completed_interviews.len(), 1);
    assert_eq!(progression.scheduled_interviews.len(), 1);
}

#[tokio::test]
async fn out_of_order_stages_are_permitted() {
    // Deliberate flexibility: an employer may open with a final round. The
    // tracker only blocks concurrent live interviews, never stage order.
    let (state, _, actor, job, _) = setup();
    let seeker_id = Uuid::new_v4();

    let interview = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                None,
                Some(seeker_id),
                Some(job.id),
                InterviewStage::Final,
                2,
            ),
        )
        .await
        .expect("stage order is not enforced");
    assert_eq!(interview.stage, InterviewStage::Final);
    assert_eq!(interview.application_id, None);
}

#[tokio::test]
async fn direct_key_resolves_an_existing_application() {
    let (state, store, actor, job, application) = setup();

    // The caller only knows the (seeker, job) pair, but the seeker already
    // applied. The interview must link to that application and trigger the
    // same new-to-interviewing bump as an application-keyed schedule.
    let interview = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                None,
                Some(application.seeker_id),
                Some(job.id),
                InterviewStage::FirstRound,
                1,
            ),
        )
        .await
        .unwrap();
    assert_eq!(interview.application_id, Some(application.id));
    assert_eq!(
        interview.application_status,
        Some(ApplicationStatus::Interviewing)
    );

    let refreshed = store
        .find_application(job.id, application.seeker_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.status, ApplicationStatus::Interviewing);
}

#[tokio::test]
async fn listing_filters_by_a_status_set() {
    let (state, _, actor, _, application) = setup();

    let first = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::FirstRound,
                1,
            ),
        )
        .await
        .unwrap();
    state
        .pipeline_service
        .set_interview_status(&actor, first.id, InterviewStatus::Completed)
        .await
        .unwrap();
    state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::Technical,
                5,
            ),
        )
        .await
        .unwrap();

    let query = |status: Option<&str>| InterviewListQuery {
        application_id: Some(application.id),
        seeker_id: None,
        job_id: None,
        status: status.map(str::to_string),
        scheduled_from: None,
        scheduled_to: None,
    };

    let completed = state
        .pipeline_service
        .list_interviews(&actor, query(Some("completed")))
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].status, InterviewStatus::Completed);

    let both = state
        .pipeline_service
        .list_interviews(&actor, query(Some("completed, scheduled")))
        .await
        .unwrap();
    assert_eq!(both.len(), 2);

    let all = state
        .pipeline_service
        .list_interviews(&actor, query(None))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    match state
        .pipeline_service
        .list_interviews(&actor, query(Some("archived")))
        .await
    {
        Err(Error::InvalidStatus(msg)) => assert!(msg.contains("archived")),
        other => panic!("expected InvalidStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn advance_status_backfills_a_direct_application() {
    let (state, store, actor, job, _) = setup();
    let seeker_id = Uuid::new_v4();

    state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                None,
                Some(seeker_id),
                Some(job.id),
                InterviewStage::FirstRound,
                1,
            ),
        )
        .await
        .unwrap();

    assert!(store
        .find_application(job.id, seeker_id)
        .await
        .unwrap()
        .is_none());

    let application = state
        .pipeline_service
        .advance_status(
            &actor,
            job.id,
            seeker_id,
            ApplicationStatus::Interviewing,
            Some("Sourced directly".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(application.job_id, job.id);
    assert_eq!(application.seeker_id, seeker_id);
    assert_eq!(application.status, ApplicationStatus::Interviewing);

    // The ad-hoc interview picked up the mirror during the sync step.
    let interviews = store
        .find_interviews(&InterviewFilter::for_pair(job.id, seeker_id))
        .await
        .unwrap();
    assert_eq!(
        interviews[0].application_status,
        Some(ApplicationStatus::Interviewing)
    );
}

#[tokio::test]
async fn caller_errors_are_rejected_up_front() {
    let (state, _, actor, job, application) = setup();

    // Incomplete key: neither application id nor a full (seeker, job) pair.
    match state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(None, None, Some(job.id), InterviewStage::FirstRound, 1),
        )
        .await
    {
        Err(Error::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got {:?}", other),
    }

    let interview = state
        .pipeline_service
        .schedule_interview(
            &actor,
            schedule_payload(
                Some(application.id),
                None,
                None,
                InterviewStage::FirstRound,
                1,
            ),
        )
        .await
        .unwrap();

    match state
        .pipeline_service
        .set_interview_status(&actor, interview.id, InterviewStatus::InProgress)
        .await
    {
        Err(Error::InvalidStatus(_)) => {}
        other => panic!("expected InvalidStatus, got {:?}", other),
    }

    let feedback = InterviewFeedbackPayload {
        feedback: "Solid fundamentals".to_string(),
        rating: Some(6),
    };
    match state
        .pipeline_service
        .attach_feedback(&actor, interview.id, feedback)
        .await
    {
        Err(Error::BadRequest(msg)) => assert!(msg.contains("1 and 5")),
        other => panic!("expected BadRequest, got {:?}", other),
    }

    let accepted = state
        .pipeline_service
        .attach_feedback(
            &actor,
            interview.id,
            InterviewFeedbackPayload {
                feedback: "Solid fundamentals".to_string(),
                rating: Some(4),
            },
        )
        .await
        .unwrap();
    assert_eq!(accepted.rating, Some(4));
}
