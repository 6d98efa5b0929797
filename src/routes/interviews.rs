use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interview_dto::{
        InterviewFeedbackPayload, InterviewListQuery, InterviewListResponse, InterviewResponse,
        RescheduleInterviewPayload, ScheduleInterviewPayload, SetInterviewStatusPayload,
    },
    error::Result,
    middleware::auth::ActorContext,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/employer/interviews",
    request_body = ScheduleInterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<InterviewResponse>),
        (status = 400, description = "Invalid payload or incomplete key"),
        (status = 409, description = "A live interview already exists for this candidate")
    )
)]
#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .pipeline_service
        .schedule_interview(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(InterviewResponse::from(interview))))
}

#[utoipa::path(
    get,
    path = "/api/employer/interviews",
    params(
        ("application_id" = Option<Uuid>, Query, description = "Filter by application"),
        ("seeker_id" = Option<Uuid>, Query, description = "Filter by candidate"),
        ("job_id" = Option<Uuid>, Query, description = "Filter by job"),
        ("status" = Option<String>, Query, description = "Comma-separated set of interview statuses"),
        ("scheduled_from" = Option<String>, Query, description = "Earliest scheduled datetime"),
        ("scheduled_to" = Option<String>, Query, description = "Latest scheduled datetime")
    ),
    responses(
        (status = 200, description = "Interviews for the caller's company", body = Json<InterviewListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Query(query): Query<InterviewListQuery>,
) -> Result<impl IntoResponse> {
    let interviews = state.pipeline_service.list_interviews(&actor, query).await?;
    Ok(Json(InterviewListResponse {
        items: interviews.into_iter().map(Into::into).collect(),
    }))
}

#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.pipeline_service.get_interview(&actor, id).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    patch,
    path = "/api/employer/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    request_body = RescheduleInterviewPayload,
    responses(
        (status = 200, description = "Interview rescheduled", body = Json<InterviewResponse>),
        (status = 403, description = "Not the owning company or original interviewer"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn reschedule_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .pipeline_service
        .reschedule_interview(&actor, id, payload)
        .await?;
    Ok(Json(InterviewResponse::from(interview)))
}

/// Permanent removal. The UI confirms with the user before calling this.
#[axum::debug_handler]
pub async fn delete_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.pipeline_service.delete_interview(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn set_interview_status(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetInterviewStatusPayload>,
) -> Result<impl IntoResponse> {
    let interview = state
        .pipeline_service
        .set_interview_status(&actor, id, payload.status)
        .await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[axum::debug_handler]
pub async fn cancel_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.pipeline_service.cancel_interview(&actor, id).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[axum::debug_handler]
pub async fn attach_feedback(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InterviewFeedbackPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .pipeline_service
        .attach_feedback(&actor, id, payload)
        .await?;
    Ok(Json(InterviewResponse::from(interview)))
}
