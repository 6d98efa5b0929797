use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::pipeline_dto::{
        AdvanceStatusPayload, ApplicationResponse, ProgressionQuery, ProgressionResponse,
    },
    error::Result,
    middleware::auth::ActorContext,
    models::interview::InterviewKey,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/employer/pipeline/status",
    request_body = AdvanceStatusPayload,
    responses(
        (status = 200, description = "Application status updated", body = Json<ApplicationResponse>),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn advance_status(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<AdvanceStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .pipeline_service
        .advance_status(
            &actor,
            payload.job_id,
            payload.seeker_id,
            payload.status,
            payload.notes,
        )
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[axum::debug_handler]
pub async fn get_progression(
    State(state): State<AppState>,
    Query(query): Query<ProgressionQuery>,
) -> Result<impl IntoResponse> {
    let key = InterviewKey::from_parts(query.application_id, query.seeker_id, query.job_id)?;
    let progression = state.pipeline_service.progression(&key).await?;
    Ok(Json(ProgressionResponse::from(progression)))
}
