use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use talentbridge_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let employer_api = Router::new()
        .route(
            "/api/employer/interviews",
            get(routes::interviews::list_interviews).post(routes::interviews::schedule_interview),
        )
        .route(
            "/api/employer/interviews/:id",
            get(routes::interviews::get_interview)
                .patch(routes::interviews::reschedule_interview)
                .delete(routes::interviews::delete_interview),
        )
        .route(
            "/api/employer/interviews/:id/status",
            post(routes::interviews::set_interview_status),
        )
        .route(
            "/api/employer/interviews/:id/cancel",
            post(routes::interviews::cancel_interview),
        )
        .route(
            "/api/employer/interviews/:id/feedback",
            post(routes::interviews::attach_feedback),
        )
        .route(
            "/api/employer/pipeline/status",
            post(routes::pipeline::advance_status),
        )
        .route(
            "/api/employer/pipeline/progression",
            get(routes::pipeline::get_progression),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::require_employer_auth,
        ));

    let app = base_routes
        .merge(employer_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
