pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::services::{
    interview_service::InterviewService, pipeline_service::PipelineService,
    progression_service::ProgressionService, scheduling_guard::SchedulingGuard,
    status_sync_service::StatusSyncService,
};
use crate::store::{PgRecordStore, RecordStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub pipeline_service: PipelineService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let store: Arc<dyn RecordStore> = Arc::new(PgRecordStore::new(
            pool,
            Duration::from_secs(config.store_timeout_secs),
        ));
        Self::with_store(store)
    }

    /// Wires the component graph on top of any record store. Tests use this
    /// with `MemoryStore` to run the full pipeline without a database.
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        let guard = SchedulingGuard::new(store.clone());
        let progression = ProgressionService::new(store.clone());
        let interview_service =
            InterviewService::new(store.clone(), guard, progression.clone());
        let sync_service = StatusSyncService::new(store.clone());
        let pipeline_service = PipelineService::new(
            store.clone(),
            interview_service,
            sync_service,
            progression,
        );

        Self {
            store,
            pipeline_service,
        }
    }
}
