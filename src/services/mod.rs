pub mod interview_service;
pub mod pipeline_service;
pub mod progression_service;
pub mod scheduling_guard;
pub mod status_sync_service;
