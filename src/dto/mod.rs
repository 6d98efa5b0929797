pub mod interview_dto;
pub mod pipeline_dto;
