pub mod application_dto;
pub mod auth_dto;
pub mod interview_dto;
pub mod position_dto;
