pub mod admin_service;
pub mod application_service;
pub mod interview_service;
pub mod notification_service;
pub mod position_service;
pub mod upload_service;
