pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    admin_service::AdminService, application_service::ApplicationService,
    interview_service::InterviewService, notification_service::NotificationService,
    position_service::PositionService, upload_service::UploadService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub admin_service: AdminService,
    pub application_service: ApplicationService,
    pub interview_service: InterviewService,
    pub notification_service: NotificationService,
    pub position_service: PositionService,
    pub upload_service: UploadService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let admin_service = AdminService::new(pool.clone());
        let application_service = ApplicationService::new(pool.clone());
        let interview_service = InterviewService::new(pool.clone());
        let notification_service = NotificationService::new(pool.clone());
        let position_service = PositionService::new(pool.clone());
        let upload_service = UploadService::new(config.uploads_dir.clone());

        Self {
            pool,
            admin_service,
            application_service,
            interview_service,
            notification_service,
            position_service,
            upload_service,
        }
    }
}
