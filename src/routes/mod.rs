pub mod application_routes;
pub mod auth_routes;
pub mod health;
pub mod interview_routes;
pub mod position_routes;
