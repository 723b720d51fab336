pub mod admin;
pub mod application;
pub mod interview;
pub mod notification;
pub mod position;
