pub mod health_service;
pub mod user;
pub mod user_service;
