pub mod admin;
pub mod audit;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod notifications;
pub mod rate_limits;
pub mod reports;
pub mod users;
