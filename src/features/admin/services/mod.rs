pub mod admin_service;
pub mod export;

pub use admin_service::AdminService;
