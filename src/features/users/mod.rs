pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use model::{Capability, ExpertRequestStatus, UserProfile, UserRole};
pub use services::ProfileService;
