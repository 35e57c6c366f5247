pub mod model;
pub mod services;

pub use model::{actions, ActivityLogEntry};
pub use services::ActivityLogService;
