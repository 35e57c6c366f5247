pub mod report_service;
pub mod review_policy;
pub mod review_service;

pub use report_service::ReportService;
pub use review_service::ReviewService;
