pub mod model;
pub mod validator;

pub use model::CallerIdentity;
pub use validator::TokenValidator;
