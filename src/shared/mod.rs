pub mod constants;
pub mod csv;
pub mod types;
pub mod validation;
