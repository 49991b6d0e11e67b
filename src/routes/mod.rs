pub mod admin;
pub mod frontend;
pub mod health_checks;
pub mod registration;
pub mod session;
pub mod speaker;

pub use health_checks::*;
