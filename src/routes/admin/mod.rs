pub mod analytics;
pub mod attendee;
pub mod login;
