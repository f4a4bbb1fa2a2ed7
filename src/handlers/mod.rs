pub mod admin;
pub mod auth;
pub mod cases;
pub mod contracts;
pub mod inventory;
pub mod notify;
pub mod payments;
pub mod procurement;
pub mod reminders;
pub mod report;
pub mod schedule;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
