pub mod admin;
pub mod announcement;
pub mod area;
pub mod auth;
pub mod billing;
pub mod complaint;
pub mod dashboard;
pub mod feedback;
pub mod notification;
pub mod report;
pub mod schedule;

pub use auth::*;
