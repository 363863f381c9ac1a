pub mod activity;
pub mod admin;
pub mod announcement;
pub mod auth;
pub mod billing;
pub mod complaint;
pub mod dashboard;
pub mod feedback;
pub mod notification;
pub mod report;
pub mod schedule;
pub mod upload;
