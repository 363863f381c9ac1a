use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_areas_table;
mod m20250101_000003_create_complaints_table;
mod m20250101_000004_create_complaint_photos_table;
mod m20250101_000005_create_reports_table;
mod m20250101_000006_create_announcements_table;
mod m20250101_000007_create_feedback_table;
mod m20250101_000008_create_water_bills_table;
mod m20250101_000009_create_notifications_table;
mod m20250101_000010_create_bailing_schedules_table;
mod m20250101_000011_create_activity_logs_table;
mod m20250101_000012_create_refresh_tokens_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_areas_table::Migration),
            Box::new(m20250101_000003_create_complaints_table::Migration),
            Box::new(m20250101_000004_create_complaint_photos_table::Migration),
            Box::new(m20250101_000005_create_reports_table::Migration),
            Box::new(m20250101_000006_create_announcements_table::Migration),
            Box::new(m20250101_000007_create_feedback_table::Migration),
            Box::new(m20250101_000008_create_water_bills_table::Migration),
            Box::new(m20250101_000009_create_notifications_table::Migration),
            Box::new(m20250101_000010_create_bailing_schedules_table::Migration),
            Box::new(m20250101_000011_create_activity_logs_table::Migration),
            Box::new(m20250101_000012_create_refresh_tokens_table::Migration),
        ]
    }
}
