use crate::{
    error::AppResult,
    models::{activity_log, ActivityLog, ActivityLogModel, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryOrder,
};

pub struct ActivityService {
    db: DatabaseConnection,
}

impl ActivityService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append an audit row. Failures are logged, not surfaced; auditing
    /// must never fail the admin action it records.
    pub async fn log(&self, user_id: Option<i32>, action: &str, details: Option<String>) {
        let entry = activity_log::ActiveModel {
            user_id: Set(user_id),
            action: Set(action.to_string()),
            details: Set(details),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };
        if let Err(e) = entry.insert(&self.db).await {
            tracing::warn!("Failed to write activity log entry: {:?}", e);
        }
    }

    pub async fn list_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<(ActivityLogModel, Option<UserModel>)>, u64)> {
        let paginator = ActivityLog::find()
            .find_also_related(User)
            .order_by_desc(activity_log::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }
}
