use crate::{
    error::{AppError, AppResult},
    models::{announcement, Announcement, AnnouncementModel},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder,
};

const CATEGORIES: &[&str] = &["general", "maintenance", "emergency", "update"];

pub struct AnnouncementService {
    db: DatabaseConnection,
}

impl AnnouncementService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Pinned announcements first, then newest first.
    pub async fn list(&self) -> AppResult<Vec<AnnouncementModel>> {
        let rows = Announcement::find()
            .order_by_desc(announcement::Column::IsPinned)
            .order_by_desc(announcement::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn create(
        &self,
        title: String,
        message: String,
        category: Option<String>,
        is_pinned: bool,
        is_urgent: bool,
    ) -> AppResult<AnnouncementModel> {
        let category = category.unwrap_or_else(|| "general".to_string());
        if !CATEGORIES.contains(&category.as_str()) {
            return Err(AppError::Validation(format!(
                "Invalid category: {}",
                category
            )));
        }

        let new_announcement = announcement::ActiveModel {
            title: Set(title),
            message: Set(message),
            category: Set(category),
            is_pinned: Set(is_pinned),
            is_urgent: Set(is_urgent),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(new_announcement.insert(&self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Announcement::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
