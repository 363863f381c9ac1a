use crate::{
    error::{AppError, AppResult},
    models::{notification, Notification, NotificationModel},
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct NotificationService {
    db: DatabaseConnection,
}

impl NotificationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: i32, message: String) -> AppResult<NotificationModel> {
        let new_notification = notification::ActiveModel {
            user_id: Set(user_id),
            message: Set(message),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(new_notification.insert(&self.db).await?)
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<NotificationModel>> {
        let rows = Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn unread_count(&self, user_id: i32) -> AppResult<u64> {
        let count = Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Owner-scoped: marking another user's notification is a 404.
    pub async fn mark_read(&self, id: i32, user_id: i32) -> AppResult<NotificationModel> {
        let notification = Notification::find_by_id(id)
            .filter(notification::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: notification::ActiveModel = notification.into();
        active.is_read = Set(true);
        Ok(active.update(&self.db).await?)
    }

    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        let result = Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
