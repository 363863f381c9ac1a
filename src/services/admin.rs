use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel},
    utils::hash_password,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct AdminService {
    db: DatabaseConnection,
}

impl AdminService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_users(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<UserModel>, u64)> {
        let paginator = User::find()
            .order_by_desc(user::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    /// Admin-created account; unlike self-registration the role is chosen.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> AppResult<UserModel> {
        if !matches!(role, "user" | "admin") {
            return Err(AppError::Validation(format!("Invalid role: {}", role)));
        }
        let taken = User::find()
            .filter(
                sea_orm::Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(email)),
            )
            .count(&self.db)
            .await?
            > 0;
        if taken {
            return Err(AppError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let new_user = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(hash_password(password)?),
            role: Set(role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(new_user.insert(&self.db).await?)
    }

    pub async fn update_user(
        &self,
        id: i32,
        username: Option<String>,
        email: Option<String>,
        role: Option<String>,
    ) -> AppResult<UserModel> {
        let existing = User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(ref new_username) = username {
            if *new_username != existing.username {
                let taken = User::find()
                    .filter(user::Column::Username.eq(new_username.as_str()))
                    .count(&self.db)
                    .await?
                    > 0;
                if taken {
                    return Err(AppError::Conflict("Username already exists".to_string()));
                }
            }
        }
        if let Some(ref new_email) = email {
            if *new_email != existing.email {
                let taken = User::find()
                    .filter(user::Column::Email.eq(new_email.as_str()))
                    .count(&self.db)
                    .await?
                    > 0;
                if taken {
                    return Err(AppError::Conflict("Email already registered".to_string()));
                }
            }
        }

        let mut active: user::ActiveModel = existing.into();
        if let Some(username) = username {
            active.username = Set(username);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(role) = role {
            if !matches!(role.as_str(), "user" | "admin") {
                return Err(AppError::Validation(format!("Invalid role: {}", role)));
            }
            active.role = Set(role);
        }
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        Ok(active.update(&self.db).await?)
    }

    /// Hard delete; complaints, bills, feedback and notifications cascade,
    /// reports and assignments null out their user reference.
    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        let result = User::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
