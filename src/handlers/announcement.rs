use crate::error::{AppError, AppResult};
use crate::middleware::auth::require_admin;
use crate::middleware::AuthUser;
use crate::models::AnnouncementModel;
use crate::response::ApiResponse;
use crate::services::activity::ActivityService;
use crate::services::announcement::AnnouncementService;
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/v1/announcements",
    responses(
        (status = 200, description = "Announcements, pinned first", body = [AnnouncementModel]),
    ),
    tag = "announcements"
)]
pub async fn list_announcements(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let service = AnnouncementService::new(db);
    let announcements = service.list().await?;
    Ok(ApiResponse::ok(announcements))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    /// One of `general`, `maintenance`, `emergency`, `update`
    pub category: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_urgent: bool,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/announcements",
    security(("jwt_token" = [])),
    request_body = CreateAnnouncementRequest,
    responses(
        (status = 200, description = "Announcement created", body = AnnouncementModel),
        (status = 400, description = "Validation error", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn create_announcement(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = AnnouncementService::new(db.clone());
    let announcement = service
        .create(
            payload.title,
            payload.message,
            payload.category,
            payload.is_pinned,
            payload.is_urgent,
        )
        .await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "announcement_created",
            Some(format!("Announcement \"{}\" posted", announcement.title)),
        )
        .await;

    Ok(ApiResponse::ok(announcement))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/announcements/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement deleted", body = String),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_announcement(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;

    let service = AnnouncementService::new(db.clone());
    service.delete(id).await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "announcement_deleted",
            Some(format!("Announcement {} deleted", id)),
        )
        .await;

    Ok(ApiResponse::ok("Announcement deleted"))
}
