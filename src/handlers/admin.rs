use crate::error::{AppError, AppResult};
use crate::middleware::auth::require_admin;
use crate::middleware::AuthUser;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::activity::ActivityService;
use crate::services::admin::AdminService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::auth::UserResponse;

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    security(("jwt_token" = [])),
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated users", body = PaginatedResponse<UserResponse>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn list_users(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let page = pagination.page();
    let per_page = pagination.per_page();
    let service = AdminService::new(db);
    let (users, total) = service.list_users(page, per_page).await?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        users, total, page, per_page,
    )))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// `user` or `admin`
    pub role: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    security(("jwt_token" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Username or email already exists", body = AppError),
    ),
    tag = "admin"
)]
pub async fn create_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = AdminService::new(db.clone());
    let user = service
        .create_user(
            &payload.username,
            &payload.email,
            &payload.password,
            &payload.role,
        )
        .await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "user_created",
            Some(format!("User {} ({}) created", user.username, user.role)),
        )
        .await;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    /// `user` or `admin`
    pub role: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Username or email already exists", body = AppError),
    ),
    tag = "admin"
)]
pub async fn update_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = AdminService::new(db.clone());
    let user = service
        .update_user(id, payload.username, payload.email, payload.role)
        .await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "user_updated",
            Some(format!("User {} updated", id)),
        )
        .await;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = String),
        (status = 400, description = "Cannot delete yourself", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;
    if admin_id == id {
        return Err(AppError::Validation(
            "You cannot delete your own account".to_string(),
        ));
    }

    let service = AdminService::new(db.clone());
    service.delete_user(id).await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "user_deleted",
            Some(format!("User {} deleted", id)),
        )
        .await;

    Ok(ApiResponse::ok("User deleted"))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityEntry {
    pub id: i32,
    pub username: Option<String>,
    pub action: String,
    pub details: Option<String>,
    pub created_at: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/activity",
    security(("jwt_token" = [])),
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated activity log", body = PaginatedResponse<ActivityEntry>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn list_activity(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let page = pagination.page();
    let per_page = pagination.per_page();
    let service = ActivityService::new(db);
    let (rows, total) = service.list_paginated(page, per_page).await?;

    let entries: Vec<ActivityEntry> = rows
        .into_iter()
        .map(|(log, user)| ActivityEntry {
            id: log.id,
            username: user.map(|u| u.username),
            action: log.action,
            details: log.details,
            created_at: log.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        entries, total, page, per_page,
    )))
}
