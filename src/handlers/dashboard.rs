use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, require_admin};
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::services::dashboard::{AdminStats, DashboardService, UserDashboard};
use axum::{response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's report summary", body = UserDashboard),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "dashboard"
)]
pub async fn user_dashboard(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let service = DashboardService::new(db);
    let summary = service.user_dashboard(user_id).await?;
    Ok(ApiResponse::ok(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "System-wide statistics", body = AdminStats),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn admin_dashboard(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;
    let service = DashboardService::new(db);
    let stats = service.admin_stats().await?;
    Ok(ApiResponse::ok(stats))
}
