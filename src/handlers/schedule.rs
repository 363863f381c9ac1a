use crate::error::{AppError, AppResult};
use crate::middleware::auth::require_admin;
use crate::middleware::AuthUser;
use crate::models::BailingScheduleModel;
use crate::response::ApiResponse;
use crate::services::schedule::ScheduleService;
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    responses(
        (status = 200, description = "Water bailing schedules, soonest first", body = [BailingScheduleModel]),
    ),
    tag = "schedules"
)]
pub async fn list_schedules(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let service = ScheduleService::new(db);
    let schedules = service.list().await?;
    Ok(ApiResponse::ok(schedules))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScheduleRequest {
    pub location: String,
    /// `YYYY-MM-DD`
    #[schema(value_type = String)]
    pub date: NaiveDate,
    /// `HH:MM:SS`
    #[schema(value_type = String)]
    pub time: NaiveTime,
    pub truck_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/schedules",
    security(("jwt_token" = [])),
    request_body = CreateScheduleRequest,
    responses(
        (status = 200, description = "Schedule created", body = BailingScheduleModel),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn create_schedule(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateScheduleRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = ScheduleService::new(db);
    let schedule = service
        .create(
            payload.location,
            payload.date,
            payload.time,
            payload.truck_name,
        )
        .await?;

    Ok(ApiResponse::ok(schedule))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateScheduleRequest {
    pub location: Option<String>,
    /// `YYYY-MM-DD`
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    /// `HH:MM:SS`
    #[schema(value_type = Option<String>)]
    pub time: Option<NaiveTime>,
    pub truck_name: Option<String>,
    /// One of `Scheduled`, `Ongoing`, `Completed`
    pub status: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/schedules/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Schedule ID")),
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Schedule updated", body = BailingScheduleModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn update_schedule(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = ScheduleService::new(db);
    let schedule = service
        .update(
            id,
            payload.location,
            payload.date,
            payload.time,
            payload.truck_name,
            payload.status,
        )
        .await?;

    Ok(ApiResponse::ok(schedule))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/schedules/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule deleted", body = String),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_schedule(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = ScheduleService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("Schedule deleted"))
}
