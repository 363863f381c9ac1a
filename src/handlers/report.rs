use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, require_admin};
use crate::middleware::AuthUser;
use crate::models::{ReportModel, UserModel};
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::activity::ActivityService;
use crate::services::report::{NewReport, ReportService};
use crate::services::upload::UploadConfig;
use axum::{
    extract::{Multipart, Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entry in the public map feed.
#[derive(Debug, Serialize, ToSchema)]
pub struct MapReportEntry {
    pub id: i32,
    /// Reporter username, `"Unknown"` when the account is gone
    pub user: String,
    pub title: String,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Issue type, empty string when unset
    pub area: String,
    pub barangay: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
}

impl From<(ReportModel, Option<UserModel>)> for MapReportEntry {
    fn from((report, reporter): (ReportModel, Option<UserModel>)) -> Self {
        Self {
            id: report.id,
            user: reporter
                .map(|u| u.username)
                .unwrap_or_else(|| "Unknown".to_string()),
            title: report.title,
            status: report.status,
            latitude: report.latitude,
            longitude: report.longitude,
            area: report.issue_type.unwrap_or_default(),
            barangay: report.barangay.unwrap_or_default(),
            created_at: report.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Compact own-reports entry. Key names and date format differ from the
/// map feed on purpose; clients already depend on both shapes.
#[derive(Debug, Serialize, ToSchema)]
pub struct MyReportEntry {
    pub id: i32,
    pub title: String,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// `YYYY-MM-DD HH:MM`
    pub date_reported: String,
}

impl From<ReportModel> for MyReportEntry {
    fn from(report: ReportModel) -> Self {
        Self {
            id: report.id,
            title: report.title,
            status: report.status.trim().to_string(),
            latitude: report.latitude,
            longitude: report.longitude,
            date_reported: report.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyReportDetailEntry {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// `YYYY-MM-DD HH:MM:SS`
    pub date_submitted: String,
}

impl From<ReportModel> for MyReportDetailEntry {
    fn from(report: ReportModel) -> Self {
        Self {
            id: report.id,
            title: report.title,
            description: report.description,
            status: report.status,
            latitude: report.latitude,
            longitude: report.longitude,
            date_submitted: report.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyReportsDetailResponse {
    pub reports: Vec<MyReportDetailEntry>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reports",
    security(("jwt_token" = [])),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Report submitted", body = ReportModel),
        (status = 400, description = "Missing fields or location", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "reports"
)]
pub async fn submit_report(
    Extension(db): Extension<DatabaseConnection>,
    Extension(upload_config): Extension<UploadConfig>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let mut input = NewReport::default();
    let mut photo: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read photo: {}", e)))?;
                if !data.is_empty() {
                    photo = Some((data.to_vec(), content_type));
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read form: {}", e)))?;
                let value = value.trim().to_string();
                match name.as_str() {
                    "title" => input.title = value,
                    "description" => input.description = value,
                    "latitude" => input.latitude = value.parse().ok(),
                    "longitude" => input.longitude = value.parse().ok(),
                    _ => {}
                }
            }
        }
    }

    let service = ReportService::new(db);
    let report = service.create(user_id, input, photo, &upload_config).await?;

    Ok(ApiResponse::with_message(
        report,
        "Your report has been submitted successfully.",
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/map/reports",
    responses(
        (status = 200, description = "All reports for the public map", body = [MapReportEntry]),
    ),
    tag = "reports"
)]
pub async fn map_reports(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(db);
    let rows = service.all_with_reporters().await?;
    let entries: Vec<MapReportEntry> = rows.into_iter().map(MapReportEntry::from).collect();
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/mine",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's reports", body = [MyReportEntry]),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "reports"
)]
pub async fn my_reports(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let service = ReportService::new(db);
    let rows = service.for_reporter(user_id).await?;
    let entries: Vec<MyReportEntry> = rows.into_iter().map(MyReportEntry::from).collect();
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/mine/detailed",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's reports with descriptions", body = MyReportsDetailResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "reports"
)]
pub async fn my_reports_detailed(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let service = ReportService::new(db);
    let rows = service.for_reporter(user_id).await?;
    let reports = rows.into_iter().map(MyReportDetailEntry::from).collect();
    Ok(Json(MyReportsDetailResponse { reports }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminReportEntry {
    pub id: i32,
    pub reporter: Option<String>,
    pub title: String,
    pub description: String,
    pub issue_type: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub remarks: Option<String>,
    pub created_at: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/reports",
    security(("jwt_token" = [])),
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated reports", body = PaginatedResponse<AdminReportEntry>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn admin_list_reports(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let page = pagination.page();
    let per_page = pagination.per_page();
    let service = ReportService::new(db);
    let (rows, total) = service.list_paginated(page, per_page).await?;

    let entries: Vec<AdminReportEntry> = rows
        .into_iter()
        .map(|(r, u)| AdminReportEntry {
            id: r.id,
            reporter: u.map(|u| u.username),
            title: r.title,
            description: r.description,
            issue_type: r.issue_type,
            location: r.location,
            status: r.status,
            remarks: r.remarks,
            created_at: r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        entries, total, page, per_page,
    )))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReportStatusRequest {
    /// One of `Pending`, `In Progress`, `Resolved`
    pub status: String,
    pub remarks: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/reports/{id}/status",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Report ID")),
    request_body = UpdateReportStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ReportModel),
        (status = 400, description = "Invalid status", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn update_report_status(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReportStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;

    let service = ReportService::new(db.clone());
    let report = service
        .update_status(id, &payload.status, payload.remarks)
        .await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "report_status_updated",
            Some(format!("Report {} set to {}", id, report.status)),
        )
        .await;

    Ok(ApiResponse::ok(report))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/reports/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted", body = String),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_report(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;

    let service = ReportService::new(db.clone());
    service.delete(id).await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "report_deleted",
            Some(format!("Report {} deleted", id)),
        )
        .await;

    Ok(ApiResponse::ok("Report deleted"))
}
