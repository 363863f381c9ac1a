use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, require_admin};
use crate::middleware::AuthUser;
use crate::models::{ComplaintModel, ComplaintPhotoModel, UserModel};
use crate::response::ApiResponse;
use crate::services::activity::ActivityService;
use crate::services::complaint::{ComplaintFilter, ComplaintService, NewComplaint};
use crate::services::upload::UploadConfig;
use axum::{
    extract::{Multipart, Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedUser {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedPhoto {
    pub url: String,
}

/// Complaint as it appears in the public feed and the detail endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintFeedEntry {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date_submitted: String,
    pub user: FeedUser,
    pub photos: Vec<FeedPhoto>,
}

impl ComplaintFeedEntry {
    fn build(
        complaint: ComplaintModel,
        submitter: Option<UserModel>,
        photos: Vec<ComplaintPhotoModel>,
    ) -> Self {
        let user = match submitter {
            Some(u) => FeedUser {
                username: u.username,
                email: u.email,
            },
            None => FeedUser {
                username: "Unknown".to_string(),
                email: String::new(),
            },
        };
        Self {
            id: complaint.id,
            title: complaint.title,
            description: complaint.description,
            status: complaint.status,
            latitude: complaint.latitude,
            longitude: complaint.longitude,
            date_submitted: complaint.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            user,
            photos: photos
                .into_iter()
                .map(|p| FeedPhoto { url: p.photo_url })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintFeedResponse {
    pub reports: Vec<ComplaintFeedEntry>,
}

#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    security(("jwt_token" = [])),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Complaint submitted", body = ComplaintModel),
        (status = 400, description = "Missing fields or location", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "complaints"
)]
pub async fn submit_complaint(
    Extension(db): Extension<DatabaseConnection>,
    Extension(upload_config): Extension<UploadConfig>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let mut input = NewComplaint::default();
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
                    "area" => input.area = value,
                    "barangay" => {
                        if !value.is_empty() {
                            input.barangay = Some(value);
                        }
                    }
                    "purok" => {
                        if !value.is_empty() {
                            input.purok = Some(value);
                        }
                    }
                    "latitude" => input.latitude = value.parse().ok(),
                    "longitude" => input.longitude = value.parse().ok(),
                    _ => {}
                }
            }
        }
    }

    if input.title.is_empty() || input.description.is_empty() || input.area.is_empty() {
        return Err(AppError::Validation(
            "Please correct the errors in the form.".to_string(),
        ));
    }

    let service = ComplaintService::new(db);
    let complaint = service.submit(user_id, input, photo, &upload_config).await?;

    Ok(ApiResponse::with_message(
        complaint,
        "Complaint submitted successfully!",
    ))
}

#[derive(Debug, Deserialize)]
pub struct ComplaintFeedQuery {
    pub status: Option<String>,
    pub user: Option<String>,
    pub q: Option<String>,
    /// Comma-separated municipality names
    pub municipalities: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    params(
        ("status" = Option<String>, Query, description = "Exact status filter"),
        ("user" = Option<String>, Query, description = "Submitter username contains"),
        ("q" = Option<String>, Query, description = "Title/description contains"),
        ("municipalities" = Option<String>, Query, description = "Comma-separated municipality names"),
    ),
    responses(
        (status = 200, description = "Filtered complaint feed", body = ComplaintFeedResponse),
    ),
    tag = "complaints"
)]
pub async fn list_complaints(
    Extension(db): Extension<DatabaseConnection>,
    Query(query): Query<ComplaintFeedQuery>,
) -> AppResult<impl IntoResponse> {
    let municipalities = query
        .municipalities
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();

    let service = ComplaintService::new(db);
    let rows = service
        .list_filtered(ComplaintFilter {
            status: query.status,
            user: query.user,
            q: query.q,
            municipalities,
        })
        .await?;

    let reports = rows
        .into_iter()
        .map(|(c, u, p)| ComplaintFeedEntry::build(c, u, p))
        .collect();

    Ok(Json(ComplaintFeedResponse { reports }))
}

#[utoipa::path(
    get,
    path = "/api/v1/complaints/{id}",
    params(("id" = i32, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint detail", body = ComplaintFeedEntry),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "complaints"
)]
pub async fn get_complaint(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ComplaintService::new(db);
    let (complaint, submitter, photos) = service.get_detail(id).await?;
    Ok(Json(ComplaintFeedEntry::build(complaint, submitter, photos)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateComplaintStatusRequest {
    pub status: String,
    pub remarks: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/complaints/{id}/status",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Complaint ID")),
    request_body = UpdateComplaintStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ComplaintModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn update_complaint_status(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateComplaintStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;

    let service = ComplaintService::new(db.clone());
    let complaint = service
        .update_status(id, &payload.status, payload.remarks)
        .await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "complaint_status_updated",
            Some(format!("Complaint {} set to {}", id, complaint.status)),
        )
        .await;

    Ok(ApiResponse::ok(complaint))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/complaints/{id}/approve",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint approved", body = ComplaintModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn approve_complaint(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;

    let service = ComplaintService::new(db.clone());
    let complaint = service.update_status(id, "Approved", None).await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "complaint_approved",
            Some(format!("Complaint {} approved", id)),
        )
        .await;

    Ok(ApiResponse::ok(complaint))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/complaints/{id}/resolve",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint resolved", body = ComplaintModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn resolve_complaint(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;

    let service = ComplaintService::new(db.clone());
    let complaint = service.update_status(id, "Resolved", None).await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "complaint_resolved",
            Some(format!("Complaint {} resolved", id)),
        )
        .await;

    Ok(ApiResponse::ok(complaint))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignComplaintRequest {
    pub assigned_to: i32,
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/complaints/{id}/assign",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Complaint ID")),
    request_body = AssignComplaintRequest,
    responses(
        (status = 200, description = "Complaint assigned", body = ComplaintModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn assign_complaint(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<AssignComplaintRequest>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;

    let service = ComplaintService::new(db.clone());
    let complaint = service.assign(id, payload.assigned_to).await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "complaint_assigned",
            Some(format!(
                "Complaint {} assigned to user {}",
                id, payload.assigned_to
            )),
        )
        .await;

    Ok(ApiResponse::ok(complaint))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/complaints/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint deleted", body = String),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_complaint(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_admin(&db, &auth_user).await?;

    let service = ComplaintService::new(db.clone());
    service.delete(id).await?;

    ActivityService::new(db)
        .log(
            Some(admin_id),
            "complaint_deleted",
            Some(format!("Complaint {} deleted", id)),
        )
        .await;

    Ok(ApiResponse::ok("Complaint deleted"))
}
