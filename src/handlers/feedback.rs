use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, require_admin};
use crate::middleware::AuthUser;
use crate::models::{FeedbackModel, UserModel};
use crate::response::ApiResponse;
use crate::services::feedback::{FeedbackService, FeedbackSummary};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFeedbackRequest {
    /// Star rating, 1-5
    pub rating: i16,
    pub comment: Option<String>,
    pub complaint_id: Option<i32>,
    pub issue_area: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    security(("jwt_token" = [])),
    request_body = CreateFeedbackRequest,
    responses(
        (status = 200, description = "Feedback recorded", body = FeedbackModel),
        (status = 400, description = "Invalid rating", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "feedback"
)]
pub async fn create_feedback(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateFeedbackRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = FeedbackService::new(db);
    let feedback = service
        .create(
            user_id,
            payload.rating,
            payload.comment,
            payload.complaint_id,
            payload.issue_area,
        )
        .await?;

    Ok(ApiResponse::ok(feedback))
}

#[utoipa::path(
    get,
    path = "/api/v1/feedback/mine",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's feedback entries", body = [FeedbackModel]),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "feedback"
)]
pub async fn my_feedback(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let service = FeedbackService::new(db);
    let feedback = service.mine(user_id).await?;
    Ok(ApiResponse::ok(feedback))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminFeedbackEntry {
    pub id: i32,
    pub username: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub sentiment: String,
    pub status: String,
    pub issue_area: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminFeedbackResponse {
    pub entries: Vec<AdminFeedbackEntry>,
    pub summary: FeedbackSummary,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/feedback",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "All feedback with summary", body = AdminFeedbackResponse),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn admin_list_feedback(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = FeedbackService::new(db);
    let rows = service.list_with_users().await?;
    let summary = service.summary().await?;

    let entries = rows
        .into_iter()
        .map(|(f, u): (FeedbackModel, Option<UserModel>)| AdminFeedbackEntry {
            id: f.id,
            username: u.map(|u| u.username).unwrap_or_else(|| "Unknown".to_string()),
            rating: f.rating,
            comment: f.comment,
            sentiment: f.sentiment,
            status: f.status,
            issue_area: f.issue_area,
            created_at: f.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(ApiResponse::ok(AdminFeedbackResponse { entries, summary }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFeedbackRequest {
    pub comment: Option<String>,
    pub rating: Option<i16>,
    /// One of `Reviewed`, `In Progress`, `Resolved`
    pub status: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/feedback/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Feedback ID")),
    request_body = UpdateFeedbackRequest,
    responses(
        (status = 200, description = "Feedback updated", body = FeedbackModel),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn update_feedback(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFeedbackRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = FeedbackService::new(db);
    let feedback = service
        .update(id, payload.comment, payload.rating, payload.status)
        .await?;

    Ok(ApiResponse::ok(feedback))
}
