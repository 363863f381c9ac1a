use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, require_admin};
use crate::middleware::AuthUser;
use crate::models::WaterBillModel;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::billing::BillingService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::prelude::Decimal;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

#[utoipa::path(
    get,
    path = "/api/v1/bills",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's water bills", body = [WaterBillModel]),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "bills"
)]
pub async fn my_bills(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let service = BillingService::new(db);
    let bills = service.bills_for_user(user_id).await?;
    Ok(ApiResponse::ok(bills))
}

#[utoipa::path(
    post,
    path = "/api/v1/bills/{id}/pay",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Bill paid via GCash", body = WaterBillModel),
        (status = 400, description = "Already paid", body = AppError),
        (status = 404, description = "Not found or not yours", body = AppError),
    ),
    tag = "bills"
)]
pub async fn pay_bill(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let service = BillingService::new(db);
    let bill = service.pay(id, user_id).await?;
    Ok(ApiResponse::ok(bill))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBillRequest {
    pub user_id: i32,
    /// Peso amount, e.g. 350.75
    pub amount: f64,
    /// Billing month name, e.g. "January"
    pub month: String,
    pub year: i32,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/bills",
    security(("jwt_token" = [])),
    request_body = CreateBillRequest,
    responses(
        (status = 200, description = "Bill created", body = WaterBillModel),
        (status = 400, description = "Invalid amount", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn create_bill(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateBillRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let amount = Decimal::try_from(payload.amount)
        .map_err(|_| AppError::Validation("Invalid amount".to_string()))?;

    let service = BillingService::new(db);
    let bill = service
        .create(payload.user_id, amount, payload.month, payload.year)
        .await?;

    Ok(ApiResponse::ok(bill))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/bills",
    security(("jwt_token" = [])),
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated bills", body = PaginatedResponse<WaterBillModel>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn admin_list_bills(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let page = pagination.page();
    let per_page = pagination.per_page();
    let service = BillingService::new(db);
    let (bills, total) = service.list_paginated(page, per_page).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        bills, total, page, per_page,
    )))
}
