use crate::error::AppResult;
use crate::models::{area, Area, AreaModel};
use crate::response::ApiResponse;
use axum::{response::IntoResponse, Extension};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

#[utoipa::path(
    get,
    path = "/api/v1/areas",
    responses(
        (status = 200, description = "Known municipalities", body = [AreaModel]),
    ),
    tag = "areas"
)]
pub async fn list_areas(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let areas = Area::find()
        .order_by_asc(area::Column::Name)
        .all(&db)
        .await?;
    Ok(ApiResponse::ok(areas))
}
