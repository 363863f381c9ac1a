use crate::{
    error::{AppError, AppResult},
    models::{report, Report, ReportModel, User, UserModel},
    services::notification::NotificationService,
    services::upload::{UploadConfig, UploadService},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

#[derive(Debug, Default)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub struct ReportService {
    db: DatabaseConnection,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Standalone report submission (no complaint row).
    pub async fn create(
        &self,
        reporter_id: i32,
        input: NewReport,
        photo: Option<(Vec<u8>, String)>,
        upload_config: &UploadConfig,
    ) -> AppResult<ReportModel> {
        if input.title.trim().is_empty() || input.description.trim().is_empty() {
            return Err(AppError::Validation(
                "Please fill in all required fields.".to_string(),
            ));
        }
        let (latitude, longitude) = match (input.latitude, input.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(AppError::Validation(
                    "Please select a location on the map.".to_string(),
                ))
            }
        };

        let image_url = match photo {
            Some((data, content_type)) => {
                Some(UploadService::save_photo(upload_config, &data, &content_type, "reports").await?)
            }
            None => None,
        };

        let new_report = report::ActiveModel {
            reporter_id: Set(Some(reporter_id)),
            title: Set(input.title),
            description: Set(input.description),
            image_url: Set(image_url.clone()),
            latitude: Set(Some(latitude)),
            longitude: Set(Some(longitude)),
            status: Set("Pending".to_string()),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };
        match new_report.insert(&self.db).await {
            Ok(report) => Ok(report),
            Err(e) => {
                // A failed insert must not leave an orphaned file on disk
                if let Some(ref url) = image_url {
                    UploadService::delete_photo(upload_config, url).await;
                }
                Err(e.into())
            }
        }
    }

    /// Every report with its reporter, newest first. Feeds the public map.
    pub async fn all_with_reporters(&self) -> AppResult<Vec<(ReportModel, Option<UserModel>)>> {
        let rows = Report::find()
            .find_also_related(User)
            .order_by_desc(report::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Reports whose reporter is the given user, newest first.
    pub async fn for_reporter(&self, user_id: i32) -> AppResult<Vec<ReportModel>> {
        let rows = Report::find()
            .filter(report::Column::ReporterId.eq(user_id))
            .order_by_desc(report::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> AppResult<ReportModel> {
        Report::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Paginated admin listing with reporters.
    pub async fn list_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<(ReportModel, Option<UserModel>)>, u64)> {
        let paginator = Report::find()
            .find_also_related(User)
            .order_by_desc(report::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    /// Set status with optional remarks and notify the reporter.
    /// Any of the three statuses may follow any other.
    pub async fn update_status(
        &self,
        id: i32,
        status: &str,
        remarks: Option<String>,
    ) -> AppResult<ReportModel> {
        if !matches!(status, "Pending" | "In Progress" | "Resolved") {
            return Err(AppError::Validation(format!("Invalid status: {}", status)));
        }
        let report = self.get(id).await?;
        let reporter_id = report.reporter_id;
        let title = report.title.clone();

        let mut active: report::ActiveModel = report.into();
        active.status = Set(status.to_string());
        if remarks.is_some() {
            active.remarks = Set(remarks);
        }
        let updated = active.update(&self.db).await?;

        if let Some(user_id) = reporter_id {
            NotificationService::new(self.db.clone())
                .create(
                    user_id,
                    format!("Your report \"{}\" is now marked as {}.", title, status),
                )
                .await?;
        }

        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Report::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
