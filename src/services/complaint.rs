use crate::{
    error::{AppError, AppResult},
    models::{
        area, complaint, complaint_photo, report, user, Area, Complaint, ComplaintModel,
        ComplaintPhoto, ComplaintPhotoModel, User, UserModel,
    },
    services::upload::{UploadConfig, UploadService},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

/// Parsed complaint submission. Latitude and longitude stay optional here
/// so the service can reject the whole submission before any row exists.
#[derive(Debug, Default)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub area: String,
    pub barangay: Option<String>,
    pub purok: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default)]
pub struct ComplaintFilter {
    pub status: Option<String>,
    pub user: Option<String>,
    pub q: Option<String>,
    pub municipalities: Vec<String>,
}

/// Location text used on the mirrored report row.
pub fn full_location(area: &str, barangay: Option<&str>, purok: Option<&str>) -> String {
    let base = format!("Brgy. {}, {}", barangay.unwrap_or(""), area);
    match purok {
        Some(p) if !p.trim().is_empty() => format!("Purok {}, {}", p, base),
        _ => base,
    }
}

pub struct ComplaintService {
    db: DatabaseConnection,
}

impl ComplaintService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submit a complaint: persist the Complaint, an optional ComplaintPhoto,
    /// then a mirrored Report row for the map and dashboards.
    ///
    /// The complaint and report inserts are deliberately not wrapped in one
    /// transaction; the two tables carry duplicated, unlinked state.
    pub async fn submit(
        &self,
        user_id: i32,
        input: NewComplaint,
        photo: Option<(Vec<u8>, String)>,
        upload_config: &UploadConfig,
    ) -> AppResult<ComplaintModel> {
        let (latitude, longitude) = match (input.latitude, input.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(AppError::Validation(
                    "Please select a location on the map before submitting.".to_string(),
                ))
            }
        };

        let area_known = Area::find()
            .filter(area::Column::Name.eq(input.area.as_str()))
            .count(&self.db)
            .await?
            > 0;
        if !area_known {
            return Err(AppError::Validation(format!(
                "Unknown municipality: {}",
                input.area
            )));
        }

        let photo_url = match photo {
            Some((data, content_type)) => Some(
                UploadService::save_photo(upload_config, &data, &content_type, "complaint_photos")
                    .await?,
            ),
            None => None,
        };

        let now = chrono::Utc::now().naive_utc();
        let new_complaint = complaint::ActiveModel {
            user_id: Set(user_id),
            area: Set(input.area.clone()),
            barangay: Set(input.barangay.clone()),
            purok: Set(input.purok.clone()),
            photo_url: Set(photo_url.clone()),
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            status: Set("Pending".to_string()),
            latitude: Set(latitude),
            longitude: Set(longitude),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let complaint = match new_complaint.insert(&self.db).await {
            Ok(complaint) => complaint,
            Err(e) => {
                // A failed insert must not leave an orphaned file on disk
                if let Some(ref url) = photo_url {
                    UploadService::delete_photo(upload_config, url).await;
                }
                return Err(e.into());
            }
        };

        if let Some(ref url) = photo_url {
            let photo_row = complaint_photo::ActiveModel {
                complaint_id: Set(complaint.id),
                photo_url: Set(url.clone()),
                uploaded_at: Set(now),
                ..Default::default()
            };
            photo_row.insert(&self.db).await?;
        }

        let location = full_location(
            &input.area,
            input.barangay.as_deref(),
            input.purok.as_deref(),
        );
        let mirror = report::ActiveModel {
            reporter_id: Set(Some(user_id)),
            title: Set(input.title),
            description: Set(input.description),
            image_url: Set(photo_url),
            latitude: Set(Some(latitude)),
            longitude: Set(Some(longitude)),
            address: Set(input.barangay.clone()),
            barangay: Set(input.barangay),
            issue_type: Set(Some(input.area)),
            location: Set(Some(location)),
            status: Set("Pending".to_string()),
            created_at: Set(now),
            ..Default::default()
        };
        mirror.insert(&self.db).await?;

        Ok(complaint)
    }

    /// Public filtered feed over complaints with submitter and photos.
    pub async fn list_filtered(
        &self,
        filter: ComplaintFilter,
    ) -> AppResult<Vec<(ComplaintModel, Option<UserModel>, Vec<ComplaintPhotoModel>)>> {
        let mut query = Complaint::find().find_also_related(User);

        if let Some(status) = filter.status.filter(|s| !s.is_empty()) {
            query = query.filter(complaint::Column::Status.eq(status));
        }
        if let Some(username) = filter.user.filter(|u| !u.is_empty()) {
            query = query.filter(user::Column::Username.contains(&username));
        }
        if let Some(q) = filter.q.filter(|q| !q.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(complaint::Column::Title.contains(&q))
                    .add(complaint::Column::Description.contains(&q)),
            );
        }
        if !filter.municipalities.is_empty() {
            query = query.filter(complaint::Column::Area.is_in(filter.municipalities));
        }

        let rows = query
            .order_by_desc(complaint::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for (complaint, submitter) in rows {
            let photos = complaint.find_related(ComplaintPhoto).all(&self.db).await?;
            result.push((complaint, submitter, photos));
        }
        Ok(result)
    }

    pub async fn get_detail(
        &self,
        id: i32,
    ) -> AppResult<(ComplaintModel, Option<UserModel>, Vec<ComplaintPhotoModel>)> {
        let (complaint, submitter) = Complaint::find_by_id(id)
            .find_also_related(User)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        let photos = complaint.find_related(ComplaintPhoto).all(&self.db).await?;
        Ok((complaint, submitter, photos))
    }

    /// Set an arbitrary status with optional remarks. There is no
    /// predecessor-state validation.
    pub async fn update_status(
        &self,
        id: i32,
        status: &str,
        remarks: Option<String>,
    ) -> AppResult<ComplaintModel> {
        if !matches!(status, "Pending" | "In Progress" | "Resolved" | "Approved") {
            return Err(AppError::Validation(format!("Invalid status: {}", status)));
        }
        let complaint = Complaint::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: complaint::ActiveModel = complaint.into();
        active.status = Set(status.to_string());
        if remarks.is_some() {
            active.remarks = Set(remarks);
        }
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        Ok(active.update(&self.db).await?)
    }

    pub async fn assign(&self, id: i32, assignee_id: i32) -> AppResult<ComplaintModel> {
        let assignee_exists = User::find_by_id(assignee_id).one(&self.db).await?.is_some();
        if !assignee_exists {
            return Err(AppError::Validation("Assignee does not exist".to_string()));
        }
        let complaint = Complaint::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: complaint::ActiveModel = complaint.into();
        active.assigned_to = Set(Some(assignee_id));
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        Ok(active.update(&self.db).await?)
    }

    /// Hard delete. Photos go with the complaint via FK cascade; mirrored
    /// report rows are untouched because nothing links them.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Complaint::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
