use crate::{
    error::{AppError, AppResult},
    models::{bailing_schedule, BailingSchedule, BailingScheduleModel},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder,
};

const STATUSES: &[&str] = &["Scheduled", "Ongoing", "Completed"];

pub struct ScheduleService {
    db: DatabaseConnection,
}

impl ScheduleService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Upcoming first.
    pub async fn list(&self) -> AppResult<Vec<BailingScheduleModel>> {
        let rows = BailingSchedule::find()
            .order_by_asc(bailing_schedule::Column::Date)
            .order_by_asc(bailing_schedule::Column::Time)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn create(
        &self,
        location: String,
        date: NaiveDate,
        time: NaiveTime,
        truck_name: Option<String>,
    ) -> AppResult<BailingScheduleModel> {
        let new_schedule = bailing_schedule::ActiveModel {
            location: Set(location),
            date: Set(date),
            time: Set(time),
            truck_name: Set(truck_name),
            status: Set("Scheduled".to_string()),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(new_schedule.insert(&self.db).await?)
    }

    pub async fn update(
        &self,
        id: i32,
        location: Option<String>,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        truck_name: Option<String>,
        status: Option<String>,
    ) -> AppResult<BailingScheduleModel> {
        let schedule = BailingSchedule::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: bailing_schedule::ActiveModel = schedule.into();
        if let Some(location) = location {
            active.location = Set(location);
        }
        if let Some(date) = date {
            active.date = Set(date);
        }
        if let Some(time) = time {
            active.time = Set(time);
        }
        if truck_name.is_some() {
            active.truck_name = Set(truck_name);
        }
        if let Some(status) = status {
            if !STATUSES.contains(&status.as_str()) {
                return Err(AppError::Validation(format!("Invalid status: {}", status)));
            }
            active.status = Set(status);
        }
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = BailingSchedule::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
