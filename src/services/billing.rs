use crate::{
    error::{AppError, AppResult},
    models::{water_bill, WaterBill, WaterBillModel},
};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, prelude::Decimal,
};

pub struct BillingService {
    db: DatabaseConnection,
}

impl BillingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn bills_for_user(&self, user_id: i32) -> AppResult<Vec<WaterBillModel>> {
        let rows = WaterBill::find()
            .filter(water_bill::Column::UserId.eq(user_id))
            .order_by_desc(water_bill::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Mark a bill paid through the simulated GCash flow. Scoped to the
    /// owner; paying someone else's bill is a 404, not a 403.
    pub async fn pay(&self, bill_id: i32, user_id: i32) -> AppResult<WaterBillModel> {
        let bill = WaterBill::find_by_id(bill_id)
            .filter(water_bill::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        if bill.status == "Paid" {
            return Err(AppError::Validation("Bill is already paid".to_string()));
        }

        let reference_no = format!("TXN-{}", rand::thread_rng().gen_range(100000..=999999));

        let mut active: water_bill::ActiveModel = bill.into();
        active.status = Set("Paid".to_string());
        active.payment_method = Set(Some("GCash".to_string()));
        active.reference_no = Set(Some(reference_no));
        active.date_paid = Set(Some(chrono::Utc::now().naive_utc()));
        Ok(active.update(&self.db).await?)
    }

    pub async fn create(
        &self,
        user_id: i32,
        amount: Decimal,
        month: String,
        year: i32,
    ) -> AppResult<WaterBillModel> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        let new_bill = water_bill::ActiveModel {
            user_id: Set(user_id),
            amount: Set(amount),
            month: Set(month),
            year: Set(year),
            status: Set("Unpaid".to_string()),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(new_bill.insert(&self.db).await?)
    }

    pub async fn list_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<WaterBillModel>, u64)> {
        let paginator = WaterBill::find()
            .order_by_desc(water_bill::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }
}
