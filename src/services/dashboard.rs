use crate::{
    error::AppResult,
    models::{report, user, Report, ReportModel, User},
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Statement,
};

/// One row of a month-grouped count query. Months are 1-indexed as
/// produced by `date_part('month', ...)`.
#[derive(Debug, FromQueryResult)]
pub struct MonthCountRow {
    pub month: i32,
    pub count: i64,
}

/// Fold month-grouped rows into a 12-slot array, January at index 0.
/// Months absent from the input stay zero; out-of-range months are dropped.
pub fn monthly_histogram(rows: &[MonthCountRow]) -> [i64; 12] {
    let mut slots = [0i64; 12];
    for row in rows {
        if (1..=12).contains(&row.month) {
            slots[(row.month - 1) as usize] = row.count;
        }
    }
    slots
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_reports: u64,
    pub resolved_reports: u64,
    pub pending_reports: u64,
    pub in_progress_reports: u64,
    pub reports_per_month: [i64; 12],
    pub user_growth_per_month: [i64; 12],
    pub system_notifications: Vec<String>,
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct UserDashboard {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub recent_reports: Vec<ReportModel>,
}

pub struct DashboardService {
    db: DatabaseConnection,
}

impl DashboardService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Caller's own report counts plus their five most recent reports.
    pub async fn user_dashboard(&self, user_id: i32) -> AppResult<UserDashboard> {
        let mine = Report::find().filter(report::Column::ReporterId.eq(user_id));
        let total = mine.clone().count(&self.db).await?;
        let pending = mine
            .clone()
            .filter(report::Column::Status.eq("Pending"))
            .count(&self.db)
            .await?;
        let in_progress = mine
            .clone()
            .filter(report::Column::Status.eq("In Progress"))
            .count(&self.db)
            .await?;
        let resolved = mine
            .clone()
            .filter(report::Column::Status.eq("Resolved"))
            .count(&self.db)
            .await?;
        let recent_reports = mine
            .order_by_desc(report::Column::CreatedAt)
            .limit(5)
            .all(&self.db)
            .await?;

        Ok(UserDashboard {
            total,
            pending,
            in_progress,
            resolved,
            recent_reports,
        })
    }

    /// System-wide counts and current-year monthly histograms.
    pub async fn admin_stats(&self) -> AppResult<AdminStats> {
        let total_users = User::find().count(&self.db).await?;
        let total_reports = Report::find().count(&self.db).await?;
        let resolved_reports = Report::find()
            .filter(report::Column::Status.eq("Resolved"))
            .count(&self.db)
            .await?;
        let pending_reports = Report::find()
            .filter(report::Column::Status.eq("Pending"))
            .count(&self.db)
            .await?;
        let in_progress_reports = Report::find()
            .filter(report::Column::Status.eq("In Progress"))
            .count(&self.db)
            .await?;

        let reports_per_month =
            monthly_histogram(&self.month_counts("reports", "created_at").await?);
        let user_growth_per_month =
            monthly_histogram(&self.month_counts("users", "created_at").await?);

        let mut system_notifications = Vec::new();
        if let Some(latest_user) = User::find()
            .order_by_desc(user::Column::CreatedAt)
            .one(&self.db)
            .await?
        {
            system_notifications.push(format!("New user registered: {}", latest_user.username));
        }
        if let Some(latest_report) = Report::find()
            .order_by_desc(report::Column::CreatedAt)
            .one(&self.db)
            .await?
        {
            system_notifications.push(format!("New report received: {}", latest_report.title));
        }
        system_notifications.push("System check completed successfully.".to_string());

        Ok(AdminStats {
            total_users,
            total_reports,
            resolved_reports,
            pending_reports,
            in_progress_reports,
            reports_per_month,
            user_growth_per_month,
            system_notifications,
        })
    }

    /// Current-calendar-year rows grouped by creation month.
    /// Table and column names are compile-time constants, never user input.
    async fn month_counts(&self, table: &str, column: &str) -> AppResult<Vec<MonthCountRow>> {
        let sql = format!(
            "SELECT CAST(date_part('month', {col}) AS INT4) AS month, \
                    CAST(COUNT(*) AS INT8) AS count \
             FROM {table} \
             WHERE date_part('year', {col}) = date_part('year', CURRENT_TIMESTAMP) \
             GROUP BY 1",
            col = column,
            table = table,
        );
        let rows = MonthCountRow::find_by_statement(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            sql,
        ))
        .all(&self.db)
        .await?;
        Ok(rows)
    }
}
