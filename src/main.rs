mod config;
mod error;
mod handlers;
mod middleware;
mod migration;
mod models;
mod response;
mod routes;
mod services;
mod utils;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use services::upload::UploadConfig;
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Auth routes
        crate::handlers::register,
        crate::handlers::login,
        crate::handlers::auth::refresh_token,
        crate::handlers::get_current_user,
        crate::handlers::auth::update_profile,
        crate::handlers::change_password,
        crate::handlers::auth::logout,
        // Complaint routes
        crate::handlers::complaint::submit_complaint,
        crate::handlers::complaint::list_complaints,
        crate::handlers::complaint::get_complaint,
        crate::handlers::complaint::update_complaint_status,
        crate::handlers::complaint::approve_complaint,
        crate::handlers::complaint::resolve_complaint,
        crate::handlers::complaint::assign_complaint,
        crate::handlers::complaint::delete_complaint,
        // Report routes
        crate::handlers::report::submit_report,
        crate::handlers::report::map_reports,
        crate::handlers::report::my_reports,
        crate::handlers::report::my_reports_detailed,
        crate::handlers::report::admin_list_reports,
        crate::handlers::report::update_report_status,
        crate::handlers::report::delete_report,
        // Dashboard routes
        crate::handlers::dashboard::user_dashboard,
        crate::handlers::dashboard::admin_dashboard,
        // Announcement routes
        crate::handlers::announcement::list_announcements,
        crate::handlers::announcement::create_announcement,
        crate::handlers::announcement::delete_announcement,
        // Feedback routes
        crate::handlers::feedback::create_feedback,
        crate::handlers::feedback::my_feedback,
        crate::handlers::feedback::admin_list_feedback,
        crate::handlers::feedback::update_feedback,
        // Billing routes
        crate::handlers::billing::my_bills,
        crate::handlers::billing::pay_bill,
        crate::handlers::billing::create_bill,
        crate::handlers::billing::admin_list_bills,
        // Notification routes
        crate::handlers::notification::list_notifications,
        crate::handlers::notification::unread_count,
        crate::handlers::notification::mark_all_read,
        crate::handlers::notification::mark_read,
        // Schedule routes
        crate::handlers::schedule::list_schedules,
        crate::handlers::schedule::create_schedule,
        crate::handlers::schedule::update_schedule,
        crate::handlers::schedule::delete_schedule,
        // Area routes
        crate::handlers::area::list_areas,
        // Admin user routes
        crate::handlers::admin::list_users,
        crate::handlers::admin::create_user,
        crate::handlers::admin::update_user,
        crate::handlers::admin::delete_user,
        crate::handlers::admin::list_activity,
    ),
    components(
        schemas(
            crate::response::ApiResponse<serde_json::Value>,
            crate::response::PaginatedResponse<serde_json::Value>,
            crate::response::PaginationQuery,
            crate::error::AppError,
            // Auth
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::RefreshTokenRequest,
            crate::handlers::auth::AuthResponse,
            crate::handlers::auth::TokenResponse,
            crate::handlers::auth::UserResponse,
            crate::handlers::auth::UpdateProfileRequest,
            crate::handlers::auth::ChangePasswordRequest,
            // Complaint
            crate::handlers::complaint::ComplaintFeedEntry,
            crate::handlers::complaint::ComplaintFeedResponse,
            crate::handlers::complaint::UpdateComplaintStatusRequest,
            crate::handlers::complaint::AssignComplaintRequest,
            // Report
            crate::handlers::report::MapReportEntry,
            crate::handlers::report::MyReportEntry,
            crate::handlers::report::MyReportDetailEntry,
            crate::handlers::report::MyReportsDetailResponse,
            crate::handlers::report::AdminReportEntry,
            crate::handlers::report::UpdateReportStatusRequest,
            // Dashboard
            crate::services::dashboard::AdminStats,
            crate::services::dashboard::UserDashboard,
            // Announcement
            crate::handlers::announcement::CreateAnnouncementRequest,
            // Feedback
            crate::handlers::feedback::CreateFeedbackRequest,
            crate::handlers::feedback::AdminFeedbackEntry,
            crate::handlers::feedback::AdminFeedbackResponse,
            crate::handlers::feedback::UpdateFeedbackRequest,
            crate::services::feedback::FeedbackSummary,
            // Billing
            crate::handlers::billing::CreateBillRequest,
            // Notification
            crate::handlers::notification::UnreadCountResponse,
            // Schedule
            crate::handlers::schedule::CreateScheduleRequest,
            crate::handlers::schedule::UpdateScheduleRequest,
            // Admin
            crate::handlers::admin::CreateUserRequest,
            crate::handlers::admin::UpdateUserRequest,
            crate::handlers::admin::ActivityEntry,
        )
    ),
    tags(
        (name = "auth", description = "Authentication operations"),
        (name = "complaints", description = "Resident complaint operations"),
        (name = "reports", description = "Water issue report operations"),
        (name = "dashboard", description = "Dashboard statistics"),
        (name = "announcements", description = "Public announcements"),
        (name = "feedback", description = "Service feedback operations"),
        (name = "bills", description = "Water bill operations"),
        (name = "notifications", description = "Notification operations"),
        (name = "schedules", description = "Water bailing schedules"),
        (name = "areas", description = "Service area listings"),
        (name = "admin", description = "Administrative operations"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubig_tracker=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration before doing anything else
    let jwt_config = validate_config()?;

    // Initialize JWT config
    utils::jwt::init_jwt_config(jwt_config)?;

    tracing::info!("Starting Tubig Tracker API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database().await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());
    let upload_config = UploadConfig {
        media_root: media_root.clone(),
    };

    let app = create_app(&media_root)
        .layer(Extension(db))
        .layer(Extension(upload_config));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<crate::config::jwt::JwtConfig> {
    // JWT config — validated and cached
    let jwt_config = config::jwt::JwtConfig::from_env()?;

    // DATABASE_URL — checked here for early error; actual connection happens later
    if env::var("DATABASE_URL").is_err() {
        return Err(anyhow::anyhow!(
            "DATABASE_URL environment variable must be set"
        ));
    }

    // Media directory — create if needed
    let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());
    std::fs::create_dir_all(&media_root)
        .map_err(|e| anyhow::anyhow!("Failed to create media directory '{}': {}", media_root, e))?;

    Ok(jwt_config)
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app(media_root: &str) -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/media", ServeDir::new(media_root))
        .layer(axum::middleware::from_fn(
            middleware::security::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "Tubig Tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
