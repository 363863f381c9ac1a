use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let auth = auth_routes(&rate_limit_config);
    let public_read = public_read_routes(&rate_limit_config);
    let protected =
        protected_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    auth.merge(public_read).merge(protected)
}

/// Auth routes: register, login, refresh.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/register", routing::post(handlers::register))
        .route("/auth/login", routing::post(handlers::login))
        .route(
            "/auth/refresh",
            routing::post(handlers::auth::refresh_token),
        );

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Public read routes: the map feed plus the informational lists the
/// frontend shows before login.
fn public_read_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Map feed
        .route("/map/reports", routing::get(handlers::report::map_reports))
        // Complaints
        .route(
            "/complaints",
            routing::get(handlers::complaint::list_complaints),
        )
        .route(
            "/complaints/{id}",
            routing::get(handlers::complaint::get_complaint),
        )
        // Announcements
        .route(
            "/announcements",
            routing::get(handlers::announcement::list_announcements),
        )
        // Bailing schedules
        .route(
            "/schedules",
            routing::get(handlers::schedule::list_schedules),
        )
        // Areas
        .route("/areas", routing::get(handlers::area::list_areas));

    with_optional_rate_limit(router, config.enabled, config.public_read)
}

/// Protected routes: authenticated resident actions plus the admin
/// surface (admin role is checked in each handler).
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Auth
        .route("/auth/me", routing::get(handlers::get_current_user))
        .route("/auth/logout", routing::post(handlers::auth::logout))
        .route(
            "/auth/profile",
            routing::put(handlers::auth::update_profile),
        )
        .route("/auth/password", routing::put(handlers::change_password))
        // Complaints
        .route(
            "/complaints",
            routing::post(handlers::complaint::submit_complaint),
        )
        // Reports
        .route("/reports", routing::post(handlers::report::submit_report))
        .route("/reports/mine", routing::get(handlers::report::my_reports))
        .route(
            "/reports/mine/detailed",
            routing::get(handlers::report::my_reports_detailed),
        )
        // Dashboard
        .route("/dashboard", routing::get(handlers::dashboard::user_dashboard))
        // Feedback
        .route(
            "/feedback",
            routing::post(handlers::feedback::create_feedback),
        )
        .route("/feedback/mine", routing::get(handlers::feedback::my_feedback))
        // Bills
        .route("/bills", routing::get(handlers::billing::my_bills))
        .route("/bills/{id}/pay", routing::post(handlers::billing::pay_bill))
        // Notifications
        .route(
            "/notifications",
            routing::get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            routing::get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            routing::put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            routing::put(handlers::notification::mark_read),
        )
        // Admin: dashboard
        .route(
            "/admin/dashboard",
            routing::get(handlers::dashboard::admin_dashboard),
        )
        // Admin: reports
        .route(
            "/admin/reports",
            routing::get(handlers::report::admin_list_reports),
        )
        .route(
            "/admin/reports/{id}/status",
            routing::put(handlers::report::update_report_status),
        )
        .route(
            "/admin/reports/{id}",
            routing::delete(handlers::report::delete_report),
        )
        // Admin: complaints
        .route(
            "/admin/complaints/{id}/status",
            routing::put(handlers::complaint::update_complaint_status),
        )
        .route(
            "/admin/complaints/{id}/approve",
            routing::put(handlers::complaint::approve_complaint),
        )
        .route(
            "/admin/complaints/{id}/resolve",
            routing::put(handlers::complaint::resolve_complaint),
        )
        .route(
            "/admin/complaints/{id}/assign",
            routing::put(handlers::complaint::assign_complaint),
        )
        .route(
            "/admin/complaints/{id}",
            routing::delete(handlers::complaint::delete_complaint),
        )
        // Admin: users
        .route(
            "/admin/users",
            routing::get(handlers::admin::list_users).post(handlers::admin::create_user),
        )
        .route(
            "/admin/users/{id}",
            routing::put(handlers::admin::update_user).delete(handlers::admin::delete_user),
        )
        // Admin: announcements
        .route(
            "/admin/announcements",
            routing::post(handlers::announcement::create_announcement),
        )
        .route(
            "/admin/announcements/{id}",
            routing::delete(handlers::announcement::delete_announcement),
        )
        // Admin: feedback
        .route(
            "/admin/feedback",
            routing::get(handlers::feedback::admin_list_feedback),
        )
        .route(
            "/admin/feedback/{id}",
            routing::put(handlers::feedback::update_feedback),
        )
        // Admin: bills
        .route(
            "/admin/bills",
            routing::get(handlers::billing::admin_list_bills).post(handlers::billing::create_bill),
        )
        // Admin: schedules
        .route(
            "/admin/schedules",
            routing::post(handlers::schedule::create_schedule),
        )
        .route(
            "/admin/schedules/{id}",
            routing::put(handlers::schedule::update_schedule)
                .delete(handlers::schedule::delete_schedule),
        )
        // Admin: activity log
        .route(
            "/admin/activity",
            routing::get(handlers::admin::list_activity),
        );

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
