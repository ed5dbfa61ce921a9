//! UI serving routes
//!
//! Serves the static HTML/JS shell. Screen layout is deliberately minimal;
//! the behavioral surface lives in the JSON API these pages call.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use riskwatch_common::domains::PredictionDomain;

const LOGIN_HTML: &str = include_str!("../../ui/login.html");
const DASHBOARD_HTML: &str = include_str!("../../ui/dashboard.html");
const PROFILE_HTML: &str = include_str!("../../ui/profile.html");
const HISTORY_HTML: &str = include_str!("../../ui/history.html");
const FORM_HTML: &str = include_str!("../../ui/form.html");
const ADMIN_HTML: &str = include_str!("../../ui/admin.html");
const APP_JS: &str = include_str!("../../ui/app.js");

/// GET /
///
/// The dashboard gate bounces anonymous visitors on to /login.
pub async fn serve_root() -> Redirect {
    Redirect::to("/dashboard")
}

/// GET /login
pub async fn serve_login() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

/// GET /dashboard
pub async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// GET /profile
pub async fn serve_profile() -> Html<&'static str> {
    Html(PROFILE_HTML)
}

/// GET /history
pub async fn serve_history() -> Html<&'static str> {
    Html(HISTORY_HTML)
}

/// GET /start/:domain
///
/// One shared shell; the form schema is fetched per domain by app.js. An
/// unknown slug gets its 404 here, not just from the later schema fetch.
pub async fn serve_form(Path(slug): Path<String>) -> Response {
    match PredictionDomain::from_slug(&slug) {
        Some(_) => Html(FORM_HTML).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /admin
pub async fn serve_admin() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}
