//! riskwatch-web library - the RiskWatch HTTP service
//!
//! Hosts the prediction submission pipeline behind session-gated routes:
//! login/signup, schema-driven prediction forms, the submission pipeline
//! (inference call, risk classification, audit record write), and the
//! per-user prediction history.

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use riskwatch_common::config::Config;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod services;

/// Default timeout for calls to inference and geolocation endpoints
const HTTP_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared HTTP client for inference and geolocation calls
    pub http: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    ///
    /// Builds the outbound HTTP client with an explicit timeout so a stuck
    /// inference endpoint cannot pin a submission forever.
    pub fn new(db: SqlitePool, config: Config) -> riskwatch_common::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("RiskWatch/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_CLIENT_TIMEOUT)
            .build()
            .map_err(|e| riskwatch_common::Error::Config(format!("outbound HTTP client: {}", e)))?;

        Ok(Self {
            db,
            http,
            config: Arc::new(config),
        })
    }
}

/// Build application router
///
/// Route groups:
/// - public: login page, auth API, health endpoint, static assets
/// - authenticated pages: redirect to `/login` when no session is present
/// - privileged pages: additionally require the configured admin email,
///   redirecting authenticated non-admins to `/dashboard`
/// - authenticated API: respond 401 instead of redirecting
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/schema/:domain", get(api::predict::get_schema))
        .route("/api/predict/:domain", post(api::predict::submit))
        .route("/api/history", get(api::history::get_history));

    let auth_api = Router::new()
        .route("/api/auth/signup", post(api::auth::signup))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/logout", post(api::auth::logout));

    let admin_pages = Router::new()
        .route("/admin", get(api::ui::serve_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::require_admin,
        ));

    let gated_pages = Router::new()
        .route("/dashboard", get(api::ui::serve_dashboard))
        .route("/profile", get(api::ui::serve_profile))
        .route("/history", get(api::ui::serve_history))
        .route("/start/:domain", get(api::ui::serve_form))
        .route_layer(middleware::from_fn(api::auth::require_auth));

    let public = Router::new()
        .route("/", get(api::ui::serve_root))
        .route("/login", get(api::ui::serve_login))
        .route("/static/app.js", get(api::ui::serve_app_js))
        .merge(api::health::health_routes());

    Router::new()
        .merge(api)
        .merge(auth_api)
        .merge(admin_pages)
        .merge(gated_pages)
        .merge(public)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::session_loader,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
