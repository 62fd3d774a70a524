pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth::handlers as auth;
use crate::config::Config;
use crate::errors::AppError;
use crate::resume::extract::MAX_UPLOAD_BYTES;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::users::handlers as users;

/// Headroom for multipart boundaries and part headers on top of the file cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // User API
        .route(
            "/user-api/profile",
            get(users::handle_get_profile).put(users::handle_update_profile),
        )
        .route("/user-api", axum::routing::delete(users::handle_delete_account))
        // Google OAuth
        .route("/api/auth/google", get(auth::handle_google_login))
        .route(
            "/api/auth/google/callback",
            get(auth::handle_google_callback),
        )
        .route("/api/auth/logout", post(auth::handle_logout))
        // Resume API
        .route(
            "/resume-api/ats-score",
            post(resume::handle_ats_score)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .fallback(route_not_found)
        .with_state(state)
}

/// Credentialed CORS for the SPA origins of the current environment.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
