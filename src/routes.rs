// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{attempt, auth, dashboard, exam, health},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Builds the CORS layer. No configured origins means any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}

/// Assembles the main application router.
///
/// * Public routes: health, signup, login, token verification.
/// * Protected routes (exams, attempts, dashboards) sit behind `auth_middleware`;
///   role checks happen in the engine via the resolved `Caller`.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/verify-token", get(auth::verify_token));

    let protected_routes = Router::new()
        .route("/exams", post(exam::create_exam))
        .route("/exams/{exam_id}", get(exam::get_exam))
        .route("/exams/{exam_id}/start", post(attempt::start_attempt))
        .route("/exams/{exam_id}/attempt", get(attempt::get_attempt))
        .route("/attempts/{attempt_id}/submit", post(attempt::submit_attempt))
        .route("/dashboard/admin", get(dashboard::admin_dashboard))
        .route("/dashboard/student", get(dashboard::student_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_routes = Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .nest("/api", api_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
