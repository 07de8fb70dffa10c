// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, course, exam},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public routes: course list/detail, login, logout, registration.
/// * Protected routes (enroll, submit, result) sit behind the auth
///   middleware, which bounces anonymous requests back to the index.
/// * Applies global middleware (Trace, CORS) and injects the app state.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let protected_routes = Router::new()
        .route("/{course_id}/enroll", get(course::enroll))
        .route("/{course_id}/submit", post(exam::submit))
        .route(
            "/course/{course_id}/submission/{submission_id}/result",
            get(exam::show_exam_result),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(course::list_courses))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route(
            "/registration",
            get(auth::show_registration).post(auth::register),
        )
        .route("/{course_id}", get(course::get_course))
        .merge(protected_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
