// ============================
// bookshelf-backend-lib/src/router.rs
// ============================
//! HTTP router and middleware wiring.
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::handlers;
use crate::middleware::{authorize, identify};
use crate::AppState;

/// Create the application router.
///
/// The identity filter runs first and only ever annotates the request; the
/// policy gate runs second and is the sole place a request is rejected for
/// authentication reasons.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/books", get(handlers::books::list_books))
        .route("/api/v1/books/{id}", get(handlers::books::get_book))
        .route("/api/v1/ratings", post(handlers::ratings::create_rating))
        .route("/api/v1/private/user", get(handlers::users::current_profile))
        .route(
            "/api/v1/private/user/books",
            post(handlers::users::add_read_book).delete(handlers::users::remove_read_book),
        )
        // layers run outermost-last: trace/cors, then identify, then
        // authorize, then the handler
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .layer(middleware::from_fn_with_state(state.clone(), identify))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe
async fn health() -> &'static str {
    "ok"
}
