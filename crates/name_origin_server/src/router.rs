//! Router construction for the name-origin server.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use name_origin_core::OriginService;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::AuthConfig;
use crate::handlers;

/// Build the full axum router with all routes and middleware.
///
/// Protected handlers authenticate through their `Principal` argument rather
/// than a route layer, so query validation can run first.
pub fn build_router(service: Arc<OriginService>, auth: AuthConfig) -> Router {
    Router::new()
        .route("/token", post(handlers::token::issue_token))
        .route("/health", get(handlers::health::health))
        .route("/names", get(handlers::names::get_name_origin))
        .route("/names/", get(handlers::names::get_name_origin))
        .route("/popular-names", get(handlers::popular::get_popular_names))
        .route("/popular-names/", get(handlers::popular::get_popular_names))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(Extension(service))
                .layer(Extension(auth)),
        )
}
