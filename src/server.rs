//! Router Assembly
//!
//! Shared application state and the full route table. Mutating routes pass
//! through the auth gate as a route layer; admin-only routes additionally
//! use the `AdminIdentity` extractor inside their handlers.

use crate::auth::{api as auth_api, auth_middleware, JwtHandler, UserStore};
use crate::inventory::{api as sweets_api, SweetStore};
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub sweets: SweetStore,
    pub jwt: Arc<JwtHandler>,
}

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth_api::register))
        .route("/login", post(auth_api::login))
        .route(
            "/change-password",
            post(auth_api::change_password).route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        );

    let sweets_routes = Router::new()
        .route("/", post(sweets_api::create_sweet).get(sweets_api::list_sweets))
        .route("/search", get(sweets_api::search_sweets))
        .route(
            "/:id",
            get(sweets_api::get_sweet)
                .put(sweets_api::update_sweet)
                .delete(sweets_api::delete_sweet),
        )
        .route("/:id/purchase", post(sweets_api::purchase_sweet))
        .route("/:id/restock", post(sweets_api::restock_sweet))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/sweets", sweets_routes)
        .layer(middleware::from_fn(crate::middleware::request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
