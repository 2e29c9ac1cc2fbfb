//! HTTP routes.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │  public                         staff/admin token                        │
//! │  ──────                         ─────────────────                        │
//! │  GET  /health                                                            │
//! │  GET  /cafes, /cafes/{id}                                                │
//! │  GET  /products, /products/{id}  POST /products, PUT/DELETE /products/{id}│
//! │  GET  /promotional-cards         POST, PUT/DELETE /promotional-cards/{id}│
//! │  GET  /app-config                PUT /app-config                         │
//! │  GET  /video-presets             POST, PUT/DELETE /video-presets/{id}    │
//! │  POST /auth/register, /auth/login                                        │
//! │  POST /promo-codes/validate                                              │
//! │  POST /orders (token optional)   PUT /orders/{id}/status                 │
//! │  GET  /orders/{id}                                                       │
//! │  GET  /orders?userId= (own token or staff), ?cafeId= (staff)             │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod app_config;
pub mod auth;
pub mod cafes;
pub mod health;
pub mod orders;
pub mod products;
pub mod promo_cards;
pub mod promo_codes;
pub mod video_presets;

/// Builds the full router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/cafes", get(cafes::list))
        .route("/cafes/{id}", get(cafes::get))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get).put(products::update).delete(products::delete),
        )
        .route(
            "/promotional-cards",
            get(promo_cards::list).post(promo_cards::create),
        )
        .route(
            "/promotional-cards/{id}",
            put(promo_cards::update).delete(promo_cards::delete),
        )
        .route("/app-config", get(app_config::get).put(app_config::save))
        .route(
            "/video-presets",
            get(video_presets::list).post(video_presets::create),
        )
        .route(
            "/video-presets/{id}",
            put(video_presets::update).delete(video_presets::delete),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/promo-codes/validate", post(promo_codes::validate))
        .route("/orders", get(orders::list).post(orders::submit))
        .route("/orders/{id}", get(orders::get))
        .route("/orders/{id}/status", put(orders::update_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
