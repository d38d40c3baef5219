//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! Endpoints are mounted at the root, e.g. `/bac/estimate`.

pub mod doc;
pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes())
}
