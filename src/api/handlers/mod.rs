//! REST endpoint handlers organized by resource.

pub mod bac;
pub mod drink;
pub mod sobriety;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(bac::routes())
        .merge(drink::routes())
        .merge(sobriety::routes())
}
