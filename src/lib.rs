//! # saferound-api
//!
//! Safety-monitoring backend for a social drinking-moderation app.
//!
//! The crate holds three independent components, none of which call each
//! other:
//!
//! - a Widmark BAC estimator ([`domain::bac`]), pure and deterministic;
//! - a drink validation gate ([`service::DrinkValidationService`]) that
//!   enforces a cut-off flag and a cooldown against a [`persistence::DrinkStore`];
//! - a sobriety scorer ([`service::SobrietyService`]) that asks a generative
//!   model through [`upstream::GenerativeClient`] and degrades to a
//!   BAC-based result when the model is unavailable.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── DrinkValidationService ── DrinkStore (persistence/)
//!     ├── SobrietyService ───────── GenerativeClient (upstream/)
//!     ├── BAC estimator (domain/)
//!     │
//!     └── PostgreSQL / in-memory store
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod upstream;
