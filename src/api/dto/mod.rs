//! Data Transfer Objects for REST request/response serialization.

pub mod bac_dto;
pub mod drink_dto;
pub mod sobriety_dto;

pub use bac_dto::*;
pub use drink_dto::*;
pub use sobriety_dto::*;
