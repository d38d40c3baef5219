//! Domain layer: users, drink events, BAC estimation and sobriety types.
//!
//! Everything here is free of I/O. Constructors validate at the boundary so
//! the algorithms never see negative or non-finite quantities.

pub mod bac;
pub mod drink;
pub mod sobriety;
pub mod user;

pub use bac::{BacQuery, BacResult, BacTier, estimate};
pub use drink::DrinkEvent;
pub use sobriety::{JitterSample, SobrietyResult, SobrietyTelemetry, TypingTest};
pub use user::{BiologicalSex, User};
