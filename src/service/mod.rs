//! Service layer: the policy and assessment components.
//!
//! Each service receives its collaborators (store, upstream client) at
//! construction. Validation and assessment keep no mutable state of their
//! own, so one instance is shared across all concurrent requests.

pub mod drink_validation;
pub mod guardian;
pub mod sobriety;

pub use drink_validation::{DenialReason, DrinkValidationService, OutcomeCode, ValidationOutcome};
pub use guardian::GuardianNotifier;
pub use sobriety::SobrietyService;
