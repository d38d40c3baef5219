//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::SobrietyConfig;
use crate::persistence::DrinkStore;
use crate::service::{DrinkValidationService, GuardianNotifier, SobrietyService};
use crate::upstream::GenerativeClient;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Cooldown and cut-off policy gate.
    pub drink_validation: Arc<DrinkValidationService>,
    /// AI-assisted sobriety scorer.
    pub sobriety: Arc<SobrietyService>,
    /// Guardian notification counter.
    pub guardian: Arc<GuardianNotifier>,
}

impl AppState {
    /// Wires the services from their injected collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn DrinkStore>,
        client: Arc<dyn GenerativeClient>,
        sobriety_config: &SobrietyConfig,
        cooldown_seconds: i64,
    ) -> Self {
        Self {
            drink_validation: Arc::new(DrinkValidationService::new(store, cooldown_seconds)),
            sobriety: Arc::new(SobrietyService::new(client, sobriety_config)),
            guardian: Arc::new(GuardianNotifier::new()),
        }
    }
}
