use std::sync::Arc;

use acara_core::geo::Boundary;
use acara_core::moderation::ModerationService;
use acara_core::ports::EventStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub boundary: Arc<Boundary>,
    pub moderation: ModerationService,
    /// Proximity filter cutoff in kilometers.
    pub radius_km: f64,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EventStore>,
        boundary: Arc<Boundary>,
        moderation: ModerationService,
        radius_km: f64,
    ) -> Self {
        Self { store, boundary, moderation, radius_km }
    }
}
