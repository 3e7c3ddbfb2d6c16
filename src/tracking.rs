use crate::api::ApiClient;
use crate::models::{EntityType, Interaction, InteractionType};

pub const INTERACTIONS_ENDPOINT: &str = "/governance/interactions";

/// InteractionTracker
///
/// Best-effort analytics side channel. `track` never blocks and never fails the caller:
/// the post runs on a spawned task and its outcome is only logged at debug level.
#[derive(Clone)]
pub struct InteractionTracker {
    api: ApiClient,
}

impl InteractionTracker {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// track
    ///
    /// Fire-and-forget. Returns the task handle for callers that want to wait (tests);
    /// `None` when no tokio runtime is available, in which case the interaction is dropped.
    pub fn track(&self, interaction: Interaction) -> Option<tokio::task::JoinHandle<()>> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::debug!(?interaction, "No runtime, interaction dropped");
                return None;
            }
        };

        let api = self.api.clone();
        Some(runtime.spawn(async move {
            if let Err(e) = api.post(INTERACTIONS_ENDPOINT, &interaction).await {
                tracing::debug!(?interaction, "Interaction tracking failed: {}", e);
            }
        }))
    }

    pub fn view_tire(&self, tire_id: &str) {
        self.track(Interaction::new(InteractionType::View, EntityType::Tire, tire_id));
    }

    pub fn view_business(&self, business_id: &str) {
        self.track(Interaction::new(
            InteractionType::View,
            EntityType::Business,
            business_id,
        ));
    }

    pub fn compare_tire(&self, tire_id: &str) {
        self.track(Interaction::new(InteractionType::Compare, EntityType::Tire, tire_id));
    }

    /// Records a catalog search; the filters travel as metadata.
    pub fn search_tires(&self, filters: serde_json::Value) {
        self.track(
            Interaction::new(InteractionType::Search, EntityType::Tire, "search").with_metadata(filters),
        );
    }
}
