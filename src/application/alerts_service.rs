// Latest alerts feed
use crate::application::spray_line_repository::SprayLineRepository;
use crate::domain::alert::Alert;
use std::sync::Arc;

pub struct AlertFeed {
    repository: Arc<dyn SprayLineRepository>,
}

impl AlertFeed {
    pub fn new(repository: Arc<dyn SprayLineRepository>) -> Self {
        Self { repository }
    }

    /// Fetched on request; an unreachable backend reads as no alerts.
    pub async fn latest(&self) -> Vec<Alert> {
        match self.repository.latest_alerts().await {
            Ok(alerts) => alerts,
            Err(e) => {
                tracing::warn!(endpoint = "/api/get_latest_alerts", error = %e, "Alerts fetch failed");
                Vec::new()
            }
        }
    }
}
