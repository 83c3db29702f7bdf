// Nominal (reference) session configuration per pump
use crate::application::history_service::DateRangeSelection;
use crate::application::spray_line_repository::SprayLineRepository;
use crate::domain::nominal::NominalSession;
use crate::domain::telemetry::PumpType;
use std::sync::Arc;

/// Every call answers with the pump's current list, which replaces whatever
/// was displayed. Failures answer with an empty list.
pub struct NominalSessionConfig {
    repository: Arc<dyn SprayLineRepository>,
}

impl NominalSessionConfig {
    pub fn new(repository: Arc<dyn SprayLineRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, pump_type: PumpType) -> Vec<NominalSession> {
        let outcome = self.repository.nominal_sessions(pump_type).await;
        Self::rows(pump_type, "/api/get_nominal_sessions", outcome)
    }

    /// Bounds are formatted like the history picker.
    pub async fn add(&self, pump_type: PumpType, range: DateRangeSelection) -> Vec<NominalSession> {
        let (start, end) = range.bounds();
        let outcome = self.repository.add_nominal_session(pump_type, &start, &end).await;
        if outcome.is_ok() {
            tracing::info!(%pump_type, %start, %end, "Nominal session added");
        }
        Self::rows(pump_type, "/api/add_new_nominal_session", outcome)
    }

    pub async fn remove(&self, pump_type: PumpType, id: u64) -> Vec<NominalSession> {
        let outcome = self.repository.remove_nominal_session(pump_type, id).await;
        if outcome.is_ok() {
            tracing::info!(%pump_type, id, "Nominal session removed");
        }
        Self::rows(pump_type, "/api/remove_nominal_session_by_id", outcome)
    }

    fn rows(
        pump_type: PumpType,
        endpoint: &'static str,
        outcome: anyhow::Result<Vec<NominalSession>>,
    ) -> Vec<NominalSession> {
        outcome.unwrap_or_else(|e| {
            tracing::warn!(endpoint, %pump_type, error = %e, "Nominal session request failed");
            Vec::new()
        })
    }
}
