// Repository trait for spraying line backend access
use crate::domain::alert::Alert;
use crate::domain::lifecycle::{LifecycleRecord, RecordKind, RecordState};
use crate::domain::maintenance::{MaintenanceStatus, MaintenanceTarget};
use crate::domain::nominal::NominalSession;
use crate::domain::telemetry::{LiveSnapshot, PumpType, TelemetryRecord};
use async_trait::async_trait;

#[async_trait]
pub trait SprayLineRepository: Send + Sync {
    /// Latest telemetry window with backend-computed totals
    async fn latest_snapshot(&self) -> anyhow::Result<LiveSnapshot>;

    async fn latest_alerts(&self) -> anyhow::Result<Vec<Alert>>;

    /// Full record set for a window; bounds are passed through verbatim
    async fn history(&self, start: &str, end: &str) -> anyhow::Result<Vec<TelemetryRecord>>;

    async fn maintenance(&self) -> anyhow::Result<MaintenanceStatus>;

    async fn set_maintenance(
        &self,
        new_value: i64,
        target: MaintenanceTarget,
        pump_type: PumpType,
    ) -> anyhow::Result<()>;

    async fn reset_maintenance(&self, target: MaintenanceTarget) -> anyhow::Result<()>;

    async fn list_records(&self, kind: RecordKind, state: RecordState) -> anyhow::Result<Vec<LifecycleRecord>>;

    /// Move a record from the active to the archived list
    async fn archive_record(&self, kind: RecordKind, id: u64) -> anyhow::Result<()>;

    /// Move a record from the archived back to the active list
    async fn restore_record(&self, kind: RecordKind, id: u64) -> anyhow::Result<()>;

    async fn set_record_comment(&self, kind: RecordKind, id: u64, comments: &str) -> anyhow::Result<()>;

    async fn nominal_sessions(&self, pump_type: PumpType) -> anyhow::Result<Vec<NominalSession>>;

    /// Returns the updated nominal list
    async fn add_nominal_session(
        &self,
        pump_type: PumpType,
        start: &str,
        end: &str,
    ) -> anyhow::Result<Vec<NominalSession>>;

    /// Returns the updated nominal list
    async fn remove_nominal_session(&self, pump_type: PumpType, id: u64) -> anyhow::Result<Vec<NominalSession>>;
}
