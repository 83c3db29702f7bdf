// In-memory stand-in for the spraying line backend
use crate::application::spray_line_repository::SprayLineRepository;
use crate::domain::alert::Alert;
use crate::domain::lifecycle::{LifecycleRecord, RecordKind, RecordPayload, RecordState};
use crate::domain::maintenance::{MaintenanceStatus, MaintenanceTarget};
use crate::domain::nominal::NominalSession;
use crate::domain::telemetry::{LiveSnapshot, PumpType, TelemetryRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const DEFAULT_SPRAYGUN_DAYS: i64 = 45;
pub const DEFAULT_FILTER_DAYS: i64 = 21;

pub struct FakeRepository {
    state: Mutex<FakeState>,
    calls: Mutex<Vec<String>>,
    failing: AtomicBool,
    delay: Mutex<Duration>,
}

struct FakeState {
    snapshot: LiveSnapshot,
    history: Vec<TelemetryRecord>,
    alerts: Vec<Alert>,
    maintenance: HashMap<(MaintenanceTarget, PumpType), i64>,
    records: Vec<LifecycleRecord>,
    nominal: HashMap<PumpType, Vec<NominalSession>>,
}

impl Default for FakeRepository {
    fn default() -> Self {
        let mut maintenance = HashMap::new();
        for pump in [PumpType::Barrier, PumpType::Gelcoat] {
            maintenance.insert((MaintenanceTarget::Spraygun, pump), DEFAULT_SPRAYGUN_DAYS);
            maintenance.insert((MaintenanceTarget::Filter, pump), DEFAULT_FILTER_DAYS);
        }

        Self {
            state: Mutex::new(FakeState {
                snapshot: LiveSnapshot::default(),
                history: Vec::new(),
                alerts: Vec::new(),
                maintenance,
                records: Vec::new(),
                nominal: HashMap::new(),
            }),
            calls: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            delay: Mutex::new(Duration::ZERO),
        }
    }
}

pub fn session(id: u64, state: RecordState) -> LifecycleRecord {
    LifecycleRecord {
        id,
        start_time: "2024-03-01 01:00:00 PM".to_string(),
        end_time: "2024-03-01 01:05:00 PM".to_string(),
        comments: String::new(),
        state,
        payload: RecordPayload::Session {
            pump_type: "barrier".to_string(),
            avg_speed: 12.345,
            total_sprayed_amount: 1.5,
            avg_pressure: Some(2.0),
        },
    }
}

pub fn product(id: u64, state: RecordState) -> LifecycleRecord {
    LifecycleRecord {
        id,
        start_time: "2024-03-01 01:00:00 PM".to_string(),
        end_time: "2024-03-01 01:30:00 PM".to_string(),
        comments: String::new(),
        state,
        payload: RecordPayload::Product {
            gelcoat_material: 3.0,
            barrier_material: 1.25,
        },
    }
}

impl FakeRepository {
    pub fn with_records(records: Vec<LifecycleRecord>) -> Self {
        let repository = Self::default();
        repository.state.lock().unwrap().records = records;
        repository
    }

    pub fn set_snapshot(&self, snapshot: LiveSnapshot) {
        self.state.lock().unwrap().snapshot = snapshot;
    }

    pub fn set_history(&self, records: Vec<TelemetryRecord>) {
        self.state.lock().unwrap().history = records;
    }

    pub fn set_alerts(&self, alerts: Vec<Alert>) {
        self.state.lock().unwrap().alerts = alerts;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.starts_with(prefix)).count()
    }

    async fn enter(&self, call: String) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call.clone());
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("{} failed: backend unreachable", call);
        }
        Ok(())
    }

    fn transition(&self, kind: RecordKind, id: u64, state: RecordState) {
        let mut fake = self.state.lock().unwrap();
        if let Some(record) = fake.records.iter_mut().find(|r| r.kind() == kind && r.id == id) {
            record.state = state;
        }
    }
}

#[async_trait]
impl SprayLineRepository for FakeRepository {
    async fn latest_snapshot(&self) -> anyhow::Result<LiveSnapshot> {
        self.enter("latest_snapshot".to_string()).await?;
        Ok(self.state.lock().unwrap().snapshot.clone())
    }

    async fn latest_alerts(&self) -> anyhow::Result<Vec<Alert>> {
        self.enter("latest_alerts".to_string()).await?;
        Ok(self.state.lock().unwrap().alerts.clone())
    }

    async fn history(&self, start: &str, end: &str) -> anyhow::Result<Vec<TelemetryRecord>> {
        self.enter(format!("history {start} .. {end}")).await?;
        Ok(self.state.lock().unwrap().history.clone())
    }

    async fn maintenance(&self) -> anyhow::Result<MaintenanceStatus> {
        self.enter("maintenance".to_string()).await?;
        let fake = self.state.lock().unwrap();
        let least = |target: MaintenanceTarget| {
            fake.maintenance
                .iter()
                .filter(|((t, _), _)| *t == target)
                .map(|(_, days)| *days)
                .min()
        };
        Ok(MaintenanceStatus {
            spraygun_days_left: least(MaintenanceTarget::Spraygun),
            filter_days_left: least(MaintenanceTarget::Filter),
        })
    }

    async fn set_maintenance(
        &self,
        new_value: i64,
        target: MaintenanceTarget,
        pump_type: PumpType,
    ) -> anyhow::Result<()> {
        self.enter(format!("set_maintenance {target} {pump_type} {new_value}")).await?;
        self.state
            .lock()
            .unwrap()
            .maintenance
            .insert((target, pump_type), new_value);
        Ok(())
    }

    async fn reset_maintenance(&self, target: MaintenanceTarget) -> anyhow::Result<()> {
        self.enter(format!("reset_maintenance {target}")).await?;
        let days = match target {
            MaintenanceTarget::Spraygun => DEFAULT_SPRAYGUN_DAYS,
            MaintenanceTarget::Filter => DEFAULT_FILTER_DAYS,
        };
        let mut fake = self.state.lock().unwrap();
        for pump in [PumpType::Barrier, PumpType::Gelcoat] {
            fake.maintenance.insert((target, pump), days);
        }
        Ok(())
    }

    async fn list_records(&self, kind: RecordKind, state: RecordState) -> anyhow::Result<Vec<LifecycleRecord>> {
        self.enter(format!("list {kind} {state}")).await?;
        let fake = self.state.lock().unwrap();
        let mut listed: Vec<_> = fake
            .records
            .iter()
            .filter(|r| r.kind() == kind && r.state == state)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(listed)
    }

    async fn archive_record(&self, kind: RecordKind, id: u64) -> anyhow::Result<()> {
        self.enter(format!("archive {kind} {id}")).await?;
        self.transition(kind, id, RecordState::Archived);
        Ok(())
    }

    async fn restore_record(&self, kind: RecordKind, id: u64) -> anyhow::Result<()> {
        self.enter(format!("restore {kind} {id}")).await?;
        self.transition(kind, id, RecordState::Active);
        Ok(())
    }

    async fn set_record_comment(&self, kind: RecordKind, id: u64, comments: &str) -> anyhow::Result<()> {
        self.enter(format!("comment {kind} {id}")).await?;
        let mut fake = self.state.lock().unwrap();
        if let Some(record) = fake.records.iter_mut().find(|r| r.kind() == kind && r.id == id) {
            record.comments = comments.to_string();
        }
        Ok(())
    }

    async fn nominal_sessions(&self, pump_type: PumpType) -> anyhow::Result<Vec<NominalSession>> {
        self.enter(format!("nominal {pump_type}")).await?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .nominal
            .get(&pump_type)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_nominal_session(
        &self,
        pump_type: PumpType,
        start: &str,
        end: &str,
    ) -> anyhow::Result<Vec<NominalSession>> {
        self.enter(format!("add_nominal {pump_type} {start} .. {end}")).await?;
        let mut fake = self.state.lock().unwrap();
        let sessions = fake.nominal.entry(pump_type).or_default();
        let id = sessions.len() as u64 + 1;
        sessions.push(NominalSession {
            id,
            start_date: start.to_string(),
            end_date: end.to_string(),
            time_added: "2024-03-01 02:00:00 PM".to_string(),
        });
        Ok(sessions.clone())
    }

    async fn remove_nominal_session(&self, pump_type: PumpType, id: u64) -> anyhow::Result<Vec<NominalSession>> {
        self.enter(format!("remove_nominal {pump_type} {id}")).await?;
        let mut fake = self.state.lock().unwrap();
        let sessions = fake.nominal.entry(pump_type).or_default();
        sessions.retain(|s| s.id != id);
        Ok(sessions.clone())
    }
}
