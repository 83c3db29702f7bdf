// Spraygun and filter maintenance countdowns
use crate::application::polling::PollingTask;
use crate::application::spray_line_repository::SprayLineRepository;
use crate::domain::maintenance::{MaintenanceStatus, MaintenanceTarget};
use crate::domain::telemetry::PumpType;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Both countdowns, always shown together.
///
/// Every mutation is followed by a fetch of both values. An explicit fetch
/// that fails clears the counters; a failed background poll leaves them as
/// they were.
pub struct MaintenanceCounter {
    repository: Arc<dyn SprayLineRepository>,
    status: watch::Sender<MaintenanceStatus>,
    poller: Mutex<Option<PollingTask>>,
}

impl MaintenanceCounter {
    pub fn new(repository: Arc<dyn SprayLineRepository>) -> Arc<Self> {
        let (status, _) = watch::channel(MaintenanceStatus::default());
        Arc::new(Self {
            repository,
            status,
            poller: Mutex::new(None),
        })
    }

    pub fn status(&self) -> MaintenanceStatus {
        *self.status.borrow()
    }

    pub async fn refresh(&self) -> MaintenanceStatus {
        match self.repository.maintenance().await {
            Ok(status) => {
                self.status.send_replace(status);
            }
            Err(e) => {
                tracing::warn!(endpoint = "/api/get_maintenance", error = %e, "Maintenance fetch failed");
                self.status.send_replace(MaintenanceStatus::default());
            }
        }
        self.status()
    }

    /// Values are forwarded unchecked; the backend owns validation.
    pub async fn set(&self, new_value: i64, target: MaintenanceTarget, pump_type: PumpType) -> MaintenanceStatus {
        match self.repository.set_maintenance(new_value, target, pump_type).await {
            Ok(()) => tracing::info!(%target, %pump_type, new_value, "Maintenance counter set"),
            Err(e) => tracing::warn!(%target, %pump_type, error = %e, "Setting maintenance counter failed"),
        }
        self.refresh().await
    }

    pub async fn reset_to_default(&self, target: MaintenanceTarget) -> MaintenanceStatus {
        match self.repository.reset_maintenance(target).await {
            Ok(()) => tracing::info!(%target, "Maintenance counter reset"),
            Err(e) => tracing::warn!(%target, error = %e, "Resetting maintenance counter failed"),
        }
        self.refresh().await
    }

    /// Keep the counters fresh on a fixed cadence until [`Self::stop_refresh`].
    pub fn start_refresh(self: &Arc<Self>, interval: Duration) {
        let mut poller = self.poller.lock().unwrap_or_else(PoisonError::into_inner);
        if poller.is_some() {
            return;
        }

        let repository = self.repository.clone();
        let counter = Arc::downgrade(self);
        *poller = Some(PollingTask::start(
            "maintenance",
            interval,
            move || {
                let repository = repository.clone();
                async move { repository.maintenance().await }
            },
            move |status| {
                if let Some(counter) = counter.upgrade() {
                    counter.status.send_replace(status);
                }
            },
        ));
    }

    pub fn stop_refresh(&self) {
        let poller = self.poller.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(poller) = poller {
            poller.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_repository::{FakeRepository, DEFAULT_FILTER_DAYS, DEFAULT_SPRAYGUN_DAYS};

    #[tokio::test]
    async fn test_set_filter_is_reflected_after_refetch() {
        let repository = Arc::new(FakeRepository::default());
        let counter = MaintenanceCounter::new(repository.clone());

        let status = counter.set(10, MaintenanceTarget::Filter, PumpType::Barrier).await;

        assert_eq!(status.filter_days_left, Some(10));
        assert_eq!(status.spraygun_days_left, Some(DEFAULT_SPRAYGUN_DAYS));
        assert_eq!(
            repository.calls(),
            vec!["set_maintenance filter barrier 10".to_string(), "maintenance".to_string()]
        );
    }

    #[tokio::test]
    async fn test_reset_restores_default() {
        let repository = Arc::new(FakeRepository::default());
        let counter = MaintenanceCounter::new(repository);

        counter.set(3, MaintenanceTarget::Spraygun, PumpType::Gelcoat).await;
        assert_eq!(counter.status().spraygun_days_left, Some(3));

        let status = counter.reset_to_default(MaintenanceTarget::Spraygun).await;
        assert_eq!(status, MaintenanceStatus::new(DEFAULT_SPRAYGUN_DAYS, DEFAULT_FILTER_DAYS));
    }

    #[tokio::test]
    async fn test_failed_fetch_clears_counters() {
        let repository = Arc::new(FakeRepository::default());
        let counter = MaintenanceCounter::new(repository.clone());
        counter.refresh().await;
        assert!(counter.status().filter_days_left.is_some());

        repository.set_failing(true);
        assert_eq!(counter.refresh().await, MaintenanceStatus::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_refresh_runs_on_cadence() {
        let repository = Arc::new(FakeRepository::default());
        let counter = MaintenanceCounter::new(repository.clone());

        counter.start_refresh(Duration::from_secs(60));
        counter.start_refresh(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(130)).await;
        assert_eq!(repository.call_count("maintenance"), 3);
        assert_eq!(counter.status().filter_days_left, Some(DEFAULT_FILTER_DAYS));

        counter.stop_refresh();
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(repository.call_count("maintenance"), 3);
    }
}
