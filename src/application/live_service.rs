// Live telemetry pages - polling-driven chart frames tied to viewer lifetime
use crate::application::chart_builder::{build_chart, ChartProfile, PanelSpec};
use crate::application::polling::PollingTask;
use crate::application::rollover::DailyRolloverTimer;
use crate::application::spray_line_repository::SprayLineRepository;
use crate::application::transform::transform_all;
use crate::domain::chart::ChartConfig;
use crate::domain::telemetry::LiveSnapshot;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct LivePageSpec {
    pub name: String,
    pub interval: Duration,
    pub profile: ChartProfile,
    pub panels: Vec<PanelSpec>,
    pub show_totals: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveTotals {
    pub barrier_quantity: Option<f64>,
    pub gelcoat_quantity: Option<f64>,
    pub pressure: Option<f64>,
}

/// Everything a renderer needs to draw one live page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveFrame {
    pub page: String,
    pub today: NaiveDate,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub charts: Vec<ChartConfig>,
    pub totals: Option<LiveTotals>,
}

#[derive(Clone)]
pub struct LivePage {
    inner: Arc<LivePageInner>,
}

struct LivePageInner {
    spec: LivePageSpec,
    repository: Arc<dyn SprayLineRepository>,
    frames: watch::Sender<LiveFrame>,
    activity: Mutex<Activity>,
}

#[derive(Default)]
struct Activity {
    mounts: usize,
    poller: Option<PollingTask>,
    rollover: Option<DailyRolloverTimer>,
}

/// Keeps the page mounted; dropping the last guard tears down its timers.
pub struct MountGuard {
    inner: Arc<LivePageInner>,
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.inner.unmount();
    }
}

impl LivePage {
    pub fn new(spec: LivePageSpec, repository: Arc<dyn SprayLineRepository>) -> Self {
        let (frames, _) = watch::channel(LiveFrame {
            page: spec.name.clone(),
            today: Local::now().date_naive(),
            refreshed_at: None,
            charts: Vec::new(),
            totals: None,
        });

        Self {
            inner: Arc::new(LivePageInner {
                spec,
                repository,
                frames,
                activity: Mutex::new(Activity::default()),
            }),
        }
    }

    pub fn mount(&self) -> MountGuard {
        self.inner.mount();
        MountGuard {
            inner: self.inner.clone(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveFrame> {
        self.inner.frames.subscribe()
    }

    /// Last applied frame; empty charts until the first successful poll.
    pub fn current(&self) -> LiveFrame {
        self.inner.frames.borrow().clone()
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.inner.activity().mounts > 0
    }
}

impl LivePageInner {
    fn activity(&self) -> MutexGuard<'_, Activity> {
        self.activity.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mount(self: &Arc<Self>) {
        let mut activity = self.activity();
        activity.mounts += 1;
        if activity.mounts > 1 {
            return;
        }

        activity.poller = Some(self.start_polling());
        activity.rollover = Some(Self::arm_rollover(Arc::downgrade(self)));
        tracing::info!(page = %self.spec.name, "Live page mounted");
    }

    fn unmount(&self) {
        let mut activity = self.activity();
        activity.mounts = activity.mounts.saturating_sub(1);
        if activity.mounts > 0 {
            return;
        }

        if let Some(poller) = activity.poller.take() {
            poller.cancel();
        }
        if let Some(rollover) = activity.rollover.take() {
            rollover.cancel();
        }
        tracing::info!(page = %self.spec.name, "Live page unmounted");
    }

    fn start_polling(self: &Arc<Self>) -> PollingTask {
        let repository = self.repository.clone();
        let page = Arc::downgrade(self);
        PollingTask::start(
            self.spec.name.clone(),
            self.spec.interval,
            move || {
                let repository = repository.clone();
                async move { repository.latest_snapshot().await }
            },
            move |snapshot| {
                if let Some(page) = page.upgrade() {
                    page.apply(snapshot);
                }
            },
        )
    }

    fn apply(&self, snapshot: LiveSnapshot) {
        let metrics: Vec<_> = self.spec.panels.iter().map(|panel| panel.metric).collect();
        let charts: Vec<ChartConfig> = transform_all(&snapshot.data, &metrics)
            .iter()
            .zip(&self.spec.panels)
            .map(|(series, panel)| build_chart(series, panel, &self.spec.profile))
            .collect();

        let totals = self.spec.show_totals.then(|| LiveTotals {
            barrier_quantity: snapshot.total_weight_barr,
            gelcoat_quantity: snapshot.total_weight_gel,
            pressure: snapshot.pressure,
        });

        tracing::debug!(page = %self.spec.name, records = snapshot.data.len(), "Applying live snapshot");
        self.frames.send_modify(|frame| {
            frame.charts = charts;
            frame.totals = totals;
            frame.refreshed_at = Some(Utc::now());
        });
    }

    fn arm_rollover(page: Weak<Self>) -> DailyRolloverTimer {
        DailyRolloverTimer::start(move || {
            if let Some(page) = page.upgrade() {
                page.roll_over();
            }
        })
    }

    fn roll_over(self: &Arc<Self>) {
        let mut activity = self.activity();
        if activity.mounts == 0 {
            return;
        }

        let today = Local::now().date_naive();
        self.frames.send_modify(|frame| frame.today = today);
        activity.rollover = Some(Self::arm_rollover(Arc::downgrade(self)));
        tracing::info!(page = %self.spec.name, %today, "Rolled over to a new day");
    }
}
