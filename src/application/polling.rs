// Cancellable fixed-cadence refresh
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Periodic fetch-then-apply loop owned by a view.
///
/// The first cycle starts immediately, then one every `interval`. Each cycle
/// runs in its own task, so a slow response may land after a newer one; the
/// last response applied wins. A failed fetch is logged and leaves the view
/// untouched. After [`PollingTask::cancel`] returns no `apply` runs again,
/// including for responses already in flight.
pub struct PollingTask {
    name: Arc<str>,
    token: CancellationToken,
    apply_gate: Arc<Mutex<()>>,
    driver: JoinHandle<()>,
}

impl PollingTask {
    pub fn start<F, Fut, T, A>(name: impl Into<Arc<str>>, interval: Duration, fetch: F, apply: A) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Send + 'static,
        A: Fn(T) + Send + Sync + 'static,
    {
        let name: Arc<str> = name.into();
        let token = CancellationToken::new();
        let apply_gate = Arc::new(Mutex::new(()));
        let apply = Arc::new(apply);

        let driver_token = token.clone();
        let driver_gate = apply_gate.clone();
        let driver_name = name.clone();
        let driver = tokio::spawn(async move {
            let name = driver_name;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cycle: u64 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = driver_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                cycle += 1;

                let response = fetch();
                let token = driver_token.clone();
                let gate = driver_gate.clone();
                let apply = apply.clone();
                let name = name.clone();
                tokio::spawn(async move {
                    let outcome = tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            tracing::debug!(task = %name, cycle, "Poll cancelled before response");
                            return;
                        }
                        outcome = response => outcome,
                    };

                    match outcome {
                        Ok(value) => {
                            let _guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
                            if token.is_cancelled() {
                                tracing::debug!(task = %name, cycle, "Discarding late poll response");
                                return;
                            }
                            apply(value);
                        }
                        Err(e) => {
                            tracing::warn!(task = %name, cycle, error = %e, "Poll failed, keeping previous state");
                        }
                    }
                });
            }

            tracing::debug!(task = %name, cycles = cycle, "Polling stopped");
        });

        tracing::debug!(task = %name, interval_ms = interval.as_millis() as u64, "Polling started");

        Self {
            name,
            token,
            apply_gate,
            driver,
        }
    }

    /// Stop polling. Idempotent; blocks only while an `apply` is running.
    pub fn cancel(&self) {
        let _guard = self.apply_gate.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.token.is_cancelled() {
            self.token.cancel();
            tracing::debug!(task = %self.name, "Polling cancelled");
        }
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.driver.is_finished()
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        self.cancel();
        self.driver.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{sleep, Instant};

    fn counting_task(interval_ms: u64, fetch_delay_ms: u64) -> (PollingTask, Arc<Mutex<Vec<Duration>>>) {
        let origin = Instant::now();
        let applied = Arc::new(Mutex::new(Vec::new()));
        let sink = applied.clone();
        let task = PollingTask::start(
            "test",
            Duration::from_millis(interval_ms),
            move || async move {
                sleep(Duration::from_millis(fetch_delay_ms)).await;
                Ok::<_, anyhow::Error>(Instant::now())
            },
            move |issued_at: Instant| sink.lock().unwrap().push(issued_at - origin),
        );
        (task, applied)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_immediately_then_on_cadence() {
        let (task, applied) = counting_task(1500, 0);

        sleep(Duration::from_millis(1600)).await;
        task.cancel();
        sleep(Duration::from_millis(5000)).await;

        let applied = applied.lock().unwrap().clone();
        assert_eq!(applied, vec![Duration::from_millis(0), Duration::from_millis(1500)]);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_tick_never_applies() {
        let (task, applied) = counting_task(1500, 0);
        task.cancel();

        sleep(Duration::from_millis(10_000)).await;
        assert!(applied.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_response_is_discarded_after_cancel() {
        let (task, applied) = counting_task(1500, 1000);

        sleep(Duration::from_millis(500)).await;
        drop(task);
        sleep(Duration::from_millis(5000)).await;

        assert!(applied.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_swallowed_and_polling_continues() {
        let calls = Arc::new(AtomicUsize::new(0));
        let applied = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let sink = applied.clone();

        let task = PollingTask::start(
            "flaky",
            Duration::from_millis(100),
            move || {
                let call = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call % 2 == 0 {
                        anyhow::bail!("backend unreachable");
                    }
                    Ok(call)
                }
            },
            move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
            },
        );

        sleep(Duration::from_millis(350)).await;
        task.cancel();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(applied.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let (task, _) = counting_task(100, 0);
        task.cancel();
        task.cancel();
        assert!(task.is_cancelled());
    }
}
