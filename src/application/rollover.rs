// One-shot timer firing at the next local midnight
use chrono::{DateTime, TimeDelta, TimeZone};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const DAY_MS: u64 = 86_400_000;

/// Milliseconds from `now` to the next midnight of `now`'s timezone.
///
/// Exactly at midnight the answer is a full day, never zero. The delay is
/// measured between instants, so days shortened or stretched by a DST
/// change still end at local midnight. Where midnight itself is skipped the
/// first valid local time after it is used.
pub fn millis_until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> u64 {
    let zone = now.timezone();
    let next = now
        .date_naive()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .and_then(|midnight| {
            zone.from_local_datetime(&midnight)
                .earliest()
                .or_else(|| zone.from_local_datetime(&(midnight + TimeDelta::hours(1))).earliest())
        });

    match next {
        Some(next) => u64::try_from(next.signed_duration_since(now).num_milliseconds().max(1)).unwrap_or(DAY_MS),
        None => DAY_MS,
    }
}

/// Fires its callback once, then is spent; owners re-arm it for the next day.
pub struct DailyRolloverTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl DailyRolloverTimer {
    pub fn start<F>(on_rollover: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = millis_until_next_midnight(&chrono::Local::now());
        Self::start_after(Duration::from_millis(delay), on_rollover)
    }

    pub fn start_after<F>(delay: Duration, on_rollover: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !task_token.is_cancelled() {
                        tracing::debug!("Daily rollover");
                        on_rollover();
                    }
                }
            }
        });

        tracing::debug!(delay_ms = delay.as_millis() as u64, "Daily rollover armed");
        Self { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DailyRolloverTimer {
    fn drop(&mut self) {
        self.token.cancel();
        self.handle.abort();
    }
}
