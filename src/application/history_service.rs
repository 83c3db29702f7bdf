// Historical chart queries from deep links or an interactive date range
use crate::application::chart_builder::{build_chart, ChartProfile, PanelSpec};
use crate::application::spray_line_repository::SprayLineRepository;
use crate::application::transform::transform;
use crate::domain::chart::ChartConfig;
use crate::domain::error::DomainError;
use crate::domain::telemetry::{MetricKey, PumpType};
use crate::domain::timestamp::{format_backend, parse_timestamp};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Resolved `(metric, start, end)` triple. An empty metric means "no chart".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryQuery {
    pub metric: Option<MetricKey>,
    pub start: String,
    pub end: String,
}

/// Metric charted for a deep-linked pump; anything unrecognised selects nothing.
pub fn metric_for_pump(pump_type: Option<&str>) -> Option<MetricKey> {
    pump_type?.parse::<PumpType>().ok().map(MetricKey::speed_of)
}

/// Query parameters of a history deep link such as
/// `/History?startDate=2024-03-01&endDate=2024-03-02&pumpType=barrier`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeepLinkParams {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    #[serde(rename = "pumpType")]
    pub pump_type: Option<String>,
}

/// Returns `None` when either bound is missing. Bounds are passed to the
/// backend exactly as linked.
pub fn resolve_deep_link(params: &DeepLinkParams) -> Option<HistoryQuery> {
    let start = params.start_date.as_deref().filter(|s| !s.is_empty())?;
    let end = params.end_date.as_deref().filter(|s| !s.is_empty())?;

    Some(HistoryQuery {
        metric: metric_for_pump(params.pump_type.as_deref()),
        start: start.to_string(),
        end: end.to_string(),
    })
}

/// Bounds picked interactively, formatted for the backend on apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRangeSelection {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRangeSelection {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateRange(format!(
                "end {} is before start {}",
                format_backend(&end),
                format_backend(&start)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        let parse = |raw: &str| {
            parse_timestamp(raw).ok_or_else(|| DomainError::InvalidDateRange(format!("unreadable bound {raw:?}")))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    pub fn bounds(&self) -> (String, String) {
        (format_backend(&self.start), format_backend(&self.end))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryState {
    pub query: Option<HistoryQuery>,
    pub chart: Option<ChartConfig>,
}

/// The history page: one chart, replaced by each successful query.
pub struct HistoryView {
    repository: Arc<dyn SprayLineRepository>,
    profile: ChartProfile,
    y_axis: String,
    state: watch::Sender<HistoryState>,
}

impl HistoryView {
    pub fn new(repository: Arc<dyn SprayLineRepository>, profile: ChartProfile, y_axis: impl Into<String>) -> Self {
        let (state, _) = watch::channel(HistoryState::default());
        Self {
            repository,
            profile,
            y_axis: y_axis.into(),
            state,
        }
    }

    pub fn current(&self) -> HistoryState {
        self.state.borrow().clone()
    }

    /// Rebuild the chart a deep link describes. Unknown pump types and
    /// missing bounds render no chart and issue no fetch.
    pub async fn open_deep_link(&self, params: &DeepLinkParams) -> HistoryState {
        match resolve_deep_link(params) {
            Some(query) if query.metric.is_some() => self.run(query).await,
            Some(query) => {
                tracing::debug!(start = %query.start, end = %query.end, "Deep link names no known pump, no chart");
                self.clear(Some(query))
            }
            None => {
                tracing::debug!(?params, "Deep link without a date range, no chart");
                self.clear(None)
            }
        }
    }

    /// Interactive "Apply". Without a selected metric nothing happens.
    pub async fn apply(&self, metric: Option<MetricKey>, range: DateRangeSelection) -> HistoryState {
        let Some(metric) = metric else {
            tracing::debug!("Apply without a selected metric ignored");
            return self.current();
        };

        let (start, end) = range.bounds();
        self.run(HistoryQuery {
            metric: Some(metric),
            start,
            end,
        })
        .await
    }

    fn clear(&self, query: Option<HistoryQuery>) -> HistoryState {
        self.state.send_replace(HistoryState { query, chart: None });
        self.current()
    }

    async fn run(&self, query: HistoryQuery) -> HistoryState {
        let Some(metric) = query.metric else {
            return self.clear(Some(query));
        };

        match self.repository.history(&query.start, &query.end).await {
            Ok(records) => {
                let panel = PanelSpec::new(metric, metric.as_str(), self.y_axis.clone());
                let chart = build_chart(&transform(&records, metric), &panel, &self.profile);
                tracing::info!(%metric, start = %query.start, end = %query.end, records = records.len(), "History loaded");
                self.state.send_replace(HistoryState {
                    query: Some(query),
                    chart: Some(chart),
                });
            }
            Err(e) => {
                tracing::warn!(endpoint = "/api/history", error = %e, "History fetch failed, keeping previous chart");
            }
        }
        self.current()
    }
}
