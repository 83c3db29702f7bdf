// Record batch to per-metric series
use crate::domain::chart::{MetricSeries, SeriesPoint, ZoomWindow};
use crate::domain::telemetry::{MetricKey, TelemetryRecord};
use crate::domain::timestamp::parse_timestamp;

/// Project `records` onto `metric` and sort by timestamp ascending.
///
/// Missing values stay `None`. The sort is stable, so records sharing a
/// timestamp keep backend order, and records whose timestamp cannot be parsed
/// go last in input order. Pure: the same input always yields the same series.
pub fn transform(records: &[TelemetryRecord], metric: MetricKey) -> MetricSeries {
    let mut keyed: Vec<_> = records
        .iter()
        .map(|record| {
            (
                parse_timestamp(&record.time),
                SeriesPoint::new(record.time.clone(), record.value(metric)),
            )
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    MetricSeries {
        metric,
        points: keyed.into_iter().map(|(_, point)| point).collect(),
        zoom: ZoomWindow::DEFAULT,
    }
}

/// Same batch, one series per metric, no coupling between them.
pub fn transform_all(records: &[TelemetryRecord], metrics: &[MetricKey]) -> Vec<MetricSeries> {
    metrics.iter().map(|metric| transform(records, *metric)).collect()
}
