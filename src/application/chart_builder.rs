// Chart view model assembly from transformed series
use crate::domain::chart::{
    AxisLabelFormat, CategoryAxis, ChartConfig, LineSeries, MetricSeries, SeriesKind, TooltipTrigger, ValueAxis,
    ZoomDescriptor, ZoomKind,
};
use crate::domain::telemetry::MetricKey;

/// Page-wide rendering choices shared by every chart on that page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartProfile {
    pub zoom_kind: ZoomKind,
    pub label_format: AxisLabelFormat,
    pub y_scale: bool,
}

impl ChartProfile {
    pub fn live(label_format: AxisLabelFormat) -> Self {
        Self {
            zoom_kind: ZoomKind::Inside,
            label_format,
            y_scale: false,
        }
    }

    pub fn history() -> Self {
        Self {
            zoom_kind: ZoomKind::Slider,
            label_format: AxisLabelFormat::TimeOfDay,
            y_scale: true,
        }
    }
}

/// Per-chart labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub metric: MetricKey,
    pub title: String,
    pub y_axis: String,
}

impl PanelSpec {
    pub fn new(metric: MetricKey, title: impl Into<String>, y_axis: impl Into<String>) -> Self {
        Self {
            metric,
            title: title.into(),
            y_axis: y_axis.into(),
        }
    }
}

pub fn build_chart(series: &MetricSeries, panel: &PanelSpec, profile: &ChartProfile) -> ChartConfig {
    debug_assert_eq!(series.metric, panel.metric);

    let (x_data, y_data): (Vec<String>, Vec<Option<f64>>) = series
        .points
        .iter()
        .map(|point| (point.timestamp.clone(), point.value))
        .unzip();

    let labels = x_data
        .iter()
        .map(|timestamp| profile.label_format.label(timestamp).to_string())
        .collect();

    ChartConfig {
        metric: series.metric,
        title: panel.title.clone(),
        tooltip: TooltipTrigger::Axis,
        x_axis: CategoryAxis {
            name: "Time".to_string(),
            data: x_data,
            labels,
            label_format: profile.label_format,
        },
        y_axis: ValueAxis {
            name: panel.y_axis.clone(),
            scale: profile.y_scale,
        },
        zoom: ZoomDescriptor {
            kind: profile.zoom_kind,
            x_window: series.zoom,
            y_zoom: true,
        },
        series: LineSeries {
            kind: SeriesKind::SmoothedLine,
            data: y_data,
        },
    }
}
