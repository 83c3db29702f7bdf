// Chart domain models: derived series and the fixed rendering descriptor
use super::telemetry::MetricKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: String,
    pub value: Option<f64>,
}

impl SeriesPoint {
    pub fn new(timestamp: String, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
}

/// Visible share of the x range, in percent of the full series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub start: f64,
    pub end: f64,
}

impl ZoomWindow {
    pub const DEFAULT: ZoomWindow = ZoomWindow {
        start: 60.0,
        end: 100.0,
    };
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One metric projected across a record batch, sorted by timestamp ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub metric: MetricKey,
    pub points: Vec<SeriesPoint>,
    pub zoom: ZoomWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomKind {
    /// Wheel/drag zoom inside the plot area.
    Inside,
    /// Explicit slider below the plot.
    Slider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisLabelFormat {
    /// Label is the raw timestamp.
    Full,
    /// Label is the second whitespace-separated token (`01:05:09` of `2024-03-01 01:05:09 PM`).
    TimeOfDay,
}

impl AxisLabelFormat {
    pub fn label<'a>(&self, timestamp: &'a str) -> &'a str {
        match self {
            AxisLabelFormat::Full => timestamp,
            AxisLabelFormat::TimeOfDay => timestamp.split(' ').nth(1).unwrap_or(timestamp),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipTrigger {
    Axis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    SmoothedLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAxis {
    pub name: String,
    pub data: Vec<String>,
    /// `data` as the axis displays it.
    pub labels: Vec<String>,
    pub label_format: AxisLabelFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueAxis {
    pub name: String,
    /// When set the axis fits the data range instead of starting at zero.
    pub scale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoomDescriptor {
    pub kind: ZoomKind,
    pub x_window: ZoomWindow,
    /// The y axis is zoomable too, always over its full range.
    pub y_zoom: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub kind: SeriesKind,
    /// `None` entries are gaps.
    pub data: Vec<Option<f64>>,
}

/// Declarative rendering descriptor derived 1:1 from a [`MetricSeries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub metric: MetricKey,
    pub title: String,
    pub tooltip: TooltipTrigger,
    pub x_axis: CategoryAxis,
    pub y_axis: ValueAxis,
    pub zoom: ZoomDescriptor,
    pub series: LineSeries,
}
