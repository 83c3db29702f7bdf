use crate::application::chart_builder::{ChartProfile, PanelSpec};
use crate::application::live_service::LivePageSpec;
use crate::domain::chart::AxisLabelFormat;
use crate::domain::telemetry::MetricKey;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

const ENV_PREFIX: &str = "SPRAYLINE";

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub backend: BackendSettings,
    pub server: ServerSettings,
    #[serde(default)]
    pub maintenance: MaintenanceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl BackendSettings {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host.trim_end_matches('/'), self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MaintenanceSettings {
    pub refresh_ms: u64,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self { refresh_ms: 60_000 }
    }
}

fn default_scheme() -> String {
    "http".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PagesConfig {
    #[serde(default)]
    pub pages: BTreeMap<String, PageConfig>,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageConfig {
    pub interval_ms: u64,
    pub label_format: AxisLabelFormat,
    #[serde(default)]
    pub show_totals: bool,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    pub metric: MetricKey,
    pub title: Option<String>,
    pub y_axis: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    pub y_axis: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            y_axis: "Value".to_string(),
        }
    }
}

impl PageConfig {
    pub fn to_spec(&self, name: &str) -> LivePageSpec {
        LivePageSpec {
            name: name.to_string(),
            interval: Duration::from_millis(self.interval_ms),
            profile: ChartProfile::live(self.label_format),
            panels: self
                .panels
                .iter()
                .map(|panel| {
                    let title = panel
                        .title
                        .clone()
                        .unwrap_or_else(|| panel.metric.display_name().to_string());
                    PanelSpec::new(panel.metric, title, panel.y_axis.clone())
                })
                .collect(),
            show_totals: self.show_totals,
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn backend_config_with<S>(file: S, environment: config::Environment) -> anyhow::Result<BackendConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn pages_config_with<S>(file: S) -> anyhow::Result<PagesConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder().add_source(file).build()?;

    Ok(settings.try_deserialize()?)
}

/// Backend address, listen address and maintenance cadence.
/// `SPRAYLINE__BACKEND__HOST` style variables override the file.
pub fn load_backend_config() -> anyhow::Result<BackendConfig> {
    backend_config_with(config::File::with_name("config/backend"), environment())
}

pub fn load_pages_config() -> anyhow::Result<PagesConfig> {
    pages_config_with(config::File::with_name("config/pages"))
}
