// Telemetry data domain models
use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One sample reported by the spraying line.
///
/// Every metric is optional: a missing or `null` field stays `None` so the
/// chart can draw a gap instead of a zero.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct TelemetryRecord {
    pub time: String,
    #[serde(rename = "Barrier_speedRPM", default)]
    pub barrier_speed_rpm: Option<f64>,
    #[serde(rename = "Gelcoat_speedRPM", default)]
    pub gelcoat_speed_rpm: Option<f64>,
    #[serde(rename = "Pressure", default)]
    pub pressure: Option<f64>,
    #[serde(rename = "WaterLevel_1", default)]
    pub water_level_1: Option<f64>,
    #[serde(rename = "WaterLevel_2", default)]
    pub water_level_2: Option<f64>,
    #[serde(rename = "Barr_pulses", default)]
    pub barrier_pulses: Option<f64>,
    #[serde(rename = "Gelcoat_pulses", default)]
    pub gelcoat_pulses: Option<f64>,
}

impl TelemetryRecord {
    pub fn value(&self, metric: MetricKey) -> Option<f64> {
        match metric {
            MetricKey::BarrierSpeed => self.barrier_speed_rpm,
            MetricKey::GelcoatSpeed => self.gelcoat_speed_rpm,
            MetricKey::Pressure => self.pressure,
            MetricKey::WaterLevel1 => self.water_level_1,
            MetricKey::WaterLevel2 => self.water_level_2,
            MetricKey::BarrierPulses => self.barrier_pulses,
            MetricKey::GelcoatPulses => self.gelcoat_pulses,
        }
    }
}

#[cfg(test)]
impl TelemetryRecord {
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            ..Self::default()
        }
    }

    pub fn with(mut self, metric: MetricKey, value: f64) -> Self {
        let slot = match metric {
            MetricKey::BarrierSpeed => &mut self.barrier_speed_rpm,
            MetricKey::GelcoatSpeed => &mut self.gelcoat_speed_rpm,
            MetricKey::Pressure => &mut self.pressure,
            MetricKey::WaterLevel1 => &mut self.water_level_1,
            MetricKey::WaterLevel2 => &mut self.water_level_2,
            MetricKey::BarrierPulses => &mut self.barrier_pulses,
            MetricKey::GelcoatPulses => &mut self.gelcoat_pulses,
        };
        *slot = Some(value);
        self
    }
}

/// Metrics the backend reports, keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MetricKey {
    #[serde(rename = "Barrier_speedRPM")]
    BarrierSpeed,
    #[serde(rename = "Gelcoat_speedRPM")]
    GelcoatSpeed,
    #[serde(rename = "Pressure")]
    Pressure,
    #[serde(rename = "WaterLevel_1")]
    WaterLevel1,
    #[serde(rename = "WaterLevel_2")]
    WaterLevel2,
    #[serde(rename = "Barr_pulses")]
    BarrierPulses,
    #[serde(rename = "Gelcoat_pulses")]
    GelcoatPulses,
}

impl MetricKey {
    pub const ALL: [MetricKey; 7] = [
        MetricKey::BarrierSpeed,
        MetricKey::GelcoatSpeed,
        MetricKey::Pressure,
        MetricKey::WaterLevel1,
        MetricKey::WaterLevel2,
        MetricKey::BarrierPulses,
        MetricKey::GelcoatPulses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::BarrierSpeed => "Barrier_speedRPM",
            MetricKey::GelcoatSpeed => "Gelcoat_speedRPM",
            MetricKey::Pressure => "Pressure",
            MetricKey::WaterLevel1 => "WaterLevel_1",
            MetricKey::WaterLevel2 => "WaterLevel_2",
            MetricKey::BarrierPulses => "Barr_pulses",
            MetricKey::GelcoatPulses => "Gelcoat_pulses",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKey::BarrierSpeed => "Pump Speed (Barrier)",
            MetricKey::GelcoatSpeed => "Pump Speed (Gelcoat)",
            MetricKey::Pressure => "Pressure",
            MetricKey::WaterLevel1 => "Water Level 1",
            MetricKey::WaterLevel2 => "Water Level",
            MetricKey::BarrierPulses => "Pulses (Barrier)",
            MetricKey::GelcoatPulses => "Pulses (Gelcoat)",
        }
    }

    /// Speed metric charted for a pump when a history deep link names it.
    pub fn speed_of(pump: PumpType) -> Self {
        match pump {
            PumpType::Barrier => MetricKey::BarrierSpeed,
            PumpType::Gelcoat => MetricKey::GelcoatSpeed,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| DomainError::UnknownMetric(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PumpType {
    Barrier,
    Gelcoat,
}

impl PumpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PumpType::Barrier => "barrier",
            PumpType::Gelcoat => "gelcoat",
        }
    }
}

impl fmt::Display for PumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PumpType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "barrier" => Ok(PumpType::Barrier),
            "gelcoat" => Ok(PumpType::Gelcoat),
            other => Err(DomainError::UnknownPumpType(other.to_string())),
        }
    }
}

/// Latest telemetry window plus the aggregates the backend computes over it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct LiveSnapshot {
    #[serde(default)]
    pub data: Vec<TelemetryRecord>,
    #[serde(default)]
    pub total_weight_barr: Option<f64>,
    #[serde(default)]
    pub total_weight_gel: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_wire_names() {
        let json = r#"{
            "time": "2024-03-01 01:00:00 PM",
            "Barrier_speedRPM": 12.5,
            "Gelcoat_speedRPM": null,
            "Barr_pulses": 3
        }"#;
        let record: TelemetryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.value(MetricKey::BarrierSpeed), Some(12.5));
        assert_eq!(record.value(MetricKey::GelcoatSpeed), None);
        assert_eq!(record.value(MetricKey::BarrierPulses), Some(3.0));
        assert_eq!(record.value(MetricKey::Pressure), None);
    }

    #[test]
    fn test_metric_key_round_trips_through_str() {
        for metric in MetricKey::ALL {
            assert_eq!(metric.as_str().parse::<MetricKey>(), Ok(metric));
        }
        assert!("Temperature".parse::<MetricKey>().is_err());
    }

    #[test]
    fn test_speed_metric_per_pump() {
        assert_eq!(MetricKey::speed_of(PumpType::Barrier).as_str(), "Barrier_speedRPM");
        assert_eq!(MetricKey::speed_of(PumpType::Gelcoat).as_str(), "Gelcoat_speedRPM");
    }

    #[test]
    fn test_pump_type_parse() {
        assert_eq!("barrier".parse::<PumpType>(), Ok(PumpType::Barrier));
        assert_eq!(
            "unknown".parse::<PumpType>(),
            Err(DomainError::UnknownPumpType("unknown".to_string()))
        );
    }
}
