// Backend JSON payloads and their mapping onto domain records
use crate::domain::lifecycle::{LifecycleRecord, RecordPayload, RecordState};
use crate::domain::maintenance::MaintenanceStatus;
use crate::domain::telemetry::PumpType;
use serde::{Deserialize, Deserializer, Serialize};

/// The backend is loose about numbers: ids and counters sometimes arrive as
/// strings, weights as floats where integers are expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Loose {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Int(v) => Some(*v as f64),
            Loose::Float(v) => Some(*v),
            Loose::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Loose::Int(v) => Some(*v),
            Loose::Float(v) => Some(v.round() as i64),
            Loose::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|v| v.round() as i64))
            }
        }
    }
}

fn loose_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Loose::as_f64).unwrap_or_default())
}

fn loose_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Loose::as_f64))
}

fn loose_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Loose::as_i64))
}

fn loose_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Loose::deserialize(deserializer)?;
    value
        .as_i64()
        .and_then(|id| u64::try_from(id).ok())
        .ok_or_else(|| serde::de::Error::custom("record id is not a non-negative integer"))
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Loose::as_i64).unwrap_or(0) != 0)
}

fn state_from(archived: bool) -> RecordState {
    if archived {
        RecordState::Archived
    } else {
        RecordState::Active
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionDto {
    #[serde(deserialize_with = "loose_id")]
    pub id: u64,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub pump_type: String,
    #[serde(default, deserialize_with = "loose_f64")]
    pub avg_speed: f64,
    #[serde(default, deserialize_with = "loose_f64")]
    pub total_sprayed_amount: f64,
    #[serde(default, deserialize_with = "loose_opt_f64")]
    pub avg_pressure: Option<f64>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_trash: bool,
}

impl From<SessionDto> for LifecycleRecord {
    fn from(dto: SessionDto) -> Self {
        LifecycleRecord {
            id: dto.id,
            start_time: dto.start_time,
            end_time: dto.end_time,
            comments: dto.comments.unwrap_or_default(),
            state: state_from(dto.is_trash),
            payload: RecordPayload::Session {
                pump_type: dto.pump_type,
                avg_speed: dto.avg_speed,
                total_sprayed_amount: dto.total_sprayed_amount,
                avg_pressure: dto.avg_pressure,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductDto {
    #[serde(deserialize_with = "loose_id")]
    pub id: u64,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default, deserialize_with = "loose_f64")]
    pub gelcoat_material: f64,
    #[serde(default, deserialize_with = "loose_f64")]
    pub barrier_material: f64,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub hide: bool,
}

impl From<ProductDto> for LifecycleRecord {
    fn from(dto: ProductDto) -> Self {
        LifecycleRecord {
            id: dto.id,
            start_time: dto.start_time,
            end_time: dto.end_time,
            comments: dto.comments.unwrap_or_default(),
            state: state_from(dto.hide),
            payload: RecordPayload::Product {
                gelcoat_material: dto.gelcoat_material,
                barrier_material: dto.barrier_material,
            },
        }
    }
}

/// `/api/get_maintenance`: `maintenance` is the spraygun countdown.
#[derive(Debug, Deserialize)]
pub struct MaintenanceDto {
    #[serde(default, deserialize_with = "loose_opt_i64")]
    pub maintenance: Option<i64>,
    #[serde(default, deserialize_with = "loose_opt_i64")]
    pub filter: Option<i64>,
}

impl From<MaintenanceDto> for MaintenanceStatus {
    fn from(dto: MaintenanceDto) -> Self {
        MaintenanceStatus {
            spraygun_days_left: dto.maintenance,
            filter_days_left: dto.filter,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryRequest<'a> {
    #[serde(rename = "startDate")]
    pub start_date: &'a str,
    #[serde(rename = "endDate")]
    pub end_date: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SetMaintenanceRequest {
    pub new_value: i64,
    pub field_to_change: &'static str,
    pub pump_type: PumpType,
}

#[derive(Debug, Serialize)]
pub struct IdRequest {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub struct CommentRequest<'a> {
    pub id: u64,
    pub comments: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NominalRequest<'a> {
    pub pump_type: PumpType,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<&'a str>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_maps_trash_flag_and_pump() {
        let dto: SessionDto = serde_json::from_value(json!({
            "id": 7,
            "start_time": "2024-03-01 01:00:00 PM",
            "end_time": "2024-03-01 01:05:00 PM",
            "pump_type": "Barrier",
            "length": 300,
            "total_sprayed_amount": 1.234,
            "avg_speed": "12.5",
            "avg_pressure": null,
            "comments": null,
            "is_trash": 1
        }))
        .unwrap();

        let record = LifecycleRecord::from(dto);
        assert_eq!(record.id, 7);
        assert_eq!(record.state, RecordState::Archived);
        assert_eq!(record.comments, "");
        assert_eq!(
            record.payload,
            RecordPayload::Session {
                pump_type: "Barrier".to_string(),
                avg_speed: 12.5,
                total_sprayed_amount: 1.234,
                avg_pressure: None,
            }
        );
    }

    #[test]
    fn test_session_with_unknown_pump_is_kept() {
        let dto: SessionDto = serde_json::from_value(json!({"id": "3", "pump_type": "primer"})).unwrap();
        let record = LifecycleRecord::from(dto);
        assert_eq!(record.id, 3);
        assert!(matches!(record.payload, RecordPayload::Session { ref pump_type, .. } if pump_type == "primer"));
    }

    #[test]
    fn test_product_hide_flag() {
        let dto: ProductDto = serde_json::from_value(json!({
            "id": 2,
            "gelcoat_material": 3,
            "barrier_material": 1.5,
            "comments": "ok",
            "hide": 0
        }))
        .unwrap();

        let record = LifecycleRecord::from(dto);
        assert_eq!(record.state, RecordState::Active);
        assert_eq!(record.comments, "ok");
    }

    #[test]
    fn test_maintenance_counters_arrive_as_strings() {
        let dto: MaintenanceDto = serde_json::from_value(json!({"maintenance": "44", "filter": 20})).unwrap();
        assert_eq!(MaintenanceStatus::from(dto), MaintenanceStatus::new(44, 20));

        let dto: MaintenanceDto = serde_json::from_value(json!({"maintenance": "soon"})).unwrap();
        assert_eq!(MaintenanceStatus::from(dto), MaintenanceStatus::default());
    }

    #[test]
    fn test_request_bodies_use_backend_names() {
        let body = serde_json::to_value(SetMaintenanceRequest {
            new_value: 10,
            field_to_change: "filter",
            pump_type: PumpType::Barrier,
        })
        .unwrap();
        assert_eq!(body, json!({"new_value": 10, "field_to_change": "filter", "pump_type": "barrier"}));

        let body = serde_json::to_value(NominalRequest {
            pump_type: PumpType::Gelcoat,
            start_date: None,
            end_date: None,
            id: Some(4),
        })
        .unwrap();
        assert_eq!(body, json!({"pump_type": "gelcoat", "id": 4}));
    }
}
