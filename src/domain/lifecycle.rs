// Session and product records with their active/archived lifecycle
use super::error::DomainError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Session,
    Product,
}

impl RecordKind {
    /// Verb the operator sees for archiving this kind.
    pub fn archive_verb(&self) -> &'static str {
        match self {
            RecordKind::Session => "trash",
            RecordKind::Product => "hide",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Session => f.write_str("session"),
            RecordKind::Product => f.write_str("product"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" | "sessions" => Ok(RecordKind::Session),
            "product" | "products" => Ok(RecordKind::Product),
            other => Err(DomainError::UnknownRecordKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    #[default]
    Active,
    Archived,
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordState::Active => f.write_str("active"),
            RecordState::Archived => f.write_str("archived"),
        }
    }
}

impl FromStr for RecordState {
    type Err = DomainError;

    // The list selectors historically used "useful" for the active list and
    // "trash"/"hidden" for the archived one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" | "useful" => Ok(RecordState::Active),
            "archived" | "trash" | "hidden" => Ok(RecordState::Archived),
            other => Err(DomainError::UnknownRecordState(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordPayload {
    Session {
        /// As the backend reports it; not limited to the charted pumps.
        pump_type: String,
        avg_speed: f64,
        total_sprayed_amount: f64,
        avg_pressure: Option<f64>,
    },
    Product {
        gelcoat_material: f64,
        barrier_material: f64,
    },
}

/// A completed spraying session or product, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleRecord {
    pub id: u64,
    pub start_time: String,
    pub end_time: String,
    pub comments: String,
    pub state: RecordState,
    pub payload: RecordPayload,
}

#[cfg(test)]
impl LifecycleRecord {
    pub fn kind(&self) -> RecordKind {
        match self.payload {
            RecordPayload::Session { .. } => RecordKind::Session,
            RecordPayload::Product { .. } => RecordKind::Product,
        }
    }
}
