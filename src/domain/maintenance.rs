// Maintenance countdowns
use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceTarget {
    Spraygun,
    Filter,
}

impl MaintenanceTarget {
    /// Name the backend uses in `field_to_change`.
    pub fn wire_name(&self) -> &'static str {
        match self {
            MaintenanceTarget::Spraygun => "pump",
            MaintenanceTarget::Filter => "filter",
        }
    }
}

impl fmt::Display for MaintenanceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceTarget::Spraygun => f.write_str("spraygun"),
            MaintenanceTarget::Filter => f.write_str("filter"),
        }
    }
}

impl FromStr for MaintenanceTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spraygun" | "pump" => Ok(MaintenanceTarget::Spraygun),
            "filter" => Ok(MaintenanceTarget::Filter),
            other => Err(DomainError::UnknownMaintenanceTarget(other.to_string())),
        }
    }
}

/// Days left on both countdowns. `None` means the last fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct MaintenanceStatus {
    pub spraygun_days_left: Option<i64>,
    pub filter_days_left: Option<i64>,
}

#[cfg(test)]
impl MaintenanceStatus {
    pub fn new(spraygun_days_left: i64, filter_days_left: i64) -> Self {
        Self {
            spraygun_days_left: Some(spraygun_days_left),
            filter_days_left: Some(filter_days_left),
        }
    }
}
