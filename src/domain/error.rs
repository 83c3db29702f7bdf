use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown metric key: {0}")]
    UnknownMetric(String),
    #[error("unknown pump type: {0}")]
    UnknownPumpType(String),
    #[error("unknown record list: {0}")]
    UnknownRecordState(String),
    #[error("unknown record kind: {0}")]
    UnknownRecordKind(String),
    #[error("unknown maintenance target: {0}")]
    UnknownMaintenanceTarget(String),
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),
}
