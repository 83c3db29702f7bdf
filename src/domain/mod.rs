// Domain layer - Spraying line records and chart view models
pub mod alert;
pub mod chart;
pub mod error;
pub mod lifecycle;
pub mod maintenance;
pub mod nominal;
pub mod telemetry;
pub mod timestamp;
