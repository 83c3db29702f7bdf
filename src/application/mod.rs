// Application layer - Polling, chart assembly and view controllers
pub mod alerts_service;
pub mod chart_builder;
pub mod history_service;
pub mod lifecycle_service;
pub mod live_service;
pub mod maintenance_service;
pub mod nominal_service;
pub mod polling;
pub mod rollover;
pub mod spray_line_repository;
pub mod transform;

#[cfg(test)]
pub(crate) mod fake_repository;
