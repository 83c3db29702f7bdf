// Presentation layer - View API consumed by the renderer
pub mod app_state;
pub mod handlers;
pub mod rows;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    // Frame streams compress per chunk, so they stay outside CompressionLayer
    let streams = Router::new().route("/views/live/:page/stream", get(stream_live));

    let views = Router::new()
        .route("/healthz", get(health_check))
        .route("/views/live/:page", get(live_frame))
        .route("/views/history", get(history_deep_link).post(history_apply))
        .route("/views/maintenance", get(maintenance_status).post(set_maintenance))
        .route("/views/maintenance/reset/:target", post(reset_maintenance))
        .route("/views/alerts", get(latest_alerts))
        .route("/views/nominal/:pump_type", get(nominal_sessions).post(nominal_sessions))
        .route("/views/nominal/:pump_type/add", post(add_nominal_session))
        .route("/views/nominal/:pump_type/remove", post(remove_nominal_session))
        .route("/views/:kind", get(list_records))
        .route("/views/:kind/:id/archive", post(archive_record))
        .route("/views/:kind/:id/restore", post(restore_record))
        .route("/views/:kind/:id/comment", post(comment_record))
        .layer(CompressionLayer::new());

    views
        .merge(streams)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
