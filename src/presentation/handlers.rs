// HTTP request handlers
use crate::application::history_service::{DateRangeSelection, DeepLinkParams, HistoryState};
use crate::application::lifecycle_service::RecordListView;
use crate::application::live_service::LiveFrame;
use crate::domain::error::DomainError;
use crate::domain::lifecycle::{RecordKind, RecordState};
use crate::domain::maintenance::{MaintenanceStatus, MaintenanceTarget};
use crate::domain::nominal::NominalSession;
use crate::domain::telemetry::{MetricKey, PumpType};
use crate::infrastructure::chunked_json::{accepts_brotli, chunked_json_stream, watch_frames};
use crate::presentation::app_state::AppState;
use crate::presentation::rows::{AlertRow, RecordRow, RecordTable};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

type HandlerResult<T> = Result<Json<T>, (StatusCode, String)>;

fn bad_request(e: DomainError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn not_found(what: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, what.into())
}

fn record_kind(raw: &str) -> Result<RecordKind, (StatusCode, String)> {
    raw.parse::<RecordKind>().map_err(|e| not_found(e.to_string()))
}

fn table(view: RecordListView) -> RecordTable {
    RecordTable {
        list: view.list,
        rows: view.rows.iter().map(RecordRow::from).collect(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Last frame applied to a live page
pub async fn live_frame(Path(page): Path<String>, State(state): State<Arc<AppState>>) -> HandlerResult<LiveFrame> {
    let live = state
        .live_pages
        .get(&page)
        .ok_or_else(|| not_found(format!("unknown page: {page}")))?;
    Ok(Json(live.current()))
}

/// Mount a live page and stream its frames until the client disconnects
pub async fn stream_live(
    Path(page): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(live) = state.live_pages.get(&page) else {
        return not_found(format!("unknown page: {page}")).into_response();
    };

    let compress = accepts_brotli(&headers);
    let frames = watch_frames(live.subscribe(), live.mount());

    match chunked_json_stream(frames, compress) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Rebuild a history chart from a `/History?...` deep link query
pub async fn history_deep_link(
    Query(params): Query<DeepLinkParams>,
    State(state): State<Arc<AppState>>,
) -> Json<HistoryState> {
    Json(state.history.open_deep_link(&params).await)
}

#[derive(Deserialize)]
pub struct HistoryApplyRequest {
    pub metric: Option<String>,
    pub start: String,
    pub end: String,
}

pub async fn history_apply(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HistoryApplyRequest>,
) -> HandlerResult<HistoryState> {
    let metric = request
        .metric
        .as_deref()
        .filter(|m| !m.is_empty())
        .map(str::parse::<MetricKey>)
        .transpose()
        .map_err(bad_request)?;
    let range = DateRangeSelection::parse(&request.start, &request.end).map_err(bad_request)?;

    Ok(Json(state.history.apply(metric, range).await))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub list: Option<String>,
}

/// Current list of sessions or products; `?list=` switches lists first
pub async fn list_records(
    Path(kind): Path<String>,
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult<RecordTable> {
    let controller = state.records(record_kind(&kind)?);

    let view = match query.list {
        Some(list) => {
            let list = list.parse::<RecordState>().map_err(bad_request)?;
            controller.select_list(list).await
        }
        None => controller.open().await,
    };

    Ok(Json(table(view)))
}

pub async fn archive_record(
    Path((kind, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult<RecordTable> {
    let controller = state.records(record_kind(&kind)?);
    Ok(Json(table(controller.archive(id).await)))
}

pub async fn restore_record(
    Path((kind, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult<RecordTable> {
    let controller = state.records(record_kind(&kind)?);
    Ok(Json(table(controller.restore(id).await)))
}

#[derive(Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub comments: String,
}

pub async fn comment_record(
    Path((kind, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CommentRequest>,
) -> HandlerResult<RecordTable> {
    let controller = state.records(record_kind(&kind)?);
    Ok(Json(table(controller.set_comment(id, &request.comments).await)))
}

pub async fn maintenance_status(State(state): State<Arc<AppState>>) -> Json<MaintenanceStatus> {
    Json(state.maintenance.refresh().await)
}

#[derive(Deserialize)]
pub struct SetMaintenanceRequest {
    pub new_value: Value,
    pub target: String,
    pub pump_type: String,
}

/// Numbers may come from a text field; only coerce, never range-check.
fn coerce_days(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|v| v.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub async fn set_maintenance(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetMaintenanceRequest>,
) -> HandlerResult<MaintenanceStatus> {
    let new_value = coerce_days(&request.new_value).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("new_value is not a number: {}", request.new_value),
        )
    })?;
    let target = request.target.parse::<MaintenanceTarget>().map_err(bad_request)?;
    let pump_type = request.pump_type.parse::<PumpType>().map_err(bad_request)?;

    Ok(Json(state.maintenance.set(new_value, target, pump_type).await))
}

pub async fn reset_maintenance(
    Path(target): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult<MaintenanceStatus> {
    let target = target.parse::<MaintenanceTarget>().map_err(bad_request)?;
    Ok(Json(state.maintenance.reset_to_default(target).await))
}

pub async fn latest_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<AlertRow>> {
    let alerts = state.alerts.latest().await;
    Json(alerts.iter().map(AlertRow::from).collect())
}

pub async fn nominal_sessions(
    Path(pump_type): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult<Vec<NominalSession>> {
    let pump_type = pump_type.parse::<PumpType>().map_err(bad_request)?;
    Ok(Json(state.nominal.list(pump_type).await))
}

#[derive(Deserialize)]
pub struct NominalAddRequest {
    pub start: String,
    pub end: String,
}

pub async fn add_nominal_session(
    Path(pump_type): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<NominalAddRequest>,
) -> HandlerResult<Vec<NominalSession>> {
    let pump_type = pump_type.parse::<PumpType>().map_err(bad_request)?;
    let range = DateRangeSelection::parse(&request.start, &request.end).map_err(bad_request)?;
    Ok(Json(state.nominal.add(pump_type, range).await))
}

#[derive(Deserialize)]
pub struct NominalRemoveRequest {
    pub id: u64,
}

pub async fn remove_nominal_session(
    Path(pump_type): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<NominalRemoveRequest>,
) -> HandlerResult<Vec<NominalSession>> {
    let pump_type = pump_type.parse::<PumpType>().map_err(bad_request)?;
    Ok(Json(state.nominal.remove(pump_type, request.id).await))
}
