// Spraying line backend over HTTP/JSON
use crate::application::spray_line_repository::SprayLineRepository;
use crate::domain::alert::Alert;
use crate::domain::lifecycle::{LifecycleRecord, RecordKind, RecordState};
use crate::domain::maintenance::{MaintenanceStatus, MaintenanceTarget};
use crate::domain::nominal::NominalSession;
use crate::domain::telemetry::{LiveSnapshot, PumpType, TelemetryRecord};
use crate::infrastructure::wire::{
    CommentRequest, HistoryRequest, IdRequest, MaintenanceDto, NominalRequest, ProductDto, SessionDto,
    SetMaintenanceRequest,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct HttpRepository {
    base_url: String,
    client: reqwest::Client,
}

struct Endpoints {
    list_active: &'static str,
    list_archived: &'static str,
    archive: &'static str,
    restore: &'static str,
    comment: &'static str,
}

fn endpoints(kind: RecordKind) -> Endpoints {
    match kind {
        RecordKind::Session => Endpoints {
            list_active: "/api/get_all_sessions_from_collection",
            list_archived: "/api/get_deleted_sessions_from_collection",
            archive: "/api/set_trash_by_id",
            restore: "/api/restore_trash_session_by_id",
            comment: "/api/set_comments_by_id_session",
        },
        RecordKind::Product => Endpoints {
            list_active: "/api/get_all_products_collection",
            list_archived: "/api/get_all_deleted_products_collection",
            archive: "/api/set_hide_by_id_product",
            restore: "/api/restore_hide_by_id_product",
            comment: "/api/set_comments_by_id_product",
        },
    }
}

impl HttpRepository {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, path: &str) -> Result<reqwest::Response> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} failed with status {}: {}", path, status, body);
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.client.get(self.url(path)), path).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send(self.client.post(self.url(path)).json(body), path).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))
    }

    /// For endpoints whose body is just an acknowledgement.
    async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.client.post(self.url(path)).json(body), path).await?;
        Ok(())
    }

    async fn get_ack(&self, path: &str) -> Result<()> {
        self.send(self.client.get(self.url(path)), path).await?;
        Ok(())
    }
}

#[async_trait]
impl SprayLineRepository for HttpRepository {
    async fn latest_snapshot(&self) -> Result<LiveSnapshot> {
        self.get_json("/api/get_20").await
    }

    async fn latest_alerts(&self) -> Result<Vec<Alert>> {
        self.get_json("/api/get_latest_alerts").await
    }

    async fn history(&self, start: &str, end: &str) -> Result<Vec<TelemetryRecord>> {
        let body = HistoryRequest {
            start_date: start,
            end_date: end,
        };
        self.post_json("/api/history", &body).await
    }

    async fn maintenance(&self) -> Result<MaintenanceStatus> {
        let dto: MaintenanceDto = self.get_json("/api/get_maintenance").await?;
        Ok(dto.into())
    }

    async fn set_maintenance(&self, new_value: i64, target: MaintenanceTarget, pump_type: PumpType) -> Result<()> {
        let body = SetMaintenanceRequest {
            new_value,
            field_to_change: target.wire_name(),
            pump_type,
        };
        self.post_ack("/api/set_maintenance_manually", &body).await
    }

    async fn reset_maintenance(&self, target: MaintenanceTarget) -> Result<()> {
        let path = match target {
            MaintenanceTarget::Spraygun => "/api/reset_maintenance_pump",
            MaintenanceTarget::Filter => "/api/reset_maintenance_filter",
        };
        self.get_ack(path).await
    }

    async fn list_records(&self, kind: RecordKind, state: RecordState) -> Result<Vec<LifecycleRecord>> {
        let endpoints = endpoints(kind);
        let path = match state {
            RecordState::Active => endpoints.list_active,
            RecordState::Archived => endpoints.list_archived,
        };

        let records = match kind {
            RecordKind::Session => {
                let sessions: Vec<SessionDto> = self.get_json(path).await?;
                sessions.into_iter().map(LifecycleRecord::from).collect()
            }
            RecordKind::Product => {
                let products: Vec<ProductDto> = self.get_json(path).await?;
                products.into_iter().map(LifecycleRecord::from).collect()
            }
        };

        Ok(records)
    }

    async fn archive_record(&self, kind: RecordKind, id: u64) -> Result<()> {
        self.post_ack(endpoints(kind).archive, &IdRequest { id }).await
    }

    async fn restore_record(&self, kind: RecordKind, id: u64) -> Result<()> {
        self.post_ack(endpoints(kind).restore, &IdRequest { id }).await
    }

    async fn set_record_comment(&self, kind: RecordKind, id: u64, comments: &str) -> Result<()> {
        self.post_ack(endpoints(kind).comment, &CommentRequest { id, comments }).await
    }

    async fn nominal_sessions(&self, pump_type: PumpType) -> Result<Vec<NominalSession>> {
        let body = NominalRequest {
            pump_type,
            start_date: None,
            end_date: None,
            id: None,
        };
        self.post_json("/api/get_nominal_sessions", &body).await
    }

    async fn add_nominal_session(&self, pump_type: PumpType, start: &str, end: &str) -> Result<Vec<NominalSession>> {
        let body = NominalRequest {
            pump_type,
            start_date: Some(start),
            end_date: Some(end),
            id: None,
        };
        self.post_json("/api/add_new_nominal_session", &body).await
    }

    async fn remove_nominal_session(&self, pump_type: PumpType, id: u64) -> Result<Vec<NominalSession>> {
        let body = NominalRequest {
            pump_type,
            start_date: None,
            end_date: None,
            id: Some(id),
        };
        self.post_json("/api/remove_nominal_session_by_id", &body).await
    }
}
