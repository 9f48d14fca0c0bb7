// ── Backend seam ──
//
// The commands the interface sends to the backend process. The gateway
// only talks to this trait; `HttpBackend` is the production transport and
// tests plug in an in-memory fake.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::CoreError;
use crate::model::{CoreConfig, RConfig};

/// Payload of `update_config`: either document, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_config: Option<CoreConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rua_config: Option<RConfig>,
}

impl UpdateConfig {
    pub fn core(doc: CoreConfig) -> Self {
        Self {
            core_config: Some(doc),
            rua_config: None,
        }
    }

    pub fn runtime(doc: RConfig) -> Self {
        Self {
            core_config: None,
            rua_config: Some(doc),
        }
    }
}

/// Commands understood by the backend process.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_runtime_config(&self) -> Result<RConfig, CoreError>;

    async fn get_core_config(&self) -> Result<CoreConfig, CoreError>;

    async fn update_config(&self, update: UpdateConfig) -> Result<(), CoreError>;

    /// Ask the backend to route through `node_id`.
    async fn select_node(&self, node_id: &str) -> Result<(), CoreError>;

    /// Run a connectivity/speed probe against `node_id`. Results land in
    /// the runtime document.
    async fn node_speed(&self, node_id: &str) -> Result<(), CoreError>;

    /// One-shot "interface is live" signal.
    async fn ready(&self) -> Result<(), CoreError>;
}

// ── HTTP transport ───────────────────────────────────────────────────

/// `Backend` over the command endpoint of the backend's HTTP bridge.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: rua_api::BackendClient,
}

impl HttpBackend {
    pub fn new(config: &GatewayConfig) -> Result<Self, CoreError> {
        let client = rua_api::BackendClient::new(config.url.clone(), &config.transport())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_runtime_config(&self) -> Result<RConfig, CoreError> {
        Ok(self.client.invoke("get_rua_config", &json!({})).await?)
    }

    async fn get_core_config(&self) -> Result<CoreConfig, CoreError> {
        Ok(self.client.invoke("get_core_config", &json!({})).await?)
    }

    async fn update_config(&self, update: UpdateConfig) -> Result<(), CoreError> {
        debug!(
            core = update.core_config.is_some(),
            runtime = update.rua_config.is_some(),
            "update_config"
        );
        Ok(self.client.invoke_unit("update_config", &update).await?)
    }

    async fn select_node(&self, node_id: &str) -> Result<(), CoreError> {
        Ok(self
            .client
            .invoke_unit("select_node", &json!({ "nodeId": node_id }))
            .await?)
    }

    async fn node_speed(&self, node_id: &str) -> Result<(), CoreError> {
        Ok(self
            .client
            .invoke_unit("node_speed", &json!({ "nodeId": node_id }))
            .await?)
    }

    async fn ready(&self) -> Result<(), CoreError> {
        Ok(self.client.emit("ready").await?)
    }
}
