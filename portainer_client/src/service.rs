//! Stack lifecycle operations against Portainer.
//!
//! The service exposes list/start/stop/create over managed stacks. Create
//! enforces the single-active invariant by stopping every active managed
//! stack before submitting the new descriptor; start deliberately does not
//! (starting a stack directly can yield two active stacks, matching the
//! orchestrator's own behavior).
//!
//! Two concurrent create calls are not coordinated here; Portainer itself is
//! the only serialization point, so the invariant can be transiently
//! violated by racing callers. Known limitation.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use manager_config::ManagerConfig;
use stack_shared_types::{
    safe_stack_name, ManagedStack, MinecraftConfig, StackMetadata, StackStatus, STACK_MARKER,
};

use crate::compose::{extract_metadata, ComposeFile};
use crate::error::PortainerError;
use crate::session::SessionManager;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport};

/// Portainer stack type for compose-format descriptors.
const COMPOSE_STACK_TYPE: u8 = 2;

/// Raw stack record from `GET /api/stacks`.
#[derive(Debug, Deserialize)]
struct StackSummary {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Status")]
    status: i64,
    #[serde(rename = "Env", default)]
    env: Vec<EnvEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EnvEntry {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct StackFile {
    #[serde(rename = "StackFileContent")]
    content: String,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    #[serde(rename = "Id")]
    id: i64,
}

/// Lifecycle operations over managed Minecraft stacks. Each instance owns
/// exactly one [`SessionManager`]; every operation obtains a valid token
/// from it before talking to Portainer.
pub struct PortainerService {
    transport: Arc<dyn ApiTransport>,
    session: SessionManager,
    base_url: Url,
    volume_root: PathBuf,
}

impl PortainerService {
    pub fn new(config: &ManagerConfig, transport: Arc<dyn ApiTransport>) -> Self {
        let session = SessionManager::new(
            transport.clone(),
            config.base_url.clone(),
            config.username.clone(),
            config.password.clone(),
        );
        Self {
            transport,
            session,
            base_url: config.base_url.clone(),
            volume_root: config.volume_root.clone(),
        }
    }

    /// List managed stacks: every Portainer stack carrying the marker env
    /// entry, merged with its descriptor-embedded metadata. Costs one
    /// additional request per matching stack (not batched).
    pub async fn list_stacks(&self) -> Result<Vec<ManagedStack>, PortainerError> {
        debug!("listing managed stacks");

        let response = self.authed_get(self.base_url.join("/api/stacks")?).await?;
        let summaries: Vec<StackSummary> = parse_body(response)?;

        let managed = summaries
            .into_iter()
            .filter(|stack| stack.env.iter().any(|env| env.name == STACK_MARKER));

        let mut stacks = Vec::new();
        for summary in managed {
            let metadata = self.stack_metadata(summary.id).await?;
            let name = if metadata.name.is_empty() {
                summary.name
            } else {
                metadata.name
            };
            stacks.push(ManagedStack {
                id: summary.id,
                name,
                status: StackStatus::from_portainer(summary.status),
                owner: metadata.owner,
                description: metadata.description,
            });
        }

        debug!(count = stacks.len(), "returning managed stacks");
        Ok(stacks)
    }

    /// Fetch the `x-metadata` block from a stack's compose file.
    pub async fn stack_metadata(&self, stack_id: i64) -> Result<StackMetadata, PortainerError> {
        let url = self.base_url.join(&format!("/api/stacks/{stack_id}/file"))?;
        let response = self.authed_get(url).await?;
        let file: StackFile = parse_body(response)?;
        Ok(extract_metadata(&file.content)?)
    }

    /// Start a stack. No single-active precondition applies here; only the
    /// create path stops other stacks.
    pub async fn start_stack(&self, stack_id: i64) -> Result<(), PortainerError> {
        info!(stack_id, "starting stack");
        let url = self.base_url.join(&format!("/api/stacks/{stack_id}/start"))?;
        self.authed_post(url, None).await?;
        Ok(())
    }

    /// Stop a stack.
    pub async fn stop_stack(&self, stack_id: i64) -> Result<(), PortainerError> {
        info!(stack_id, "stopping stack");
        let url = self.base_url.join(&format!("/api/stacks/{stack_id}/stop"))?;
        self.authed_post(url, None).await?;
        Ok(())
    }

    /// Resolve the target endpoint. The system assumes exactly one endpoint
    /// is registered and always uses the first.
    pub async fn endpoint_id(&self) -> Result<i64, PortainerError> {
        let response = self.authed_get(self.base_url.join("/api/endpoints")?).await?;
        let endpoints: Vec<Endpoint> = parse_body(response)?;
        endpoints
            .first()
            .map(|endpoint| endpoint.id)
            .ok_or(PortainerError::MissingEndpoint)
    }

    /// Create a named docker volume bind-mounted from the configured volume
    /// root.
    pub async fn create_volume(&self, name: &str, dir_name: &str) -> Result<(), PortainerError> {
        info!(name, dir_name, "creating volume");
        let endpoint_id = self.endpoint_id().await?;
        let url = self
            .base_url
            .join(&format!("/api/endpoints/{endpoint_id}/docker/volumes/create"))?;
        let device = self.volume_root.join(dir_name);
        self.authed_post(
            url,
            Some(json!({
                "Name": name,
                "Driver": "local",
                "DriverOpts": {
                    "type": "none",
                    "o": "bind",
                    "device": device.display().to_string(),
                },
            })),
        )
        .await?;
        Ok(())
    }

    /// Create a new managed stack.
    ///
    /// Stops every currently-active managed stack first (in parallel; all
    /// stops must succeed), then submits the compose descriptor tagged with
    /// the marker env entry. An empty name fails validation before any
    /// orchestrator call is made.
    pub async fn create_stack(
        &self,
        config: &MinecraftConfig,
        metadata: &StackMetadata,
    ) -> Result<(), PortainerError> {
        if metadata.name.trim().is_empty() {
            return Err(PortainerError::Validation(
                "the stack name must be provided".to_string(),
            ));
        }

        info!(name = %metadata.name, "creating stack");
        let endpoint_id = self.endpoint_id().await?;

        let stacks = self.list_stacks().await?;
        let stops = stacks
            .iter()
            .filter(|stack| stack.status == StackStatus::Active)
            .map(|stack| self.stop_stack(stack.id));
        try_join_all(stops).await?;

        let safe_name = safe_stack_name(&metadata.name);
        let data_path = self.volume_root.join(&safe_name);
        let compose = ComposeFile::build(config, metadata, &data_path);
        let content = compose.render()?;

        let mut url = self.base_url.join("/api/stacks")?;
        url.query_pairs_mut()
            .append_pair("type", &COMPOSE_STACK_TYPE.to_string())
            .append_pair("method", "string")
            .append_pair("endpointId", &endpoint_id.to_string());

        let marker = EnvEntry {
            name: STACK_MARKER.to_string(),
            value: "1".to_string(),
        };
        let body = json!({
            "name": safe_name,
            "env": [marker],
            "stackFileContent": content,
        });

        self.authed_post(url, Some(body)).await?;
        info!(name = %metadata.name, "stack created");
        Ok(())
    }

    async fn authed_get(&self, url: Url) -> Result<ApiResponse, PortainerError> {
        let token = self.session.token().await?;
        let response = self
            .transport
            .execute(ApiRequest::get(url).with_bearer(token))
            .await?;
        expect_success(response)
    }

    async fn authed_post(&self, url: Url, body: Option<Value>) -> Result<ApiResponse, PortainerError> {
        let token = self.session.token().await?;
        let mut request = ApiRequest::post(url).with_bearer(token);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        let response = self.transport.execute(request).await?;
        expect_success(response)
    }
}

fn expect_success(response: ApiResponse) -> Result<ApiResponse, PortainerError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(PortainerError::from_response(&response))
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(response: ApiResponse) -> Result<T, PortainerError> {
    serde_json::from_value(response.body)
        .map_err(|err| PortainerError::MalformedResponse(err.to_string()))
}
