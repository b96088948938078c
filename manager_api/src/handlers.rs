//! API request handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use stack_shared_types::{MinecraftConfig, StackMetadata};

use crate::error::ApiResult;
use crate::state::ApiState;

/// Create request body: the flat form object. Metadata fields sit alongside
/// the camelCase configuration keys and are split off before delegating.
#[derive(Debug, Deserialize)]
pub struct CreateStackRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(flatten)]
    pub config: MinecraftConfig,
}

/// List managed stacks.
pub async fn list_stacks(State(state): State<ApiState>) -> ApiResult<impl IntoResponse> {
    debug!("GET /api/list");
    let stacks = state.service.list_stacks().await?;
    Ok(Json(stacks))
}

/// Start a stack by id.
pub async fn start_stack(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    debug!(id, "GET /api/start");
    state.service.start_stack(id).await?;
    Ok(Json(json!({ "status": "ok" })))
}

/// Stop a stack by id.
pub async fn stop_stack(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    debug!(id, "GET /api/stop");
    state.service.stop_stack(id).await?;
    Ok(Json(json!({ "status": "ok" })))
}

/// Create a stack from the submitted configuration.
pub async fn create_stack(
    State(state): State<ApiState>,
    Json(request): Json<CreateStackRequest>,
) -> ApiResult<impl IntoResponse> {
    debug!("POST /api/create");
    let metadata = StackMetadata {
        name: request.name,
        description: request.description,
        owner: request.owner,
    };
    state.service.create_stack(&request.config, &metadata).await?;
    Ok(Json(json!({ "status": "ok" })))
}
