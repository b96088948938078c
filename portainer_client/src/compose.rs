//! Compose descriptor generation and metadata extraction.
//!
//! Every managed stack is described by a docker-compose file with a single
//! `server` service running the fixed game-server image. Human-facing
//! metadata rides along in an `x-metadata` block so it can be read back when
//! listing stacks without a store of our own.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use stack_shared_types::{MinecraftConfig, StackMetadata};

/// The game-server image every stack runs.
pub const SERVER_IMAGE: &str = "itzg/minecraft-server:latest";

/// Fixed host:container port mapping for the Minecraft protocol.
const SERVER_PORT: &str = "25565:25565";

/// Compose format version marker.
const COMPOSE_VERSION: &str = "3";

/// The descriptor submitted to Portainer as `stackFileContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeFile {
    pub version: String,
    #[serde(rename = "x-metadata")]
    pub metadata: StackMetadata,
    pub services: ComposeServices,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeServices {
    pub server: ComposeService,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeService {
    pub image: String,
    pub environment: BTreeMap<String, Value>,
    pub ports: Vec<String>,
    pub volumes: Vec<String>,
}

impl ComposeFile {
    /// Build the descriptor for a new stack: defaults merged with user
    /// overrides, the EULA acceptance forced on, the fixed port mapping, a
    /// read-only bind of the host timezone file and the per-stack data
    /// directory.
    pub fn build(config: &MinecraftConfig, metadata: &StackMetadata, data_path: &Path) -> Self {
        let mut environment = config.env_values();
        environment.insert("EULA".to_string(), json!(true));

        Self {
            version: COMPOSE_VERSION.to_string(),
            metadata: metadata.clone(),
            services: ComposeServices {
                server: ComposeService {
                    image: SERVER_IMAGE.to_string(),
                    environment,
                    ports: vec![SERVER_PORT.to_string()],
                    volumes: vec![
                        "/etc/localtime:/etc/localtime:ro".to_string(),
                        format!("{}:/data", data_path.display()),
                    ],
                },
            },
        }
    }

    pub fn render(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Pull the `x-metadata` block out of a stack's compose file. Stacks created
/// before the block existed (or edited by hand) simply yield empty metadata.
pub fn extract_metadata(stack_file_content: &str) -> Result<StackMetadata, serde_yaml::Error> {
    let document: serde_yaml::Value = serde_yaml::from_str(stack_file_content)?;
    match document.get("x-metadata") {
        Some(block) => serde_yaml::from_value(block.clone()),
        None => Ok(StackMetadata::default()),
    }
}
