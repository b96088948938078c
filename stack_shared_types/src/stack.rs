//! Managed stack records.

use serde::{Deserialize, Serialize};

/// Marker environment variable attached to every stack created by this
/// system; `list` filtering keys off it so unrelated Portainer stacks are
/// never touched.
pub const STACK_MARKER: &str = "PORTAINER_MINECRAFT_STACK";

/// Lifecycle status of a Portainer stack. Portainer encodes this as an
/// integer (1 = active, 2 = inactive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackStatus {
    Active,
    Inactive,
}

impl StackStatus {
    /// Map the raw Portainer status code. Anything other than 1 is treated
    /// as inactive.
    pub fn from_portainer(status: i64) -> Self {
        if status == 1 {
            StackStatus::Active
        } else {
            StackStatus::Inactive
        }
    }
}

/// Human-facing metadata stored out-of-band in the stack's compose file
/// under the `x-metadata` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
}

/// A Minecraft server stack managed by this system, normalized from the
/// Portainer stack record plus its descriptor-embedded metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedStack {
    /// Portainer-assigned stack id; the identity of the deployment.
    pub id: i64,
    pub name: String,
    pub status: StackStatus,
    pub owner: String,
    pub description: String,
}
