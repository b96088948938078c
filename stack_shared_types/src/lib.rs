// Shared types for the Minecraft stack manager.
//
// Domain types exchanged between the Portainer client, the REST surface and
// the configuration layer: managed stack records, stack metadata, the
// Minecraft server configuration model with its defaults, and the
// name-translation utilities used when generating deployment descriptors.

pub mod config;
pub mod naming;
pub mod stack;

pub use config::{Difficulty, GameMode, LevelType, MinecraftConfig};
pub use naming::{env_var_name, safe_stack_name};
pub use stack::{ManagedStack, StackMetadata, StackStatus, STACK_MARKER};
