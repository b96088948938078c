//! Minecraft server configuration model.
//!
//! Mirrors the settings understood by the `itzg/minecraft-server` image.
//! Every field is optional: unset fields fall back to the documented
//! defaults when the configuration is rendered to environment variables,
//! and any field the user did set wins over its default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::naming::env_var_name;

/// World game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Creative,
    Survival,
    Adventure,
    Spectator,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Creative => "creative",
            GameMode::Survival => "survival",
            GameMode::Adventure => "adventure",
            GameMode::Spectator => "spectator",
        }
    }
}

/// World generator preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelType {
    #[serde(rename = "minecraft:normal")]
    Normal,
    #[serde(rename = "minecraft:flat")]
    Flat,
    #[serde(rename = "minecraft:large_biomes")]
    LargeBiomes,
    #[serde(rename = "minecraft:amplified")]
    Amplified,
    #[serde(rename = "minecraft:single_biome_surface")]
    SingleBiomeSurface,
}

impl LevelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelType::Normal => "minecraft:normal",
            LevelType::Flat => "minecraft:flat",
            LevelType::LargeBiomes => "minecraft:large_biomes",
            LevelType::Amplified => "minecraft:amplified",
            LevelType::SingleBiomeSurface => "minecraft:single_biome_surface",
        }
    }
}

/// World difficulty, encoded as an integer on the wire (0 = peaceful .. 3 = hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Peaceful,
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn level(&self) -> u8 {
        match self {
            Difficulty::Peaceful => 0,
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> u8 {
        difficulty.level()
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = UnknownDifficulty;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Difficulty::Peaceful),
            1 => Ok(Difficulty::Easy),
            2 => Ok(Difficulty::Normal),
            3 => Ok(Difficulty::Hard),
            other => Err(UnknownDifficulty(other)),
        }
    }
}

/// Raised when a difficulty value outside 0..=3 arrives from a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty level {0}, expected 0..=3")]
pub struct UnknownDifficulty(pub u8);

/// User-adjustable server settings. Field names match the camelCase keys
/// submitted by the form; each translates to an environment variable via
/// [`env_var_name`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinecraftConfig {
    /// Message of the day.
    pub motd: Option<String>,
    /// CSV list of allowed players.
    pub whitelist: Option<String>,
    /// CSV list of admins.
    pub ops: Option<String>,
    /// URL to the server icon file.
    pub icon: Option<String>,
    pub allow_nether: Option<bool>,
    pub announce_player_achievements: Option<bool>,
    pub enable_command_block: Option<bool>,
    /// Generate villages, dungeons and similar structures.
    pub generate_structures: Option<bool>,
    pub hardcore: Option<bool>,
    pub snooper_enabled: Option<bool>,
    pub max_build_height: Option<u32>,
    /// Max tick time in milliseconds before the watchdog kills the server.
    pub max_tick_time: Option<u64>,
    pub spawn_animals: Option<bool>,
    pub spawn_monsters: Option<bool>,
    /// Spawn villagers.
    pub spawn_npcs: Option<bool>,
    /// Radius around spawn that non-ops cannot edit (0 disables).
    pub spawn_protection: Option<u32>,
    /// World data sent to clients, in chunks.
    pub view_distance: Option<u32>,
    pub seed: Option<String>,
    pub game_mode: Option<GameMode>,
    pub pvp: Option<bool>,
    pub level_type: Option<LevelType>,
    /// Special world generator settings.
    pub generator_settings: Option<String>,
    /// Level save name.
    pub level: Option<String>,
    /// Check players against the Mojang account database.
    pub online_mode: Option<bool>,
    pub allow_flight: Option<bool>,
    /// Server name for online discovery.
    pub server_name: Option<String>,
    pub difficulty: Option<Difficulty>,
}

/// Default settings applied to every stack. Keys the defaults leave unset
/// (motd, whitelist, seed, ...) only appear in the rendered environment when
/// the user supplies them.
fn default_env_values() -> BTreeMap<String, Value> {
    let defaults: [(&str, Value); 20] = [
        ("allowNether", json!(true)),
        ("announcePlayerAchievements", json!(true)),
        ("enableCommandBlock", json!(true)),
        ("generateStructures", json!(true)),
        ("hardcore", json!(false)),
        ("snooperEnabled", json!(false)),
        ("maxBuildHeight", json!(256)),
        ("maxTickTime", json!(60000)),
        ("spawnAnimals", json!(true)),
        ("spawnMonsters", json!(true)),
        ("spawnNpcs", json!(true)),
        ("spawnProtection", json!(0)),
        ("viewDistance", json!(10)),
        ("gameMode", json!(GameMode::Survival.as_str())),
        ("pvp", json!(false)),
        ("levelType", json!(LevelType::Normal.as_str())),
        ("level", json!("world")),
        ("onlineMode", json!(true)),
        ("allowFlight", json!(true)),
        ("difficulty", json!(Difficulty::Normal.level())),
    ];

    defaults
        .into_iter()
        .map(|(key, value)| (env_var_name(key), value))
        .collect()
}

impl MinecraftConfig {
    /// Render the configuration to environment variables for the server
    /// container: documented defaults first, then every user-set field laid
    /// over them. The EULA flag is not part of this map; the descriptor
    /// builder forces it unconditionally.
    pub fn env_values(&self) -> BTreeMap<String, Value> {
        let mut env = default_env_values();

        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                env.insert(env_var_name(key), value);
            }
        };

        set("motd", self.motd.as_deref().map(|v| json!(v)));
        set("whitelist", self.whitelist.as_deref().map(|v| json!(v)));
        set("ops", self.ops.as_deref().map(|v| json!(v)));
        set("icon", self.icon.as_deref().map(|v| json!(v)));
        set("allowNether", self.allow_nether.map(|v| json!(v)));
        set(
            "announcePlayerAchievements",
            self.announce_player_achievements.map(|v| json!(v)),
        );
        set("enableCommandBlock", self.enable_command_block.map(|v| json!(v)));
        set("generateStructures", self.generate_structures.map(|v| json!(v)));
        set("hardcore", self.hardcore.map(|v| json!(v)));
        set("snooperEnabled", self.snooper_enabled.map(|v| json!(v)));
        set("maxBuildHeight", self.max_build_height.map(|v| json!(v)));
        set("maxTickTime", self.max_tick_time.map(|v| json!(v)));
        set("spawnAnimals", self.spawn_animals.map(|v| json!(v)));
        set("spawnMonsters", self.spawn_monsters.map(|v| json!(v)));
        set("spawnNpcs", self.spawn_npcs.map(|v| json!(v)));
        set("spawnProtection", self.spawn_protection.map(|v| json!(v)));
        set("viewDistance", self.view_distance.map(|v| json!(v)));
        set("seed", self.seed.as_deref().map(|v| json!(v)));
        set("gameMode", self.game_mode.map(|v| json!(v.as_str())));
        set("pvp", self.pvp.map(|v| json!(v)));
        set("levelType", self.level_type.map(|v| json!(v.as_str())));
        set(
            "generatorSettings",
            self.generator_settings.as_deref().map(|v| json!(v)),
        );
        set("level", self.level.as_deref().map(|v| json!(v)));
        set("onlineMode", self.online_mode.map(|v| json!(v)));
        set("allowFlight", self.allow_flight.map(|v| json!(v)));
        set("serverName", self.server_name.as_deref().map(|v| json!(v)));
        set("difficulty", self.difficulty.map(|v| json!(v.level())));

        env
    }
}
