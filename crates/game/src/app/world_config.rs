use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rogue_engine::{validate_sprite_key, Orientation, SpriteKeyError, DEFAULT_MESSAGE_LOG_CAPACITY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const WORLD_CONFIG_ENV_VAR: &str = "ROGUE_WORLD_CONFIG";
const MIN_GRID_SIDE: u32 = 3;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to read world config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse world config at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid world config at {path}: {message}")]
    Invalid { path: String, message: String },
    #[error("invalid sprite key at {path}: {source}")]
    SpriteKey {
        path: String,
        #[source]
        source: SpriteKeyError,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum FacingConfig {
    North,
    East,
    #[default]
    South,
    West,
}

impl FacingConfig {
    pub(crate) fn orientation(self) -> Orientation {
        match self {
            Self::North => Orientation::North,
            Self::East => Orientation::East,
            Self::South => Orientation::South,
            Self::West => Orientation::West,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GridConfig {
    pub(crate) width: u32,
    pub(crate) height: u32,
    #[serde(default)]
    pub(crate) wall_row: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlayerConfig {
    pub(crate) x: u32,
    pub(crate) y: u32,
    #[serde(default)]
    pub(crate) facing: FacingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ItemConfig {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) sprite: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub(crate) enum ActorConfig {
    Obelisk {
        x: u32,
        y: u32,
    },
    Chest {
        x: u32,
        y: u32,
        #[serde(default)]
        facing: FacingConfig,
        #[serde(default)]
        items: Vec<ItemConfig>,
    },
    DroppedItem {
        x: u32,
        y: u32,
        item: ItemConfig,
    },
}

impl ActorConfig {
    pub(crate) fn tile(&self) -> (u32, u32) {
        match self {
            Self::Obelisk { x, y } | Self::Chest { x, y, .. } | Self::DroppedItem { x, y, .. } => {
                (*x, *y)
            }
        }
    }

    fn is_solid(&self) -> bool {
        !matches!(self, Self::DroppedItem { .. })
    }

    fn items(&self) -> Vec<&ItemConfig> {
        match self {
            Self::Obelisk { .. } => Vec::new(),
            Self::Chest { items, .. } => items.iter().collect(),
            Self::DroppedItem { item, .. } => vec![item],
        }
    }
}

fn default_message_log_capacity() -> usize {
    DEFAULT_MESSAGE_LOG_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct WorldConfig {
    pub(crate) grid: GridConfig,
    pub(crate) player: PlayerConfig,
    #[serde(default = "default_message_log_capacity")]
    pub(crate) message_log_capacity: usize,
    #[serde(default)]
    pub(crate) actors: Vec<ActorConfig>,
}

impl Default for WorldConfig {
    /// The fixed starting map.
    fn default() -> Self {
        Self {
            grid: GridConfig {
                width: 16,
                height: 12,
                wall_row: Some(1),
            },
            player: PlayerConfig {
                x: 3,
                y: 4,
                facing: FacingConfig::South,
            },
            message_log_capacity: DEFAULT_MESSAGE_LOG_CAPACITY,
            actors: vec![
                ActorConfig::Obelisk { x: 8, y: 3 },
                ActorConfig::Chest {
                    x: 12,
                    y: 8,
                    facing: FacingConfig::West,
                    items: vec![
                        ItemConfig {
                            name: "gold coin".to_string(),
                            sprite: Some("items/gold_coin".to_string()),
                        },
                        ItemConfig {
                            name: "rusty key".to_string(),
                            sprite: Some("items/rusty_key".to_string()),
                        },
                    ],
                },
                ActorConfig::DroppedItem {
                    x: 5,
                    y: 7,
                    item: ItemConfig {
                        name: "sword".to_string(),
                        sprite: Some("items/sword".to_string()),
                    },
                },
                ActorConfig::DroppedItem {
                    x: 10,
                    y: 5,
                    item: ItemConfig {
                        name: "healing potion".to_string(),
                        sprite: None,
                    },
                },
            ],
        }
    }
}

/// Reads the file named by `ROGUE_WORLD_CONFIG`, or returns the built-in
/// map when the variable is unset.
pub(crate) fn load_world_config_from_env() -> Result<WorldConfig, ConfigError> {
    match env::var(WORLD_CONFIG_ENV_VAR) {
        Ok(path) => load_world_config(Path::new(&path)),
        Err(env::VarError::NotPresent) => Ok(WorldConfig::default()),
        Err(source) => Err(ConfigError::EnvVar {
            var: WORLD_CONFIG_ENV_VAR,
            source,
        }),
    }
}

pub(crate) fn load_world_config(path: &Path) -> Result<WorldConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_world_config(&raw)?;
    validate_world_config(&config)?;
    Ok(config)
}

pub(crate) fn parse_world_config(raw: &str) -> Result<WorldConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, WorldConfig>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        ConfigError::Parse {
            path,
            source: error.into_inner(),
        }
    })
}

fn invalid(path: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        path: path.into(),
        message: message.into(),
    }
}

pub(crate) fn validate_world_config(config: &WorldConfig) -> Result<(), ConfigError> {
    let GridConfig {
        width,
        height,
        wall_row,
    } = config.grid;
    if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
        return Err(invalid(
            "grid",
            format!("expected at least {MIN_GRID_SIDE}x{MIN_GRID_SIDE}, got {width}x{height}"),
        ));
    }
    if let Some(row) = wall_row {
        if row == 0 || row >= height - 1 {
            return Err(invalid(
                "grid.wall_row",
                format!("expected an interior row in 1..{}, got {row}", height - 1),
            ));
        }
    }
    if config.message_log_capacity == 0 {
        return Err(invalid("message_log_capacity", "must be non-zero"));
    }

    let walkable = |(x, y): (u32, u32)| {
        x > 0 && y > 0 && x < width - 1 && y < height - 1 && wall_row != Some(y)
    };

    let player_tile = (config.player.x, config.player.y);
    if !walkable(player_tile) {
        return Err(invalid(
            "player",
            format!("spawn {player_tile:?} is not a walkable tile"),
        ));
    }
    let mut solid_tiles = HashSet::from([player_tile]);

    for (index, actor) in config.actors.iter().enumerate() {
        let path = format!("actors[{index}]");
        let tile = actor.tile();
        if !walkable(tile) {
            return Err(invalid(path, format!("spawn {tile:?} is not a walkable tile")));
        }
        if actor.is_solid() && !solid_tiles.insert(tile) {
            return Err(invalid(path, format!("tile {tile:?} is already occupied")));
        }
        for (item_index, item) in actor.items().into_iter().enumerate() {
            validate_item(item, &format!("{path}.items[{item_index}]"))?;
        }
    }
    Ok(())
}

fn validate_item(item: &ItemConfig, path: &str) -> Result<(), ConfigError> {
    if item.name.trim().is_empty() {
        return Err(invalid(format!("{path}.name"), "must not be empty"));
    }
    if let Some(sprite) = &item.sprite {
        validate_sprite_key(sprite).map_err(|source| ConfigError::SpriteKey {
            path: format!("{path}.sprite"),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"{
        "grid": { "width": 6, "height": 5 },
        "player": { "x": 1, "y": 1 }
    }"#;

    fn config_with_actors(actors: Vec<ActorConfig>) -> WorldConfig {
        WorldConfig {
            actors,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn default_map_is_valid() {
        let config = WorldConfig::default();
        validate_world_config(&config).expect("default map validates");
        assert_eq!((config.grid.width, config.grid.height), (16, 12));
        assert_eq!(config.grid.wall_row, Some(1));
        assert_eq!(config.actors.len(), 4);
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let config = parse_world_config(MINIMAL).expect("parse");
        assert_eq!(config.grid.wall_row, None);
        assert_eq!(config.player.facing, FacingConfig::South);
        assert_eq!(config.message_log_capacity, DEFAULT_MESSAGE_LOG_CAPACITY);
        assert!(config.actors.is_empty());
    }

    #[test]
    fn tagged_actor_kinds_parse() {
        let raw = r#"{
            "grid": { "width": 10, "height": 10, "wall_row": 5 },
            "player": { "x": 2, "y": 2, "facing": "east" },
            "actors": [
                { "kind": "obelisk", "x": 3, "y": 3 },
                { "kind": "chest", "x": 4, "y": 4, "items": [{ "name": "map" }] },
                { "kind": "dropped_item", "x": 6, "y": 6, "item": { "name": "gem", "sprite": "items/gem" } }
            ]
        }"#;
        let config = parse_world_config(raw).expect("parse");
        validate_world_config(&config).expect("valid");
        assert_eq!(config.player.facing.orientation(), Orientation::East);
        assert_eq!(config.actors[0], ActorConfig::Obelisk { x: 3, y: 3 });
        assert_eq!(config.actors[2].tile(), (6, 6));
    }

    #[test]
    fn parse_error_reports_json_path() {
        let raw = r#"{
            "grid": { "width": 6, "height": 5 },
            "player": { "x": "one", "y": 1 }
        }"#;
        let error = parse_world_config(raw).expect_err("bad x");
        match error {
            ConfigError::Parse { path, .. } => assert_eq!(path, "player.x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_actor_kind_is_rejected() {
        let raw = r#"{
            "grid": { "width": 6, "height": 5 },
            "player": { "x": 1, "y": 1 },
            "actors": [ { "kind": "dragon", "x": 2, "y": 2 } ]
        }"#;
        assert!(matches!(
            parse_world_config(raw),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn grid_must_be_at_least_three_by_three() {
        let mut config = WorldConfig::default();
        config.grid.height = 2;
        let error = validate_world_config(&config).expect_err("too small");
        assert!(error.to_string().contains("at least 3x3"), "{error}");
    }

    #[test]
    fn wall_row_must_be_interior() {
        for row in [0, 11] {
            let mut config = WorldConfig::default();
            config.grid.wall_row = Some(row);
            let error = validate_world_config(&config).expect_err("border wall row");
            assert!(error.to_string().contains("grid.wall_row"), "{error}");
        }
    }

    #[test]
    fn spawns_must_be_walkable() {
        let mut config = WorldConfig::default();
        config.player.y = 1;
        assert!(validate_world_config(&config).is_err());

        let config = config_with_actors(vec![ActorConfig::Obelisk { x: 0, y: 5 }]);
        let error = validate_world_config(&config).expect_err("border spawn");
        assert!(error.to_string().contains("actors[0]"), "{error}");
    }

    #[test]
    fn solid_actors_may_not_share_a_tile() {
        let config = config_with_actors(vec![
            ActorConfig::Obelisk { x: 5, y: 5 },
            ActorConfig::DroppedItem {
                x: 5,
                y: 5,
                item: ItemConfig {
                    name: "gem".to_string(),
                    sprite: None,
                },
            },
            ActorConfig::Obelisk { x: 5, y: 5 },
        ]);
        let error = validate_world_config(&config).expect_err("overlap");
        assert!(error.to_string().contains("actors[2]"), "{error}");
    }

    #[test]
    fn item_sprite_keys_are_checked() {
        let config = config_with_actors(vec![ActorConfig::DroppedItem {
            x: 5,
            y: 5,
            item: ItemConfig {
                name: "gem".to_string(),
                sprite: Some("../escape".to_string()),
            },
        }]);
        match validate_world_config(&config) {
            Err(ConfigError::SpriteKey { path, source }) => {
                assert_eq!(path, "actors[0].items[0].sprite");
                assert_eq!(source, SpriteKeyError::ParentTraversal);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn zero_message_capacity_is_rejected() {
        let mut config = WorldConfig::default();
        config.message_log_capacity = 0;
        assert!(validate_world_config(&config).is_err());
    }

    #[test]
    fn load_reads_and_validates_a_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("world.json");
        fs::write(&path, MINIMAL).expect("write config");

        let config = load_world_config(&path).expect("load");
        assert_eq!(config.grid.width, 6);

        let missing = load_world_config(&temp.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn default_round_trips_through_json() {
        let json = serde_json::to_string(&WorldConfig::default()).expect("serialize");
        let decoded = parse_world_config(&json).expect("parse");
        assert_eq!(decoded, WorldConfig::default());
    }
}
