use rogue_engine::{
    Actor, ActorHandle, ActorRegistry, Inventory, Item, MessageLog, TileGrid, Vec2, World,
};
use tracing::info;

use super::world_config::{ActorConfig, ItemConfig, WorldConfig};

pub(crate) fn build_grid(config: &WorldConfig) -> TileGrid {
    TileGrid::build(config.grid.width, config.grid.height, config.grid.wall_row)
}

/// Places the player first, then every configured actor in file order.
pub(crate) fn build_world<'g>(grid: &'g TileGrid, config: &WorldConfig) -> World<'g> {
    let mut registry = ActorRegistry::new(grid);
    let player = registry.add_actor(Actor::player(
        tile_position(config.player.x, config.player.y),
        config.player.facing.orientation(),
    ));
    for actor in &config.actors {
        spawn_actor(&mut registry, actor);
    }
    info!(
        actor_count = registry.len(),
        player = %player,
        "world_populated"
    );
    World::new(
        registry,
        player,
        MessageLog::new(config.message_log_capacity),
    )
}

fn spawn_actor(registry: &mut ActorRegistry<'_>, config: &ActorConfig) -> ActorHandle {
    let actor = match config {
        ActorConfig::Obelisk { x, y } => Actor::obelisk(tile_position(*x, *y)),
        ActorConfig::Chest {
            x,
            y,
            facing,
            items,
        } => Actor::chest(
            tile_position(*x, *y),
            facing.orientation(),
            items.iter().map(to_item).collect::<Inventory>(),
        ),
        ActorConfig::DroppedItem { x, y, item } => {
            Actor::dropped_item(tile_position(*x, *y), to_item(item))
        }
    };
    registry.add_actor(actor)
}

fn tile_position(x: u32, y: u32) -> Vec2 {
    Vec2::new(x as f32, y as f32)
}

fn to_item(config: &ItemConfig) -> Item {
    match &config.sprite {
        Some(sprite) => Item::with_sprite(config.name.clone(), sprite.clone()),
        None => Item::new(config.name.clone()),
    }
}
