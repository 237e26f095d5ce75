use rogue_engine::LoopConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::world_config::{load_world_config_from_env, ConfigError, WorldConfig};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) world_config: WorldConfig,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!("=== Rogue Startup ===");

    let world_config = load_world_config_from_env()?;
    info!(
        grid_width = world_config.grid.width,
        grid_height = world_config.grid.height,
        actor_count = world_config.actors.len(),
        "world_config_loaded"
    );

    Ok(AppWiring {
        config: LoopConfig::default(),
        world_config,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
