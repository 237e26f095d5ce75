use std::process::ExitCode;

use rogue_engine::{run_app, AppError};
use thiserror::Error;
use tracing::error;

use super::bootstrap::{build_app, AppWiring};
use super::world_config::ConfigError;
use super::world_setup::{build_grid, build_world};

#[derive(Debug, Error)]
pub(crate) enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
}

pub(crate) fn run() -> ExitCode {
    match build_app().map_err(GameError::from).and_then(run_wired) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}

fn run_wired(app: AppWiring) -> Result<(), GameError> {
    let grid = build_grid(&app.world_config);
    let world = build_world(&grid, &app.world_config);
    run_app(app.config, world)?;
    Ok(())
}
