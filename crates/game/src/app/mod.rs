mod bootstrap;
mod loop_runner;
mod world_config;
mod world_setup;

pub(crate) use loop_runner::run;
