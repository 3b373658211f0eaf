use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use viewport::{ChannelMask, PowerPreference, Rgba};

use crate::app;
use crate::cli::{Args, BackgroundArg};
use crate::config::{BackgroundMode, Config};

/// Start-up settings after the CLI has been layered over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub checkerboard: bool,
    pub solid: Rgba,
    pub channels: ChannelMask,
    pub power: PowerPreference,
    pub print_info: bool,
}

impl Settings {
    pub fn resolve(config: &Config, args: &Args) -> Self {
        let (width, height) = match args.size {
            Some(size) => (size.width, size.height),
            None => (config.window.width, config.window.height),
        };
        let (checkerboard, solid) = match args.background {
            Some(BackgroundArg::Checkerboard) => (true, config.solid_color()),
            Some(BackgroundArg::Solid(color)) => (false, color),
            None => (
                config.background.mode == BackgroundMode::Checkerboard,
                config.solid_color(),
            ),
        };

        Self {
            path: args.path.clone(),
            width,
            height,
            checkerboard,
            solid,
            channels: config.channels.mask(),
            power: args.power.unwrap_or_else(|| config.gpu.power.into()),
            print_info: args.info,
        }
    }
}

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    let settings = Settings::resolve(&config, &args);
    tracing::debug!(?settings, "resolved start-up settings");

    app::run(settings)
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
