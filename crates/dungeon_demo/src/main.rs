// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dungeon demo - headless host for the camera interaction controller
//!
//! Builds an in-memory dungeon with walk, free, ghost and making-of cameras,
//! plays the movie, chains into the making-of tour and prints a JSON report
//! of what happened.
//!
//! ## Usage
//!
//! ```text
//! dungeon_demo --config Dungeon.ron --frames 6000 --key 600:1 --key 900:5
//! ```

mod demo;
mod scene;

use clap::Parser;
use demo::{DemoError, DemoOptions};
use dungeon_interaction::{DungeonConfig, Key, CONFIG_FILE_NAME};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "dungeon_demo")]
#[command(about = "Run the Dungeon camera demo without a renderer", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file, defaults are used when it does not exist
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,

    /// No help banners
    #[arg(short, long)]
    expert: bool,

    /// Restart the movie after the making-of
    #[arg(short, long)]
    repeat: bool,

    /// Short movie, camcorder keys and a faster making-of
    #[arg(short, long, env = "DUNGEON_DEVELOPER")]
    developer: bool,

    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Animator seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Keep recorded tracks in memory
    #[arg(long)]
    in_memory: bool,

    /// Key press as FRAME:KEY, KEY one of 1-5, r, p
    #[arg(long = "key", value_parser = parse_key_press)]
    keys: Vec<(u64, Key)>,

    /// Record the active camera's rotation keys into this file
    #[arg(long)]
    rotation_keys: Option<PathBuf>,
}

fn parse_key_press(s: &str) -> Result<(u64, Key), String> {
    let (frame, key) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:KEY, got '{s}'"))?;
    let frame = frame
        .trim()
        .parse()
        .map_err(|e| format!("invalid frame '{frame}': {e}"))?;
    let mut chars = key.trim().chars();
    match (chars.next().and_then(Key::from_char), chars.next()) {
        (Some(key), None) => Ok((frame, key)),
        _ => Err(format!("unknown key '{key}'")),
    }
}

fn run(cli: Cli) -> Result<(), DemoError> {
    let mut config = DungeonConfig::load_or_default(&cli.config)?;
    config.expert_mode |= cli.expert;
    config.repeat_mode |= cli.repeat;
    config.developer_mode |= cli.developer;

    if cli.write_config {
        config.save(&cli.config)?;
        tracing::info!("Wrote configuration to {:?}", cli.config);
        return Ok(());
    }

    let options = DemoOptions {
        frames: cli.frames,
        delta_time: cli.dt,
        seed: cli.seed,
        in_memory: cli.in_memory,
        key_presses: cli.keys,
        rotation_keys: cli.rotation_keys,
    };

    let report = demo::run(config, &options)?;
    println!("{report:#}");
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Dungeon demo v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        tracing::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}
