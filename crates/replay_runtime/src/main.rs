//! DAVIS Replay Runtime
//!
//! Loads a recording, wires the optional annotation sidecar and runs the
//! playback loop in a window (or headless).

mod cli;
mod headless;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use headless::HeadlessDisplay;
use replay_annotate::SidecarOverlay;
use replay_core::{run, Player, RateCommand, SourceMode};
use replay_render::{DisplayConfig, WindowDisplay};
use replay_services::KeyBindings;
use std::time::Duration;

/// Pace of headless ticks.
const HEADLESS_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = cli.settings().context("failed to load settings")?;
    if cli.dump_settings {
        println!("{}", settings.to_json());
        return Ok(());
    }

    tracing::info!("DAVIS Replay v{}", replay_core::VERSION);

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let mode = SourceMode::from(cli.mode);
    let source = settings
        .source_config(mode)
        .decode(&bytes)
        .with_context(|| format!("failed to decode {} as {mode}", cli.input.display()))?;
    let geometry = source.geometry();

    let mut player = Player::new(source);
    if mode == SourceMode::Events && settings.annotation.enabled {
        let overlay = SidecarOverlay::for_recording(&cli.input, &settings.annotation.suffix);
        tracing::info!(path = %overlay.path().display(), "watching annotation sidecar");
        player = player.with_overlay(Box::new(overlay));
    }
    for _ in 0..cli.start_rate {
        player.command(RateCommand::Increase);
    }

    match cli.headless_ticks {
        Some(ticks) => {
            let mut display = HeadlessDisplay::new(ticks, HEADLESS_INTERVAL);
            run(&mut player, &mut display)?;
        }
        None => {
            let config = DisplayConfig {
                title: settings.display.title.clone(),
                scale: settings.display.scale,
                mode: settings.display.mode,
                bindings: KeyBindings::from_settings(&settings.input),
            };
            let mut display =
                WindowDisplay::new(config, geometry).context("failed to open display")?;
            run(&mut player, &mut display).context("display failed")?;
        }
    }

    Ok(())
}
