#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Goblin Siege enemy demo.

mod simulation;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use goblin_siege_rendering::{Color, Presentation, RecordingRenderer, RenderingBackend};
use goblin_siege_rendering_macroquad::MacroquadBackend;
use goblin_siege_world::TemplateBook;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::simulation::{Scenario, ScenarioConfig};

const DEFAULT_TEMPLATES: &str = include_str!("../../../assets/enemy_templates.toml");
const HEADLESS_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Command-line arguments for the Goblin Siege demo.
#[derive(Debug, Parser)]
#[command(name = "goblin-siege", about = "Runs the Goblin Siege enemy demo.")]
struct CliArgs {
    /// Enemy template file; the bundled templates are used when omitted.
    #[arg(long, value_name = "PATH")]
    templates: Option<PathBuf>,
    /// Sprite manifest listing the enemy sprite sheets.
    #[arg(long, value_name = "PATH", default_value = "assets/manifest.toml")]
    manifest: PathBuf,
    /// Runs the given number of fixed 60 Hz frames without opening a window.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
    /// Number of enemies per wave.
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
    wave_size: u32,
    /// Seed for wave composition and demo damage.
    #[arg(long, default_value_t = 0x6f62_6c69)]
    seed: u64,
    /// Synchronises presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Draws placeholder squares instead of loading sprite sheets.
    #[arg(long)]
    no_sprites: bool,
    /// Logs the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Goblin Siege command-line interface.
fn main() -> Result<()> {
    setup_logger();
    let args = CliArgs::parse();

    let templates = load_templates(args.templates.as_deref())?;
    let scenario = Scenario::new(
        templates,
        ScenarioConfig {
            wave_size: args.wave_size,
            seed: args.seed,
        },
    );
    info!("{}", scenario.banner());

    match args.headless {
        Some(frames) => run_headless(scenario, frames),
        None => run_windowed(scenario, &args),
    }
}

fn setup_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn load_templates(path: Option<&Path>) -> Result<TemplateBook> {
    match path {
        Some(path) => TemplateBook::load(path)
            .with_context(|| format!("failed to load templates from {}", path.display())),
        None => TemplateBook::from_toml_str(DEFAULT_TEMPLATES)
            .context("bundled enemy templates are invalid"),
    }
}

fn run_headless(mut scenario: Scenario, frames: u32) -> Result<()> {
    let mut renderer = RecordingRenderer::new();
    for _ in 0..frames {
        scenario.advance(HEADLESS_FRAME);
        renderer.clear();
        scenario.render(&mut renderer);
        scenario.count_draw_calls(renderer.commands().len());
    }

    let stats = scenario.stats();
    info!(
        frames = stats.frames,
        waves = stats.waves,
        spawned = stats.spawned,
        defeated = stats.defeated,
        reached_goal = stats.reached_goal,
        heals = stats.heals,
        damage_taken = stats.damage_taken,
        draw_calls = stats.draw_calls,
        "headless run finished"
    );
    Ok(())
}

fn run_windowed(mut scenario: Scenario, args: &CliArgs) -> Result<()> {
    let manifest = (!args.no_sprites).then(|| args.manifest.clone());
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_sprite_manifest(manifest);
    let presentation = Presentation::new("Goblin Siege", Color::from_rgb_u8(0x3a, 0x4a, 0x2f));

    backend.run(presentation, move |dt, renderer| {
        scenario.advance(dt);
        scenario.render(renderer);
    })
}
