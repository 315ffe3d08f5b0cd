//! Ember command-line host.
//!
//! Usage: `ember_host [settings.json] [output.png] [texture.png]`
//!
//! Renders the showcase scene with the given settings (defaults when the
//! file is omitted), reporting progress while the workers run, and writes
//! the finished frame as a PNG.

use anyhow::{Context, Result};
use ember_core::RgbImage;
use ember_renderer::{showcase_scene, RenderSession, RenderSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

fn load_settings(path: Option<&Path>) -> Result<RenderSettings> {
    let Some(path) = path else {
        log::info!("No settings file given, using defaults");
        return Ok(RenderSettings::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings from {}", path.display()))?;
    let settings: RenderSettings = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse settings in {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

fn save_png(path: &Path, frame: &RgbImage) -> Result<()> {
    image::save_buffer(
        path,
        bytemuck::cast_slice(frame.pixels()),
        frame.width(),
        frame.height(),
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("failed to write {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Ember");

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let settings_path = args.next();
    let output_path = args.next().unwrap_or_else(|| PathBuf::from("ember.png"));
    let texture_path = args.next();

    let settings = load_settings(settings_path.as_deref())?;
    settings.validate()?;

    let texture = texture_path
        .map(|path| RgbImage::open(&path).map(Arc::new))
        .transpose()?;

    let scene_start = Instant::now();
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let world = showcase_scene(&mut rng, texture)?.build(&mut rng)?;
    log::info!("Scene ready in {:.2?}", scene_start.elapsed());

    let mut session = RenderSession::start(&settings, Arc::new(world))?;
    while !session.is_finished() {
        thread::sleep(POLL_INTERVAL);
        let written = session.swap().len();
        log::info!(
            "Progress: {:5.1}% ({} pixels in front buffer)",
            session.progress() * 100.0,
            written
        );
    }

    let frame = session.wait()?;
    save_png(&output_path, &frame)?;
    log::info!("Wrote {}", output_path.display());

    Ok(())
}
