//! Concurrent tiled rendering.
//!
//! A [`RenderSession`] owns one render in flight: the tile queue, the
//! frame buffer and a coordinator thread that runs the worker pool. The
//! caller polls it with [`RenderSession::swap`] while it runs.

use crate::pool::run_workers;
use crate::renderer::color_to_rgb8;
use crate::{
    generate_tiles, FrameBuffer, RenderError, RenderSettings, Renderer, Tile, WorkQueue, World,
};
use ember_core::{Rgb8, RgbImage};
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

pub struct RenderSession {
    framebuffer: Arc<FrameBuffer>,
    queue: Arc<WorkQueue<Tile>>,
    front: Vec<Rgb8>,
    handle: Option<JoinHandle<Result<(), RenderError>>>,
    tile_count: usize,
}

impl RenderSession {
    /// Validate `settings`, queue every tile and start rendering.
    ///
    /// Returns immediately; the workers run on a background thread.
    pub fn start(settings: &RenderSettings, world: Arc<World>) -> Result<Self, RenderError> {
        settings.validate()?;

        let (width, height) = (settings.width, settings.height);
        let tiles = generate_tiles(width, height, settings.tile_grid, settings.tile_order);
        let tile_count = tiles.len();
        let queue: Arc<WorkQueue<Tile>> = Arc::new(tiles.into_iter().collect());
        let framebuffer = Arc::new(FrameBuffer::new(width, height));
        let renderer = Renderer::new(settings, world);

        info!(
            "Rendering {}x{} at {} spp, {} bounces: {} tiles on {} workers",
            width,
            height,
            settings.samples_per_pixel,
            settings.max_bounces,
            tile_count,
            settings.worker_count
        );

        let worker_count = settings.worker_count;
        let seed = settings.seed;
        let handle = {
            let queue = Arc::clone(&queue);
            let framebuffer = Arc::clone(&framebuffer);
            thread::Builder::new()
                .name("ember-render".into())
                .spawn(move || -> Result<(), RenderError> {
                    let started = Instant::now();
                    run_workers(worker_count, &queue, seed, |_, tile, rng| {
                        let mut pixels = vec![[0u8; 3]; tile.pixel_count()];
                        let tile_width = tile.width;
                        renderer.render_tile(
                            |x, y, color| {
                                pixels[(y * tile_width + x) as usize] = color_to_rgb8(color);
                            },
                            width,
                            height,
                            tile.width,
                            tile.height,
                            tile.x,
                            tile.y,
                            rng,
                        );
                        framebuffer.insert_tile(&tile, &pixels);
                    })?;
                    info!("Render finished in {:.2?}", started.elapsed());
                    Ok(())
                })?
        };

        Ok(Self {
            framebuffer,
            queue,
            front: Vec::new(),
            handle: Some(handle),
            tile_count,
        })
    }

    /// Copy the latest back buffer into the front buffer and return it.
    ///
    /// Pixels are row-major with row 0 at the top of the image.
    pub fn swap(&mut self) -> &[Rgb8] {
        self.framebuffer.swap_into(&mut self.front);
        &self.front
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Fraction of pixels rendered so far.
    pub fn progress(&self) -> f32 {
        self.framebuffer.progress()
    }

    /// True once every worker has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Block until every queued tile is rendered and return the image.
    pub fn wait(mut self) -> Result<RgbImage, RenderError> {
        self.join()?;
        self.swap();
        let pixels = std::mem::take(&mut self.front);
        Ok(RgbImage::new(self.width(), self.height(), pixels)?)
    }

    /// Stop handing out tiles, let in-flight tiles finish and refresh the
    /// front buffer.
    pub fn shutdown(&mut self) -> Result<(), RenderError> {
        let dropped = self.queue.clear();
        if dropped > 0 {
            debug!("Shutdown dropped {} pending tiles", dropped);
        }
        self.join()?;
        self.swap();
        Ok(())
    }

    fn join(&mut self) -> Result<(), RenderError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| RenderError::WorkerPanicked)?,
            None => Ok(()),
        }
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(err) = self.shutdown() {
                warn!("Render session ended with an error: {}", err);
            }
        }
    }
}

/// Render a whole image, blocking until it is done.
pub fn render_image(settings: &RenderSettings, world: Arc<World>) -> Result<RgbImage, RenderError> {
    RenderSession::start(settings, world)?.wait()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, ConfigError, Material, SceneBuilder, TileOrder, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_settings(workers: usize) -> RenderSettings {
        let mut settings = RenderSettings {
            width: 24,
            height: 16,
            samples_per_pixel: 2,
            max_bounces: 4,
            worker_count: workers,
            tile_grid: [5, 3],
            seed: 11,
            ..Default::default()
        };
        settings.camera.look_from = Vec3::new(0.0, 0.0, 3.0);
        settings.camera.look_at = Vec3::ZERO;
        settings.camera.focus_distance = 3.0;
        settings.camera.vertical_fov = 40.0;
        settings.fit_aspect();
        settings
    }

    fn diffuse_ball() -> Arc<World> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut builder = SceneBuilder::new();
        builder.add_sphere(Vec3::ZERO, 1.0, Material::lambertian(Color::splat(0.5)));
        Arc::new(builder.build(&mut rng).unwrap())
    }

    #[test]
    fn test_every_pixel_written_once() {
        for workers in [1, 4, 16] {
            let settings = small_settings(workers);
            let session = RenderSession::start(&settings, diffuse_ball()).unwrap();
            let framebuffer = Arc::clone(&session.framebuffer);
            let image = session.wait().unwrap();

            assert_eq!(framebuffer.pixels_written(), settings.pixel_count());
            assert_eq!(image.pixels().len(), settings.pixel_count());
            // Nothing in this scene renders pure black
            assert!(image.pixels().iter().all(|p| *p != [0, 0, 0]), "workers = {workers}");
        }
    }

    #[test]
    fn test_same_seed_same_image_single_worker() {
        let settings = RenderSettings {
            tile_order: TileOrder::Scanline,
            ..small_settings(1)
        };
        let a = render_image(&settings, diffuse_ball()).unwrap();
        let b = render_image(&settings, diffuse_ball()).unwrap();
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_ball_is_darker_than_sky() {
        let settings = small_settings(4);
        let image = render_image(&settings, diffuse_ball()).unwrap();

        let center = image.get(12, 8);
        let corner = image.get(0, 0);
        let brightness = |p: Rgb8| p.iter().map(|&c| c as u32).sum::<u32>();
        assert!(brightness(center) < brightness(corner));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = RenderSettings {
            samples_per_pixel: 0,
            ..small_settings(2)
        };
        assert!(matches!(
            RenderSession::start(&settings, diffuse_ball()),
            Err(RenderError::Config(ConfigError::ZeroSamples))
        ));
    }

    #[test]
    fn test_shutdown_stops_early() {
        let settings = RenderSettings {
            width: 64,
            height: 64,
            tile_grid: [16, 16],
            ..small_settings(1)
        };
        let mut session = RenderSession::start(&settings, diffuse_ball()).unwrap();
        session.shutdown().unwrap();

        assert!(session.is_finished());
        assert!(session.progress() <= 1.0);
        assert_eq!(session.swap().len(), 64 * 64);
    }
}
