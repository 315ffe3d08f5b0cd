//! Render and camera settings.
//!
//! Both structs deserialize with `#[serde(default)]`, so a settings file
//! only needs the fields it wants to change.

use crate::ConfigError;
use ember_math::Vec3;
use serde::{Deserialize, Serialize};

/// Camera placement and lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vertical_fov: f32,
    /// Width over height
    pub aspect: f32,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f32,
    pub focus_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let look_from = Vec3::new(10.0, 2.0, 2.5);
        let look_at = Vec3::ZERO;
        Self {
            look_from,
            look_at,
            up: Vec3::Y,
            vertical_fov: 25.0,
            aspect: 16.0 / 9.0,
            aperture: 0.0,
            focus_distance: (look_from - look_at).length() * 0.66,
        }
    }
}

impl CameraSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vertical_fov.is_nan() || self.vertical_fov <= 0.0 || self.vertical_fov >= 180.0 {
            return Err(ConfigError::InvalidCamera("vertical fov must be in (0, 180)"));
        }
        if !self.aspect.is_finite() || self.aspect <= 0.0 {
            return Err(ConfigError::InvalidCamera("aspect must be positive"));
        }
        if self.aperture.is_nan() || self.aperture < 0.0 {
            return Err(ConfigError::InvalidCamera("aperture must not be negative"));
        }
        if self.focus_distance.is_nan() || self.focus_distance <= 0.0 {
            return Err(ConfigError::InvalidCamera("focus distance must be positive"));
        }
        let forward = self.look_from - self.look_at;
        if forward.length_squared() == 0.0 {
            return Err(ConfigError::InvalidCamera("look_from and look_at coincide"));
        }
        if forward.cross(self.up).length_squared() == 0.0 {
            return Err(ConfigError::InvalidCamera("up is parallel to the view direction"));
        }
        Ok(())
    }
}

/// Order in which tiles are handed to the workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileOrder {
    /// Row-major, top row first
    Scanline,
    /// Closest to the image center first
    #[default]
    CenterOut,
}

/// Everything a render session needs besides the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub max_bounces: u32,
    pub worker_count: usize,
    /// Number of tiles along x and y
    pub tile_grid: [u32; 2],
    pub tile_order: TileOrder,
    /// Seeds the worker generators and the hierarchy split axes
    pub seed: u64,
    pub camera: CameraSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            samples_per_pixel: 4,
            max_bounces: 20,
            worker_count: 16,
            tile_grid: [64, 64],
            tile_order: TileOrder::CenterOut,
            seed: 0,
            camera: CameraSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Set the camera aspect ratio from the image size.
    pub fn fit_aspect(&mut self) {
        if self.height > 0 {
            self.camera.aspect = self.width as f32 / self.height as f32;
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroImageSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.max_bounces == 0 {
            return Err(ConfigError::ZeroBounces);
        }
        if self.worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.tile_grid.contains(&0) {
            return Err(ConfigError::ZeroTileGrid(self.tile_grid));
        }
        self.camera.validate()
    }
}
