//! Ember renderer - CPU Monte Carlo path tracing.
//!
//! The pieces, from the bottom up:
//!
//! - geometry: [`Sphere`], [`Triangles`] (a chunk of a shared mesh) and the
//!   [`BvhNode`] hierarchy, all stored in one index-addressed [`Arena`]
//! - shading: [`Material`] and [`Texture`]
//! - the [`Camera`] and the iterative integrator ([`trace_ray`])
//! - the tiled, multi-threaded frontend ([`RenderSession`])
//!
//! Scenes are assembled with a [`SceneBuilder`] and frozen into a [`World`],
//! which is immutable and shared between worker threads behind an `Arc`.

mod arena;
mod bvh;
mod camera;
mod error;
mod framebuffer;
mod hittable;
mod material;
mod pool;
mod renderer;
mod sampling;
mod scene;
mod session;
mod settings;
mod sphere;
mod texture;
mod tile;
mod triangle;
mod world;

pub use arena::{Arena, MeshEntry};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{BuildError, ConfigError, RenderError};
pub use framebuffer::FrameBuffer;
pub use hittable::{HitRecord, Hittable};
pub use material::{reflect, refract, schlick, Color, Material, ScatterResult};
pub use pool::{run_workers, worker_rngs, WorkQueue, WorkerRng};
pub use renderer::{color_to_rgb8, gamma_correct, sky_color, trace_ray, Renderer, T_MIN};
pub use sampling::{gen_f32, random_color, random_in_unit_disk, random_on_unit_sphere};
pub use scene::{random_scene, showcase_scene};
pub use session::{render_image, RenderSession};
pub use settings::{CameraSettings, RenderSettings, TileOrder};
pub use sphere::Sphere;
pub use texture::{ImageFilter, Texture};
pub use tile::{generate_tiles, tile_size, Tile};
pub use triangle::{Triangle, TriangleHit, Triangles, MESH_CHUNK_SIZE};
pub use world::{SceneBuilder, World};

/// Re-export the math and data types that appear in this crate's API
pub use ember_core::{Mesh, Rgb8, RgbImage};
pub use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};
