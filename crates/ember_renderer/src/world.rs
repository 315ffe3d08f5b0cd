//! Scene assembly and the immutable world shared by the render threads.

use crate::{
    Arena, BuildError, BvhNode, HitRecord, Hittable, Material, MeshEntry, Sphere, Triangles,
    MESH_CHUNK_SIZE,
};
use ember_core::Mesh;
use ember_math::{Aabb, Interval, Ray, Vec3};
use log::{debug, info, warn};
use rand::RngCore;

/// Collects primitives before the hierarchy is built.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    arena: Arena,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: Material) -> usize {
        self.add_hittable(Sphere::new(center, radius, material))
    }

    pub fn add_hittable(&mut self, object: impl Into<Hittable>) -> usize {
        self.arena.push(object.into())
    }

    /// Add a mesh, split into leaves of [`MESH_CHUNK_SIZE`] faces.
    ///
    /// Returns the number of leaves created.
    pub fn add_mesh(&mut self, mesh: Mesh, material: Material) -> Result<usize, BuildError> {
        mesh.validate()?;
        let face_count = mesh.triangle_count();
        if face_count == 0 {
            warn!("Skipping mesh with no faces");
            return Ok(0);
        }

        let mesh_index = self.arena.push_mesh(MeshEntry { mesh, material });
        let mut chunks = 0;
        for start in (0..face_count).step_by(MESH_CHUNK_SIZE) {
            let end = (start + MESH_CHUNK_SIZE).min(face_count);
            self.arena.push(Triangles::new(mesh_index, start, end).into());
            chunks += 1;
        }

        debug!("Added mesh {} with {} faces in {} chunks", mesh_index, face_count, chunks);
        Ok(chunks)
    }

    /// Number of primitives added so far.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Build the hierarchy and freeze the scene.
    pub fn build(mut self, rng: &mut dyn RngCore) -> Result<World, BuildError> {
        let primitive_count = self.arena.len();
        let root = if primitive_count == 0 {
            warn!("Scene is empty; every ray will miss");
            None
        } else {
            Some(BvhNode::build(&mut self.arena, 0, primitive_count, rng)?)
        };

        let world = World {
            arena: self.arena,
            root,
            primitive_count,
        };
        info!(
            "Built scene: {} primitives, {} meshes, {} BVH nodes",
            primitive_count,
            world.arena.meshes().len(),
            world.node_count()
        );
        Ok(world)
    }
}

/// A built scene. Read-only; share it between threads with `Arc`.
#[derive(Debug)]
pub struct World {
    arena: Arena,
    root: Option<BvhNode>,
    primitive_count: usize,
}

impl World {
    /// Closest hit strictly inside `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.root.as_ref()?.hit(&self.arena, ray, ray_t)
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        self.root.as_ref().map(BvhNode::bounding_box)
    }

    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Number of spheres and mesh leaves.
    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    /// Number of hierarchy nodes, including the root.
    pub fn node_count(&self) -> usize {
        let stored = self.arena.len() - self.primitive_count;
        stored + usize::from(self.root.is_some())
    }
}
