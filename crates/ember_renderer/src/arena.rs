//! Index-addressed storage for scene primitives.
//!
//! Hierarchy nodes are pushed into the same vector as the leaves they
//! bound, so the whole scene is two flat vectors with no shared pointers.

use crate::{BuildError, Hittable, Material};
use ember_core::Mesh;
use ember_math::Aabb;

/// A mesh together with the material applied to all its triangles.
#[derive(Debug, Clone)]
pub struct MeshEntry {
    pub mesh: Mesh,
    pub material: Material,
}

/// Flat storage for meshes and hittables.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    meshes: Vec<MeshEntry>,
    objects: Vec<Hittable>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a hittable and return its index.
    pub fn push(&mut self, object: Hittable) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Store a mesh and return its index.
    pub fn push_mesh(&mut self, entry: MeshEntry) -> usize {
        self.meshes.push(entry);
        self.meshes.len() - 1
    }

    #[inline]
    pub fn get(&self, index: usize) -> &Hittable {
        &self.objects[index]
    }

    pub fn objects(&self) -> &[Hittable] {
        &self.objects
    }

    pub fn meshes(&self) -> &[MeshEntry] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Bounding box of an object, rejecting missing and invalid boxes.
    pub fn checked_box(&self, index: usize) -> Result<Aabb, BuildError> {
        let bbox = self.objects[index]
            .bounding_box(&self.meshes)
            .ok_or(BuildError::MissingBoundingBox { index })?;
        if !bbox.is_valid() {
            return Err(BuildError::InvalidBoundingBox { index });
        }
        Ok(bbox)
    }

    /// Stable sort of `objects[start..end]` by box minimum along `axis`.
    ///
    /// Objects without a box sort first; callers validate the range before
    /// sorting.
    pub(crate) fn sort_range_by_axis(&mut self, start: usize, end: usize, axis: usize) {
        let meshes = &self.meshes;
        let key = |object: &Hittable| {
            object
                .bounding_box(meshes)
                .map_or(f32::NEG_INFINITY, |b| b.axis_min(axis))
        };
        self.objects[start..end].sort_by(|a, b| key(a).total_cmp(&key(b)));
    }
}
