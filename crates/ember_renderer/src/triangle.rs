//! Triangle intersection and mesh leaves.
//!
//! Meshes are not put into the hierarchy triangle by triangle. They are cut
//! into runs of [`MESH_CHUNK_SIZE`] consecutive faces, and each run becomes
//! one [`Triangles`] leaf that is scanned linearly.

use crate::{HitRecord, MeshEntry};
use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Faces per mesh leaf.
pub const MESH_CHUNK_SIZE: usize = 16;

/// Determinant threshold below which a ray counts as parallel.
const EPSILON: f32 = 1e-7;

/// Result of a ray-triangle test: ray parameter and barycentrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

/// A single triangle by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Möller-Trumbore intersection.
    ///
    /// Back faces are hit too. Returns the barycentrics of the hit with
    /// `u, v >= 0` and `u + v <= 1`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<TriangleHit> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        if a.abs() < EPSILON {
            return None; // Ray parallel to triangle
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        (t > EPSILON && ray_t.surrounds(t)).then_some(TriangleHit { t, u, v })
    }

    /// Unit geometric normal, following the winding order.
    pub fn normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(self.v2 - self.v0).normalize_or_zero()
    }
}

/// A run of consecutive faces `[start, end)` of one mesh in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangles {
    mesh: usize,
    start: usize,
    end: usize,
}

impl Triangles {
    pub fn new(mesh: usize, start: usize, end: usize) -> Self {
        Self { mesh, start, end }
    }

    pub fn mesh_index(&self) -> usize {
        self.mesh
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closest hit among the faces of this run.
    ///
    /// A run that reaches outside its mesh is never hit.
    pub fn hit<'a>(
        &self,
        meshes: &'a [MeshEntry],
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<HitRecord<'a>> {
        let entry = meshes.get(self.mesh)?;
        let mut closest: Option<(TriangleHit, Triangle)> = None;
        let mut range = ray_t;

        for face in self.start..self.end {
            let [v0, v1, v2] = entry.mesh.triangle(face)?;
            let triangle = Triangle::new(v0, v1, v2);
            if let Some(hit) = triangle.intersect(ray, range) {
                range = range.with_max(hit.t);
                closest = Some((hit, triangle));
            }
        }

        closest.map(|(hit, triangle)| HitRecord {
            t: hit.t,
            p: ray.at(hit.t),
            normal: triangle.normal(),
            material: &entry.material,
            uv: Vec2::new(hit.u, hit.v),
        })
    }

    /// Box around every vertex in the run, padded so flat runs stay valid.
    ///
    /// `None` for an empty run, or one whose faces or vertex indices fall
    /// outside its mesh.
    pub fn bounding_box(&self, meshes: &[MeshEntry]) -> Option<Aabb> {
        if self.is_empty() {
            return None;
        }
        let mesh = &meshes.get(self.mesh)?.mesh;
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for face in self.start..self.end {
            for p in mesh.triangle(face)? {
                min = min.min(p);
                max = max.max(p);
            }
        }
        Some(Aabb::from_points(min, max))
    }
}
