//! Hit records and the closed set of primitives stored in the scene arena.

use crate::{Arena, BvhNode, Material, MeshEntry, Sphere, Triangles};
use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Record of a ray-primitive intersection.
///
/// The material is borrowed from the scene, so a record never outlives the
/// world it was produced from.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Ray parameter at the hit
    pub t: f32,
    /// Hit point
    pub p: Vec3,
    /// Geometric outward normal (unit length)
    pub normal: Vec3,
    /// Material at the hit point
    pub material: &'a Material,
    /// Surface coordinates; barycentrics for triangles
    pub uv: Vec2,
}

/// Anything a ray can hit.
///
/// Every variant lives in an [`Arena`]; hierarchy nodes refer to their
/// children by arena index.
#[derive(Debug, Clone)]
pub enum Hittable {
    Sphere(Sphere),
    Triangles(Triangles),
    Bvh(BvhNode),
}

impl Hittable {
    /// Closest hit strictly inside `ray_t`.
    pub fn hit<'a>(
        &'a self,
        arena: &'a Arena,
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<HitRecord<'a>> {
        match self {
            Hittable::Sphere(sphere) => sphere.hit(ray, ray_t),
            Hittable::Triangles(triangles) => triangles.hit(arena.meshes(), ray, ray_t),
            Hittable::Bvh(node) => node.hit(arena, ray, ray_t),
        }
    }

    /// Bounding box, or `None` if the primitive cannot be bounded.
    pub fn bounding_box(&self, meshes: &[MeshEntry]) -> Option<Aabb> {
        match self {
            Hittable::Sphere(sphere) => Some(sphere.bounding_box()),
            Hittable::Triangles(triangles) => triangles.bounding_box(meshes),
            Hittable::Bvh(node) => Some(node.bounding_box()),
        }
    }
}

impl From<Sphere> for Hittable {
    fn from(sphere: Sphere) -> Self {
        Hittable::Sphere(sphere)
    }
}

impl From<Triangles> for Hittable {
    fn from(triangles: Triangles) -> Self {
        Hittable::Triangles(triangles)
    }
}

impl From<BvhNode> for Hittable {
    fn from(node: BvhNode) -> Self {
        Hittable::Bvh(node)
    }
}
