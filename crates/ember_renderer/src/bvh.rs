//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in the scene [`Arena`] next to the primitives and refer to
//! their children by index. Each level splits along a randomly chosen axis
//! after sorting its range by box minimum. A range of one object becomes a
//! node whose two children are the same index; traversal visits it once.

use crate::{Arena, BuildError, HitRecord, Hittable};
use ember_math::{Aabb, Interval, Ray};
use rand::{Rng, RngCore};

/// Interior node of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    left: usize,
    right: usize,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a hierarchy over `arena` objects `[start, end)`.
    ///
    /// The range is reordered in place and new nodes are appended to the
    /// arena. Every object in the range must report a valid bounding box.
    pub fn build(
        arena: &mut Arena,
        start: usize,
        end: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BuildError> {
        if start >= end {
            return Err(BuildError::EmptyRange { start, end });
        }
        for index in start..end {
            arena.checked_box(index)?;
        }
        Self::build_range(arena, start, end, rng)
    }

    fn build_range(
        arena: &mut Arena,
        start: usize,
        end: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BuildError> {
        let axis = rng.gen_range(0..3);
        arena.sort_range_by_axis(start, end, axis);

        let (left, right) = match end - start {
            1 => (start, start),
            2 => (start, start + 1),
            n => {
                let mid = start + n / 2;
                let left = Self::build_range(arena, start, mid, rng)?;
                let left = arena.push(Hittable::Bvh(left));
                let right = Self::build_range(arena, mid, end, rng)?;
                let right = arena.push(Hittable::Bvh(right));
                (left, right)
            }
        };

        let bbox = Aabb::surrounding(&arena.checked_box(left)?, &arena.checked_box(right)?);
        Ok(Self { left, right, bbox })
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Closest hit below this node.
    pub fn hit<'a>(&self, arena: &'a Arena, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let left = arena.get(self.left).hit(arena, ray, ray_t);
        if self.left == self.right {
            return left;
        }

        // Only check right up to closest hit
        let right_t = left.map_or(ray_t, |rec| ray_t.with_max(rec.t));
        let right = arena.get(self.right).hit(arena, ray, right_t);

        match (left, right) {
            (Some(l), Some(r)) => Some(if r.t < l.t { r } else { l }),
            (l, r) => l.or(r),
        }
    }

    /// Every child box lies inside its parent's box, all the way down.
    pub fn check_bounds(&self, arena: &Arena) -> bool {
        [self.left, self.right].into_iter().all(|index| {
            let child = arena.get(index);
            let inside = child
                .bounding_box(arena.meshes())
                .is_some_and(|b| self.bbox.contains_box(&b));
            inside
                && match child {
                    Hittable::Bvh(node) => node.check_bounds(arena),
                    _ => true,
                }
        })
    }
}
