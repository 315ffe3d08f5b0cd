use crate::{Interval, Ray, Vec3};

/// Minimum extent along any axis for boxes built with [`Aabb::from_points`].
const MIN_EXTENT: f32 = 0.0001;

/// Axis-Aligned Bounding Box for the BVH.
///
/// A box is valid only when `min < max` on every axis. Invalid boxes
/// (zero or negative extent, NaN corners) are never reported as hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its corners exactly as given.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    ///
    /// Axes thinner than [`MIN_EXTENT`] are padded so that flat geometry
    /// (a triangle lying in a coordinate plane) still gets a valid box.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            min: a.min(b),
            max: a.max(b),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Smallest box containing both boxes.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// `min < max` on every axis.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.cmplt(self.max).all()
    }

    /// Returns true if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Lower corner coordinate along an axis (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis_min(&self, axis: usize) -> f32 {
        self.min[axis]
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. A zero direction component gives an infinite inverse
    /// which compares correctly against finite bounds; the `0 * inf` NaN of
    /// an origin lying exactly on a slab plane is dropped by `f32::max`/`min`
    /// and leaves the interval unchanged.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        if !self.is_valid() {
            return false;
        }

        let inv_d = r.inv_direction();
        for axis in 0..3 {
            let mut t0 = (self.min[axis] - r.origin[axis]) * inv_d[axis];
            let mut t1 = (self.max[axis] - r.origin[axis]) * inv_d[axis];
            if inv_d[axis] < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }

    fn pad_to_minimums(&mut self) {
        for axis in 0..3 {
            if self.max[axis] - self.min[axis] < MIN_EXTENT {
                self.min[axis] -= MIN_EXTENT / 2.0;
                self.max[axis] += MIN_EXTENT / 2.0;
            }
        }
    }

    /// The neutral element of [`Aabb::surrounding`]. Not a valid box.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };
}
