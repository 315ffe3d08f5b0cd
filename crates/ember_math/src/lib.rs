//! Ember math - value types shared by every Ember crate.
//!
//! Vectors and matrices come straight from `glam`; this crate adds the
//! ray-tracing specific types on top of them.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Integer division rounding up.
#[inline]
pub fn div_up(a: u32, b: u32) -> u32 {
    a.div_ceil(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.cross(b), Vec3::new(-3.0, 6.0, -3.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vec3_all_less_than() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert!(a.cmplt(Vec3::new(2.0, 3.0, 4.0)).all());
        assert!(!a.cmplt(Vec3::new(2.0, 2.0, 4.0)).all());
    }

    #[test]
    fn test_div_up() {
        assert_eq!(div_up(10, 5), 2);
        assert_eq!(div_up(11, 5), 3);
        assert_eq!(div_up(1, 64), 1);
        assert_eq!(div_up(1080, 64), 17);
        assert_eq!(div_up(u32::MAX, 64), u32::MAX / 64 + 1);
    }
}
