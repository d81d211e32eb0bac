//! 3-D Axis Aligned Bounding Boxes.

use crate::common::*;
use crate::geometry::*;

/// 3-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Bounds3f {
    /// An empty box; the minimum and maximum are inverted so any union grows
    /// it from nothing.
    pub const EMPTY: Self = Self {
        p_min: Point3f::splat(INFINITY),
        p_max: Point3f::splat(-INFINITY),
    };

    /// Creates a new bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns true if the box contains no points.
    pub fn is_empty(&self) -> bool {
        self.p_max.x < self.p_min.x || self.p_max.y < self.p_min.y || self.p_max.z < self.p_min.z
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the index of which of the axes is longest.
    pub fn maximum_extent(&self) -> Axis {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            Axis::X
        } else if d.y > d.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Returns a box grown to contain the given point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns a box that contains both boxes.
    ///
    /// * `other` - The other box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }

    /// Returns the position of a point relative to the corners of the box,
    /// where a point at the minimum corner has offset (0, 0, 0) and one at
    /// the maximum corner has (1, 1, 1). Degenerate axes map to 0.
    ///
    /// * `p` - The point.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o = *p - self.p_min;
        let d = self.diagonal();
        for axis in Axis::ALL {
            o[axis] = if d[axis] > 0.0 { o[axis] / d[axis] } else { 0.0 };
        }
        o
    }

    /// Slab test against the ray segment `o + t * d` for `t` in
    /// `[t_min, t_max]`. Returns the entry/exit parameters on a hit.
    ///
    /// * `o`     - Ray origin.
    /// * `d`     - Ray direction.
    /// * `t_min` - Start of the segment.
    /// * `t_max` - End of the segment.
    pub fn intersect_p(&self, o: &Point3f, d: &Vector3f, t_min: Float, t_max: Float) -> Option<(Float, Float)> {
        let (mut t0, mut t1) = (t_min, t_max);
        for axis in Axis::ALL {
            let inv_dir = 1.0 / d[axis];
            let mut t_near = (self.p_min[axis] - o[axis]) * inv_dir;
            let mut t_far = (self.p_max[axis] - o[axis]) * inv_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            // NaN compares false, so axis-parallel rays starting on a slab
            // boundary keep the current interval.
            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}

impl Default for Bounds3f {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grows_from_nothing() {
        let b = Bounds3f::EMPTY
            .union_point(&Point3f::new(1.0, 2.0, 3.0))
            .union_point(&Point3f::new(-1.0, 0.0, 5.0));
        assert_eq!(b.p_min, Point3f::new(-1.0, 0.0, 3.0));
        assert_eq!(b.p_max, Point3f::new(1.0, 2.0, 5.0));
        assert!(Bounds3f::EMPTY.is_empty());
        assert!(!b.is_empty());
    }

    #[test]
    fn offset_handles_flat_axis() {
        let b = Bounds3f::new(Point3f::new(0.0, 0.0, 1.0), Point3f::new(2.0, 4.0, 1.0));
        assert_eq!(b.offset(&Point3f::new(1.0, 1.0, 1.0)), Vector3f::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn slab_test() {
        let b = Bounds3f::new(Point3f::splat(-1.0), Point3f::splat(1.0));
        let o = Point3f::new(0.0, 0.0, -5.0);
        let hit = b.intersect_p(&o, &Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY);
        assert_eq!(hit, Some((4.0, 6.0)));
        assert!(b.intersect_p(&o, &Vector3f::new(0.0, 0.0, -1.0), 0.0, INFINITY).is_none());
        assert!(b.intersect_p(&o, &Vector3f::new(0.0, 0.0, 1.0), 0.0, 3.0).is_none());
    }
}
