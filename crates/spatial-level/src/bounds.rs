//! Axis-aligned bounding box used by every spatial structure in the crate.

use nalgebra::{Point3, Vector3};

/// An axis-aligned box in 3D space, defined by its minimum and maximum corners.
///
/// `min <= max` on every axis is assumed. It is checked in debug builds only,
/// since boxes are built in hot per-frame code.
///
/// All containment tests are boundary-inclusive: a point on a face is inside,
/// and two boxes sharing a face intersect.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    min: Point3<f32>,
    max: Point3<f32>,
}

impl BoundingBox {
    /// Creates a box from its minimum and maximum corners.
    ///
    /// # Panics (debug builds only)
    /// Panics if `min` exceeds `max` on any axis.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "BoundingBox min must be <= max on all axes"
        );
        Self { min, max }
    }

    /// Creates a box from six scalar coordinates, `(min_x, min_y, min_z, max_x, max_y, max_z)`.
    pub fn from_coords(
        min_x: f32,
        min_y: f32,
        min_z: f32,
        max_x: f32,
        max_y: f32,
        max_z: f32,
    ) -> Self {
        Self::new(Point3::new(min_x, min_y, min_z), Point3::new(max_x, max_y, max_z))
    }

    /// Creates a box centered on `center` with the given full `size`.
    pub fn from_center_size(center: Point3<f32>, size: Vector3<f32>) -> Self {
        Self::from_center_half_extents(center, size * 0.5)
    }

    /// Creates a box centered on `center` extending `half_extents` along each axis.
    pub fn from_center_half_extents(center: Point3<f32>, half_extents: Vector3<f32>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a zero-size box located at `point`.
    #[inline]
    pub fn from_point(point: Point3<f32>) -> Self {
        Self { min: point, max: point }
    }

    /// Returns the tightest box enclosing all `points`, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |acc, p| acc.merge(&Self::from_point(p))))
    }

    /// Returns the minimum corner.
    #[inline]
    pub fn min(&self) -> Point3<f32> {
        self.min
    }

    /// Returns the maximum corner.
    #[inline]
    pub fn max(&self) -> Point3<f32> {
        self.max
    }

    /// Returns the center of the box.
    #[inline]
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Returns the full size of the box (`max - min`).
    #[inline]
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Returns the half-size of the box.
    #[inline]
    pub fn extents(&self) -> Vector3<f32> {
        self.size() * 0.5
    }

    /// Returns the volume of the box.
    pub fn volume(&self) -> f32 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// Returns the total area of the six faces.
    pub fn surface_area(&self) -> f32 {
        let s = self.size();
        2.0 * (s.x * s.y + s.y * s.z + s.z * s.x)
    }

    /// Checks whether `point` lies inside the box or on its boundary.
    #[inline]
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Checks whether `other` lies entirely within this box.
    #[inline]
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
            && other.min.z >= self.min.z
            && other.max.z <= self.max.z
    }

    /// Checks whether the two boxes overlap. Touching faces count as overlap.
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Returns a copy grown by `amount` on every side.
    ///
    /// A negative amount shrinks the box; the caller keeps it non-inverted.
    pub fn expand(&self, amount: f32) -> Self {
        let grow = Vector3::repeat(amount);
        Self::new(self.min - grow, self.max + grow)
    }

    /// Returns the smallest box enclosing both boxes.
    pub fn merge(&self, other: &BoundingBox) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Returns the point inside the box that is closest to `point`.
    ///
    /// Points already inside the box are returned unchanged.
    #[inline]
    pub fn closest_point(&self, point: Point3<f32>) -> Point3<f32> {
        Point3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Squared distance from `point` to the nearest point of the box (zero when inside).
    #[inline]
    pub fn distance_squared_to_point(&self, point: Point3<f32>) -> f32 {
        (self.closest_point(point) - point).norm_squared()
    }

    /// Checks whether a sphere touches the box, using the closest point on the box.
    #[inline]
    pub fn intersects_sphere(&self, center: Point3<f32>, radius: f32) -> bool {
        self.distance_squared_to_point(center) <= radius * radius
    }

    /// Returns the sub-box for octant `index` after splitting at the center on all axes.
    ///
    /// Bit 0 selects the high half along x, bit 1 along y, bit 2 along z.
    ///
    /// # Panics
    /// Panics if `index >= 8`.
    pub fn octant(&self, index: usize) -> Self {
        assert!(index < 8, "Octant index must be in 0..8");
        let c = self.center();
        let (min_x, max_x) = if index & 1 != 0 { (c.x, self.max.x) } else { (self.min.x, c.x) };
        let (min_y, max_y) = if index & 2 != 0 { (c.y, self.max.y) } else { (self.min.y, c.y) };
        let (min_z, max_z) = if index & 4 != 0 { (c.z, self.max.z) } else { (self.min.z, c.z) };
        Self::from_coords(min_x, min_y, min_z, max_x, max_y, max_z)
    }

    /// Returns the axis (0 = x, 1 = y, 2 = z) along which the box is thinnest.
    ///
    /// Ties resolve to the lowest axis index.
    pub fn thinnest_axis(&self) -> usize {
        let s = self.size();
        if s.x <= s.y && s.x <= s.z {
            0
        } else if s.y <= s.z {
            1
        } else {
            2
        }
    }

    /// Returns the eight corners, indexed with the same bit layout as [`octant`](Self::octant).
    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (lo, hi) = (self.min, self.max);
        std::array::from_fn(|i| {
            Point3::new(
                if i & 1 != 0 { hi.x } else { lo.x },
                if i & 2 != 0 { hi.y } else { lo.y },
                if i & 4 != 0 { hi.z } else { lo.z },
            )
        })
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::from_point(Point3::origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube_at(x: f32, y: f32, z: f32) -> BoundingBox {
        BoundingBox::from_coords(x, y, z, x + 1.0, y + 1.0, z + 1.0)
    }

    #[test]
    fn contains_point_inside_and_outside() {
        let b = BoundingBox::from_coords(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        assert!(b.contains_point(Point3::new(5.0, 5.0, 5.0)));
        assert!(!b.contains_point(Point3::new(10.1, 0.0, 0.0)));
    }

    #[test]
    fn contains_point_is_boundary_inclusive() {
        let b = BoundingBox::from_coords(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        assert!(b.contains_point(Point3::new(10.0, 0.0, 10.0)));
        assert!(b.contains_point(Point3::origin()));
    }

    #[test]
    fn merge_and_volume() {
        let a = BoundingBox::from_coords(0.0, 0.0, 0.0, 5.0, 5.0, 5.0);
        let b = BoundingBox::from_coords(3.0, 3.0, 3.0, 8.0, 8.0, 8.0);
        let merged = a.merge(&b);

        assert_eq!(merged, BoundingBox::from_coords(0.0, 0.0, 0.0, 8.0, 8.0, 8.0));
        assert_relative_eq!(merged.volume(), 512.0);
    }

    #[test]
    fn surface_area_of_box() {
        let b = BoundingBox::from_coords(0.0, 0.0, 0.0, 1.0, 2.0, 3.0);
        // 2 * (1*2 + 2*3 + 3*1)
        assert_relative_eq!(b.surface_area(), 22.0);
    }

    #[test]
    fn intersects_overlapping_and_touching() {
        let a = unit_cube_at(0.0, 0.0, 0.0);
        assert!(a.intersects(&unit_cube_at(0.5, 0.5, 0.5)));
        assert!(a.intersects(&unit_cube_at(1.0, 0.0, 0.0)));
        assert!(!a.intersects(&unit_cube_at(1.5, 0.0, 0.0)));
    }

    #[test]
    fn contains_other_box() {
        let outer = BoundingBox::from_coords(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        assert!(outer.contains(&unit_cube_at(2.0, 2.0, 2.0)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&unit_cube_at(9.5, 2.0, 2.0)));
    }

    #[test]
    fn expand_grows_every_side() {
        let b = unit_cube_at(0.0, 0.0, 0.0).expand(1.0);
        assert_eq!(b, BoundingBox::from_coords(-1.0, -1.0, -1.0, 2.0, 2.0, 2.0));
    }

    #[test]
    fn center_size_and_extents() {
        let b = BoundingBox::from_coords(0.0, 2.0, 4.0, 2.0, 6.0, 12.0);
        assert_eq!(b.center(), Point3::new(1.0, 4.0, 8.0));
        assert_eq!(b.size(), Vector3::new(2.0, 4.0, 8.0));
        assert_eq!(b.extents(), Vector3::new(1.0, 2.0, 4.0));

        let rebuilt = BoundingBox::from_center_size(b.center(), b.size());
        assert_eq!(rebuilt, b);
    }

    #[test]
    fn from_points_encloses_all() {
        let b = BoundingBox::from_points([
            Point3::new(1.0, -2.0, 3.0),
            Point3::new(-1.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 5.0),
        ])
        .unwrap();
        assert_eq!(b, BoundingBox::from_coords(-1.0, -2.0, 0.0, 1.0, 4.0, 5.0));
        assert!(BoundingBox::from_points(Vec::new()).is_none());
    }

    #[test]
    fn closest_point_and_sphere_test() {
        let b = BoundingBox::from_coords(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        assert_eq!(b.closest_point(Point3::new(15.0, 5.0, -3.0)), Point3::new(10.0, 5.0, 0.0));
        assert_relative_eq!(b.distance_squared_to_point(Point3::new(13.0, 14.0, 5.0)), 25.0);
        assert!(b.intersects_sphere(Point3::new(13.0, 14.0, 5.0), 5.0));
        assert!(!b.intersects_sphere(Point3::new(13.0, 14.0, 5.0), 4.9));
        assert!(b.intersects_sphere(Point3::new(5.0, 5.0, 5.0), 0.1));
    }

    #[test]
    fn octants_partition_the_box() {
        let b = BoundingBox::from_coords(0.0, 0.0, 0.0, 100.0, 100.0, 100.0);

        assert_eq!(b.octant(0), BoundingBox::from_coords(0.0, 0.0, 0.0, 50.0, 50.0, 50.0));
        assert_eq!(b.octant(1), BoundingBox::from_coords(50.0, 0.0, 0.0, 100.0, 50.0, 50.0));
        assert_eq!(b.octant(2), BoundingBox::from_coords(0.0, 50.0, 0.0, 50.0, 100.0, 50.0));
        assert_eq!(b.octant(4), BoundingBox::from_coords(0.0, 0.0, 50.0, 50.0, 50.0, 100.0));
        assert_eq!(b.octant(7), BoundingBox::from_coords(50.0, 50.0, 50.0, 100.0, 100.0, 100.0));

        let total: f32 = (0..8).map(|i| b.octant(i).volume()).sum();
        assert_relative_eq!(total, b.volume());
    }

    #[test]
    fn thinnest_axis_picks_smallest_extent() {
        assert_eq!(BoundingBox::from_coords(0.0, 0.0, 0.0, 0.2, 3.0, 2.0).thinnest_axis(), 0);
        assert_eq!(BoundingBox::from_coords(0.0, 0.0, 0.0, 2.0, 0.1, 2.0).thinnest_axis(), 1);
        assert_eq!(BoundingBox::from_coords(0.0, 0.0, 0.0, 2.0, 3.0, 0.5).thinnest_axis(), 2);
    }

    #[test]
    fn corners_match_octant_layout() {
        let b = unit_cube_at(0.0, 0.0, 0.0);
        let corners = b.corners();
        assert_eq!(corners[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(corners[3], Point3::new(1.0, 1.0, 0.0));
        assert_eq!(corners[7], Point3::new(1.0, 1.0, 1.0));
    }
}
