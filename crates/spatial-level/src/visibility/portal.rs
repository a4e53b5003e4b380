//! Portals: directed openings between two sectors.

use nalgebra::{Point3, Vector3};

use crate::BoundingBox;

/// An opening (doorway, window, corridor mouth) joining two sectors.
///
/// Sectors are referenced by ID only, so portals can be created before the
/// sectors they join. Visibility through a portal is one-sided: only a viewer
/// on the side the normal points to sees through it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Portal {
    id: String,
    bounds: BoundingBox,
    sector_a: String,
    sector_b: String,
    normal: Vector3<f32>,
    open: bool,
}

impl Portal {
    /// Creates an open portal with a normal derived from its bounds.
    ///
    /// The normal is the positive unit axis along which `bounds` is thinnest,
    /// which matches a doorway modelled as a flat slab.
    pub fn new(
        id: impl Into<String>,
        bounds: BoundingBox,
        sector_a: impl Into<String>,
        sector_b: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            bounds,
            sector_a: sector_a.into(),
            sector_b: sector_b.into(),
            normal: Self::derive_normal(&bounds),
            open: true,
        }
    }

    /// Replaces the derived normal with an explicit one.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.set_normal(normal);
        self
    }

    /// Returns the unit vector along the thinnest axis of `bounds`.
    pub fn derive_normal(bounds: &BoundingBox) -> Vector3<f32> {
        let mut normal = Vector3::zeros();
        normal[bounds.thinnest_axis()] = 1.0;
        normal
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    #[inline]
    pub fn sector_a(&self) -> &str {
        &self.sector_a
    }

    #[inline]
    pub fn sector_b(&self) -> &str {
        &self.sector_b
    }

    /// Returns the unit normal of the portal.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Sets the normal, normalizing it.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn set_normal(&mut self, normal: Vector3<f32>) {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Portal normal cannot be zero");
        self.normal = normal / norm;
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        self.bounds.center()
    }

    /// Closed portals (shut doors) block visibility regardless of direction.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Checks whether `point` is on the side of the portal its normal faces.
    ///
    /// Points exactly on the portal plane cannot see through it.
    #[inline]
    pub fn is_visible_from(&self, point: Point3<f32>) -> bool {
        (point - self.center()).dot(&self.normal) > 0.0
    }

    /// Given one side of the portal, returns the sector on the other side.
    ///
    /// Returns `None` if `from` is neither of the portal's sectors.
    pub fn get_other_sector(&self, from: &str) -> Option<&str> {
        if from == self.sector_a {
            Some(&self.sector_b)
        } else if from == self.sector_b {
            Some(&self.sector_a)
        } else {
            None
        }
    }

    /// Checks whether this portal joins `a` and `b`, in either order.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.sector_a == a && self.sector_b == b) || (self.sector_a == b && self.sector_b == a)
    }

    /// Checks whether `sector` is one of the portal's two sides.
    #[inline]
    pub fn touches(&self, sector: &str) -> bool {
        self.sector_a == sector || self.sector_b == sector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A doorway in the x = 10 wall, thin along x.
    fn doorway() -> Portal {
        Portal::new(
            "door",
            BoundingBox::from_coords(9.9, 0.0, 4.0, 10.1, 3.0, 6.0),
            "hall",
            "kitchen",
        )
    }

    #[test]
    fn normal_derived_from_thinnest_axis() {
        assert_eq!(doorway().normal(), Vector3::new(1.0, 0.0, 0.0));

        let hatch = Portal::new(
            "hatch",
            BoundingBox::from_coords(0.0, 4.95, 0.0, 2.0, 5.05, 2.0),
            "cellar",
            "hall",
        );
        assert_eq!(hatch.normal(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn explicit_normal_is_normalized() {
        let portal = doorway().with_normal(Vector3::new(-3.0, 0.0, 0.0));
        assert_relative_eq!(portal.normal(), Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "Portal normal cannot be zero")]
    fn zero_normal_panics() {
        let _ = doorway().with_normal(Vector3::zeros());
    }

    #[test]
    fn visibility_is_directional() {
        let portal = doorway();
        assert!(portal.is_visible_from(Point3::new(15.0, 1.0, 5.0)));
        assert!(!portal.is_visible_from(Point3::new(5.0, 1.0, 5.0)));
        // On the plane through the center.
        assert!(!portal.is_visible_from(Point3::new(10.0, 1.0, 5.0)));

        let flipped = doorway().with_normal(Vector3::new(-1.0, 0.0, 0.0));
        assert!(flipped.is_visible_from(Point3::new(5.0, 1.0, 5.0)));
    }

    #[test]
    fn other_sector_lookup() {
        let portal = doorway();
        assert_eq!(portal.get_other_sector("hall"), Some("kitchen"));
        assert_eq!(portal.get_other_sector("kitchen"), Some("hall"));
        assert_eq!(portal.get_other_sector("attic"), None);
    }

    #[test]
    fn connects_either_order() {
        let portal = doorway();
        assert!(portal.connects("hall", "kitchen"));
        assert!(portal.connects("kitchen", "hall"));
        assert!(!portal.connects("hall", "attic"));
        assert!(portal.touches("kitchen"));
        assert!(!portal.touches("attic"));
    }

    #[test]
    fn portals_start_open() {
        let mut portal = doorway();
        assert!(portal.is_open());
        portal.set_open(false);
        assert!(!portal.is_open());
    }
}
