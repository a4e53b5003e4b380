//! Sectors: the nodes of the portal visibility graph.

use std::collections::BTreeSet;

use nalgebra::Point3;

use crate::BoundingBox;

/// A named, box-shaped region of the level (a room, a corridor).
///
/// Sectors know the IDs of the portals attached to them, never the portals
/// themselves. The `visible` flag is maintained by
/// [`PortalSystem::update`](super::PortalSystem::update).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sector {
    id: String,
    bounds: BoundingBox,
    portal_ids: BTreeSet<String>,
    visible: bool,
}

impl Sector {
    /// Creates a sector with no portals, initially not visible.
    pub fn new(id: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            id: id.into(),
            bounds,
            portal_ids: BTreeSet::new(),
            visible: false,
        }
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
    pub fn center(&self) -> Point3<f32> {
        self.bounds.center()
    }

    #[inline]
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.bounds.contains_point(point)
    }

    /// Attaches a portal ID. Returns `false` if it was already attached.
    pub fn add_portal(&mut self, portal_id: impl Into<String>) -> bool {
        self.portal_ids.insert(portal_id.into())
    }

    /// Detaches a portal ID. Returns `false` if it was not attached.
    pub fn remove_portal(&mut self, portal_id: &str) -> bool {
        self.portal_ids.remove(portal_id)
    }

    #[inline]
    pub fn has_portal(&self, portal_id: &str) -> bool {
        self.portal_ids.contains(portal_id)
    }

    /// Iterates over attached portal IDs in sorted order.
    pub fn portal_ids(&self) -> impl Iterator<Item = &str> {
        self.portal_ids.iter().map(String::as_str)
    }

    #[inline]
    pub fn portal_count(&self) -> usize {
        self.portal_ids.len()
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
