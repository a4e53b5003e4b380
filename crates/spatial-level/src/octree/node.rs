//! Octree node and entry types.

use crate::BoundingBox;

use super::ObjectHandle;

/// Index of a node inside an [`Octree`](super::Octree)'s node arena.
///
/// Node ids stay valid until the tree is cleared or rebuilt, since nodes are
/// never merged or removed individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every tree.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index of this node.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    #[inline]
    pub(crate) fn offset(self, octant: usize) -> Self {
        Self(self.0 + octant)
    }
}

/// An object handle paired with the bounds it was inserted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctreeEntry<H> {
    /// Caller-owned handle. The tree never dereferences it.
    pub object: H,
    /// Bounds supplied at insertion time.
    pub bounds: BoundingBox,
}

impl<H: ObjectHandle> OctreeEntry<H> {
    pub fn new(object: H, bounds: BoundingBox) -> Self {
        Self { object, bounds }
    }
}

/// A node in the octree.
///
/// A leaf holds entries directly. Once a leaf subdivides it becomes internal
/// for good: it owns 8 children, allocated contiguously in the arena, and
/// keeps only the entries that straddle more than one child.
#[derive(Debug, Clone)]
pub struct OctreeNode<H> {
    bounds: BoundingBox,
    entries: Vec<OctreeEntry<H>>,
    /// First of the eight contiguous children, if subdivided.
    first_child: Option<NodeId>,
    depth: u32,
}

impl<H: ObjectHandle> OctreeNode<H> {
    /// Creates an empty leaf covering `bounds` at the given depth.
    pub(crate) fn new(bounds: BoundingBox, depth: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            first_child: None,
            depth,
        }
    }

    /// Returns the region of space this node covers.
    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Returns the entries stored directly at this node.
    #[inline]
    pub fn entries(&self) -> &[OctreeEntry<H>] {
        &self.entries
    }

    /// Returns the depth of this node (0 for the root).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Checks if this node has never been subdivided.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }

    /// Returns the child covering `octant`, or `None` for a leaf.
    ///
    /// # Panics
    /// Panics if `octant >= 8`.
    pub fn child(&self, octant: usize) -> Option<NodeId> {
        assert!(octant < 8, "Octant index must be in 0..8");
        self.first_child.map(|first| first.offset(octant))
    }

    /// Iterates over the ids of all 8 children (empty for a leaf).
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.first_child
            .into_iter()
            .flat_map(|first| (0..8).map(move |octant| first.offset(octant)))
    }

    #[inline]
    pub(crate) fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    #[inline]
    pub(crate) fn set_first_child(&mut self, first: NodeId) {
        debug_assert!(self.first_child.is_none(), "Octree nodes subdivide only once");
        self.first_child = Some(first);
    }

    #[inline]
    pub(crate) fn push_entry(&mut self, entry: OctreeEntry<H>) {
        self.entries.push(entry);
    }

    /// Removes the entry for `object`, returning it if present.
    pub(crate) fn remove_entry(&mut self, object: H) -> Option<OctreeEntry<H>> {
        let position = self.entries.iter().position(|e| e.object == object)?;
        Some(self.entries.remove(position))
    }

    #[inline]
    pub(crate) fn take_entries(&mut self) -> Vec<OctreeEntry<H>> {
        std::mem::take(&mut self.entries)
    }
}
