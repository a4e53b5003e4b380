//! Dynamic octree for indexing level objects by bounding box.
//!
//! The octree covers a fixed world volume and stores opaque, caller-owned
//! handles alongside the bounds supplied at insertion. It supports:
//!
//! - Insert, remove and update by handle, with O(1) node lookup on removal
//! - Box, sphere, point and (approximate) nearest queries
//! - Depth-first traversal through a visitor, for debugging and drawing
//!
//! # Example
//!
//! ```ignore
//! use spatial_level::{BoundingBox, Octree};
//! use nalgebra::Point3;
//!
//! let world = BoundingBox::from_coords(0.0, 0.0, 0.0, 100.0, 100.0, 100.0);
//! let mut tree = Octree::with_params(world, 6, 4);
//!
//! tree.insert(1u64, BoundingBox::from_coords(10.0, 0.0, 10.0, 12.0, 3.0, 12.0));
//! let nearby = tree.query_sphere(Point3::new(11.0, 1.0, 11.0), 5.0);
//! ```
//!
//! # Architecture
//!
//! - [`Octree`]: The container, owning a node arena and the handle index
//! - [`OctreeNode`]: A node with its bounds, entries and optional children
//! - [`OctreeVisitor`]: Visitor trait for custom traversal behavior

use std::fmt::Debug;
use std::hash::Hash;

mod node;
mod tree;
mod visitor;

pub use node::{NodeId, OctreeEntry, OctreeNode};
pub use tree::{NEAREST_PROBE_RADIUS, Octree, OctreeStats};
pub use visitor::{CollectingVisitor, FnVisitor, OctreeVisitor};

/// Requirements for a handle stored in an [`Octree`].
///
/// Handles are small copyable keys (entity ids, slot indices) that the tree
/// hashes for its reverse index. Implemented for every qualifying type.
pub trait ObjectHandle: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> ObjectHandle for T {}
