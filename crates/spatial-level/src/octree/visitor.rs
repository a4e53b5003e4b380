//! Visitor pattern for octree traversal.
//!
//! Visitors allow custom processing of nodes (debug drawing, statistics,
//! bulk export) without coupling the traversal to a specific use.

use super::node::{OctreeEntry, OctreeNode};
use super::ObjectHandle;

/// Visitor for processing nodes during octree traversal.
///
/// Nodes are visited depth-first, parents before children, children in
/// octant order.
pub trait OctreeVisitor<H> {
    /// Called once for each visited node.
    fn visit(&mut self, node: &OctreeNode<H>);
}

/// A simple visitor that collects the entries of every visited node.
#[derive(Debug)]
pub struct CollectingVisitor<H> {
    collected: Vec<OctreeEntry<H>>,
}

impl<H> Default for CollectingVisitor<H> {
    fn default() -> Self {
        Self { collected: Vec::new() }
    }
}

impl<H: ObjectHandle> CollectingVisitor<H> {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected entries.
    pub fn into_entries(self) -> Vec<OctreeEntry<H>> {
        self.collected
    }

    /// Returns a reference to the collected entries.
    pub fn entries(&self) -> &[OctreeEntry<H>] {
        &self.collected
    }
}

impl<H: ObjectHandle> OctreeVisitor<H> for CollectingVisitor<H> {
    fn visit(&mut self, node: &OctreeNode<H>) {
        self.collected.extend_from_slice(node.entries());
    }
}

/// A visitor that calls a closure for each node.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<H, F> OctreeVisitor<H> for FnVisitor<F>
where
    F: FnMut(&OctreeNode<H>),
{
    fn visit(&mut self, node: &OctreeNode<H>) {
        (self.func)(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundingBox;

    fn leaf_with(objects: &[u32]) -> OctreeNode<u32> {
        let bounds = BoundingBox::from_coords(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let mut node = OctreeNode::new(bounds, 0);
        for &object in objects {
            node.push_entry(OctreeEntry::new(object, bounds));
        }
        node
    }

    #[test]
    fn collecting_visitor_empty() {
        let visitor: CollectingVisitor<u32> = CollectingVisitor::new();
        assert!(visitor.entries().is_empty());
    }

    #[test]
    fn collecting_visitor_collects() {
        let mut visitor = CollectingVisitor::new();
        visitor.visit(&leaf_with(&[1, 2]));
        visitor.visit(&leaf_with(&[3]));

        let objects: Vec<u32> = visitor.into_entries().iter().map(|e| e.object).collect();
        assert_eq!(objects, vec![1, 2, 3]);
    }

    #[test]
    fn fn_visitor_calls_closure() {
        let mut count = 0;
        {
            let mut visitor = FnVisitor::new(|node: &OctreeNode<u32>| {
                count += node.entries().len();
            });
            visitor.visit(&leaf_with(&[4, 5]));
        }
        assert_eq!(count, 2);
    }
}
