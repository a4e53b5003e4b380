//! Octree container, insertion and queries.

use std::collections::HashMap;

use log::{debug, trace, warn};
use nalgebra::Point3;

use crate::BoundingBox;
use crate::config::OctreeConfig;

use super::ObjectHandle;
use super::node::{NodeId, OctreeEntry, OctreeNode};
use super::visitor::OctreeVisitor;

/// Radius of the first probe made by [`Octree::query_nearest`].
pub const NEAREST_PROBE_RADIUS: f32 = 100.0;

/// A loose octree over a fixed world volume, indexing caller-owned handles by
/// their bounding boxes.
///
/// Each object is stored exactly once, at the deepest node with a single child
/// able to contain its whole box. Objects straddling a split plane stay at the
/// ancestor instead of being duplicated into several children.
///
/// # Construction
///
/// ```ignore
/// use spatial_level::{BoundingBox, Octree};
///
/// let world = BoundingBox::from_coords(0.0, 0.0, 0.0, 100.0, 100.0, 100.0);
/// let mut tree = Octree::new(world);
/// tree.insert(7u32, BoundingBox::from_coords(1.0, 1.0, 1.0, 2.0, 2.0, 2.0));
/// ```
///
/// # Storage
///
/// Nodes live in an arena. The eight children of a node are allocated
/// together and addressed by the id of the first one, and a handle-to-node map
/// gives O(1) lookup on removal. The tree only grows denser: leaves split once
/// they hold more than `max_objects_per_node` entries, and nodes are never
/// merged back. Use [`rebuild`](Self::rebuild) to compact.
#[derive(Debug, Clone)]
pub struct Octree<H> {
    nodes: Vec<OctreeNode<H>>,
    bounds: BoundingBox,
    max_depth: u32,
    max_objects_per_node: usize,
    object_index: HashMap<H, NodeId>,
}

/// Structural summary of an octree, mostly useful for debugging and tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OctreeStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub object_count: usize,
    /// Deepest node depth (0 when only the root exists).
    pub max_depth: u32,
    /// Entries held at internal nodes because they straddle a split plane.
    pub straddling_objects: usize,
}

impl<H: ObjectHandle> Octree<H> {
    /// Creates an empty octree with the default depth and leaf capacity (8 and 8).
    pub fn new(bounds: BoundingBox) -> Self {
        Self::from_config(bounds, &OctreeConfig::default())
    }

    /// Creates an empty octree with explicit subdivision parameters.
    ///
    /// # Panics
    /// Panics if `max_objects_per_node` is zero.
    pub fn with_params(bounds: BoundingBox, max_depth: u32, max_objects_per_node: usize) -> Self {
        assert!(max_objects_per_node > 0, "max_objects_per_node must be at least 1");
        Self {
            nodes: vec![OctreeNode::new(bounds, 0)],
            bounds,
            max_depth,
            max_objects_per_node,
            object_index: HashMap::new(),
        }
    }

    /// Creates an empty octree from a configuration block.
    ///
    /// # Panics
    /// Panics if `config.max_objects_per_node` is zero. Use
    /// [`OctreeConfig::validate`] first when the values come from outside.
    pub fn from_config(bounds: BoundingBox, config: &OctreeConfig) -> Self {
        Self::with_params(bounds, config.max_depth, config.max_objects_per_node)
    }

    /// Returns the world volume covered by the root node.
    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn max_objects_per_node(&self) -> usize {
        self.max_objects_per_node
    }

    /// Returns the number of objects currently indexed.
    #[inline]
    pub fn object_count(&self) -> usize {
        self.object_index.len()
    }

    /// Alias of [`object_count`](Self::object_count).
    #[inline]
    pub fn len(&self) -> usize {
        self.object_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.object_index.is_empty()
    }

    /// Returns the number of nodes, including the root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the depth of the deepest node (0 for a lone root).
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(OctreeNode::depth).max().unwrap_or(0)
    }

    /// Returns `true` if `object` is indexed.
    #[inline]
    pub fn contains(&self, object: H) -> bool {
        self.object_index.contains_key(&object)
    }

    /// Returns the bounds `object` was inserted with.
    pub fn get_bounds(&self, object: H) -> Option<BoundingBox> {
        let id = self.object_index.get(&object)?;
        self.nodes[id.index()]
            .entries()
            .iter()
            .find(|e| e.object == object)
            .map(|e| e.bounds)
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &OctreeNode<H> {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Returns the node with the given id, if it exists.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&OctreeNode<H>> {
        self.nodes.get(id.index())
    }

    /// Returns the id of the node currently holding `object`.
    #[inline]
    pub fn node_of(&self, object: H) -> Option<NodeId> {
        self.object_index.get(&object).copied()
    }

    /// Iterates over every live entry. The order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = &OctreeEntry<H>> {
        self.nodes.iter().flat_map(|node| node.entries().iter())
    }

    /// Inserts `object` with the given bounds.
    ///
    /// Returns `false`, leaving the tree untouched, if the object is already
    /// present. Bounds outside the world volume are accepted and kept at the
    /// root, where only whole-world style queries will find them.
    pub fn insert(&mut self, object: H, bounds: BoundingBox) -> bool {
        if self.object_index.contains_key(&object) {
            trace!("Octree insert rejected: {:?} already present", object);
            return false;
        }
        if !self.bounds.contains(&bounds) {
            warn!(
                "Object {:?} extends outside the octree volume; storing it at the root",
                object
            );
        }

        self.insert_from(NodeId::ROOT, OctreeEntry::new(object, bounds));
        true
    }

    /// Removes `object`. Returns `false` if it was not present.
    ///
    /// Nodes left empty are kept; the tree never collapses.
    pub fn remove(&mut self, object: H) -> bool {
        let Some(id) = self.object_index.remove(&object) else {
            return false;
        };
        let removed = self.nodes[id.index()].remove_entry(object);
        debug_assert!(removed.is_some(), "Octree index pointed at a node without the object");
        true
    }

    /// Moves `object` to new bounds by removing and re-inserting it.
    ///
    /// An object that was not present is simply inserted.
    pub fn update(&mut self, object: H, new_bounds: BoundingBox) -> bool {
        self.remove(object);
        self.insert(object, new_bounds)
    }

    /// Returns every object whose bounds intersect `query`.
    pub fn query_box(&self, query: &BoundingBox) -> Vec<H> {
        let mut result = Vec::new();
        self.collect_matching(NodeId::ROOT, &|b: &BoundingBox| b.intersects(query), &mut result);
        trace!("Octree box query returned {} objects", result.len());
        result.into_iter().map(|e| e.object).collect()
    }

    /// Returns every object whose bounds come within `radius` of `center`.
    ///
    /// A non-positive radius matches nothing.
    pub fn query_sphere(&self, center: Point3<f32>, radius: f32) -> Vec<H> {
        self.sphere_entries(center, radius)
            .into_iter()
            .map(|e| e.object)
            .collect()
    }

    /// Returns every object whose bounds contain `point`.
    ///
    /// This is a box query with a zero-size box.
    pub fn query_point(&self, point: Point3<f32>) -> Vec<H> {
        self.query_box(&BoundingBox::from_point(point))
    }

    /// Returns a nearby object, or `None` if the tree is empty.
    ///
    /// This is a cheap approximation, not an exact nearest-neighbour search:
    /// candidates come from a sphere query of [`NEAREST_PROBE_RADIUS`] (or,
    /// when that finds nothing, from every stored object), and they are
    /// ranked by the distance from `point` to the *center* of their bounds.
    /// A large object whose surface is close may lose to a small one further
    /// away, and an object just outside the probe is never considered while
    /// anything lies inside it.
    pub fn query_nearest(&self, point: Point3<f32>) -> Option<H> {
        let mut candidates = self.sphere_entries(point, NEAREST_PROBE_RADIUS);
        if candidates.is_empty() {
            // Every live entry, including ones stored outside the world volume
            candidates.extend(self.iter());
        }

        let mut best: Option<(H, f32)> = None;
        for entry in candidates {
            let distance = (entry.bounds.center() - point).norm_squared();
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((entry.object, distance)),
            }
        }
        best.map(|(object, _)| object)
    }

    /// Removes every object and resets the tree to a single empty root leaf.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(OctreeNode::new(self.bounds, 0));
        self.object_index.clear();
    }

    /// Re-inserts every live object into a fresh tree.
    ///
    /// Drops empty nodes left behind by removals and applies the current
    /// depth and leaf capacity.
    pub fn rebuild(&mut self) {
        let entries: Vec<OctreeEntry<H>> = self.iter().copied().collect();
        let old_nodes = self.nodes.len();
        self.clear();
        for entry in entries {
            self.insert_from(NodeId::ROOT, entry);
        }
        debug!(
            "Rebuilt octree: {} objects, {} -> {} nodes",
            self.object_count(),
            old_nodes,
            self.nodes.len()
        );
    }

    /// Changes the depth limit and rebuilds the tree.
    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.max_depth = max_depth;
        self.rebuild();
    }

    /// Changes the leaf capacity and rebuilds the tree.
    ///
    /// # Panics
    /// Panics if `max_objects_per_node` is zero.
    pub fn set_max_objects_per_node(&mut self, max_objects_per_node: usize) {
        assert!(max_objects_per_node > 0, "max_objects_per_node must be at least 1");
        self.max_objects_per_node = max_objects_per_node;
        self.rebuild();
    }

    /// Changes the world volume and rebuilds the tree.
    pub fn set_bounds(&mut self, bounds: BoundingBox) {
        self.bounds = bounds;
        self.rebuild();
    }

    /// Visits every node depth-first, parents before children.
    pub fn traverse<V: OctreeVisitor<H>>(&self, visitor: &mut V) {
        self.traverse_node(NodeId::ROOT, None, visitor);
    }

    /// Visits the nodes whose bounds intersect `region`, depth-first.
    pub fn traverse_within<V: OctreeVisitor<H>>(&self, region: &BoundingBox, visitor: &mut V) {
        self.traverse_node(NodeId::ROOT, Some(region), visitor);
    }

    /// Computes a structural summary of the tree.
    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats {
            node_count: self.nodes.len(),
            object_count: self.object_count(),
            ..OctreeStats::default()
        };
        for node in &self.nodes {
            stats.max_depth = stats.max_depth.max(node.depth());
            if node.is_leaf() {
                stats.leaf_count += 1;
            } else {
                stats.straddling_objects += node.entries().len();
            }
        }
        stats
    }

    /// Descends from `start` to the node that should hold `entry`, stores it
    /// there and subdivides that node if it became an overfull leaf.
    fn insert_from(&mut self, start: NodeId, entry: OctreeEntry<H>) {
        let mut id = start;
        while let Some(first) = self.nodes[id.index()].first_child() {
            match self.single_containing_child(first, &entry.bounds) {
                Some(child) => id = child,
                None => break,
            }
        }

        let node = &mut self.nodes[id.index()];
        node.push_entry(entry);
        self.object_index.insert(entry.object, id);

        let node = &self.nodes[id.index()];
        if node.is_leaf()
            && node.entries().len() > self.max_objects_per_node
            && node.depth() < self.max_depth
        {
            self.subdivide(id);
        }
    }

    /// Returns the only child able to fully contain `bounds`, if exactly one can.
    fn single_containing_child(&self, first: NodeId, bounds: &BoundingBox) -> Option<NodeId> {
        let mut found = None;
        for octant in 0..8 {
            let child = first.offset(octant);
            if self.nodes[child.index()].bounds().contains(bounds) {
                if found.is_some() {
                    return None;
                }
                found = Some(child);
            }
        }
        found
    }

    /// Splits a leaf into 8 children and redistributes its entries.
    fn subdivide(&mut self, id: NodeId) {
        let (bounds, depth) = {
            let node = &self.nodes[id.index()];
            (*node.bounds(), node.depth())
        };

        let first = NodeId::new(self.nodes.len());
        self.nodes
            .extend((0..8).map(|octant| OctreeNode::new(bounds.octant(octant), depth + 1)));

        let node = &mut self.nodes[id.index()];
        node.set_first_child(first);
        let entries = node.take_entries();
        debug!(
            "Subdivided octree node {} at depth {} ({} entries)",
            id.index(),
            depth,
            entries.len()
        );

        for entry in entries {
            self.insert_from(id, entry);
        }
    }

    /// Recursively collects entries passing `test`, descending only into
    /// children whose bounds also pass it.
    fn collect_matching<'a, F>(&'a self, id: NodeId, test: &F, out: &mut Vec<&'a OctreeEntry<H>>)
    where
        F: Fn(&BoundingBox) -> bool,
    {
        let node = &self.nodes[id.index()];
        out.extend(node.entries().iter().filter(|e| test(&e.bounds)));

        for child in node.children() {
            if test(self.nodes[child.index()].bounds()) {
                self.collect_matching(child, test, out);
            }
        }
    }

    fn sphere_entries(&self, center: Point3<f32>, radius: f32) -> Vec<&OctreeEntry<H>> {
        let mut result = Vec::new();
        if radius <= 0.0 {
            return result;
        }
        self.collect_matching(
            NodeId::ROOT,
            &|b: &BoundingBox| b.intersects_sphere(center, radius),
            &mut result,
        );
        trace!("Octree sphere query returned {} objects", result.len());
        result
    }

    fn traverse_node<V: OctreeVisitor<H>>(
        &self,
        id: NodeId,
        region: Option<&BoundingBox>,
        visitor: &mut V,
    ) {
        let node = &self.nodes[id.index()];
        if region.is_some_and(|r| !node.bounds().intersects(r)) {
            return;
        }
        visitor.visit(node);
        for child in node.children() {
            self.traverse_node(child, region, visitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octree::visitor::{CollectingVisitor, FnVisitor};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn world() -> BoundingBox {
        BoundingBox::from_coords(0.0, 0.0, 0.0, 100.0, 100.0, 100.0)
    }

    fn unit_cube_at(x: f32, y: f32, z: f32) -> BoundingBox {
        BoundingBox::from_coords(x, y, z, x + 1.0, y + 1.0, z + 1.0)
    }

    fn random_box(rng: &mut StdRng) -> BoundingBox {
        let x = rng.gen_range(0.0..95.0);
        let y = rng.gen_range(0.0..95.0);
        let z = rng.gen_range(0.0..95.0);
        let size = rng.gen_range(0.1..5.0);
        BoundingBox::from_coords(x, y, z, x + size, y + size, z + size)
    }

    fn as_set(objects: Vec<u32>) -> HashSet<u32> {
        objects.into_iter().collect()
    }

    #[test]
    fn empty_tree() {
        let tree: Octree<u32> = Octree::new(world());
        assert!(tree.is_empty());
        assert_eq!(tree.object_count(), 0);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.depth(), 0);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.max_depth(), 8);
        assert_eq!(tree.max_objects_per_node(), 8);
        assert_eq!(tree.query_nearest(Point3::new(5.0, 5.0, 5.0)), None);
    }

    #[test]
    fn insert_and_query_single() {
        let mut tree = Octree::new(world());
        assert!(tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0)));

        assert_eq!(tree.object_count(), 1);
        assert!(tree.contains(1));
        assert_eq!(tree.get_bounds(1), Some(unit_cube_at(10.0, 10.0, 10.0)));
        assert_eq!(tree.query_box(&world()), vec![1]);
        assert_eq!(tree.query_point(Point3::new(10.5, 10.5, 10.5)), vec![1]);
        assert!(tree.query_point(Point3::new(50.0, 50.0, 50.0)).is_empty());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut tree = Octree::new(world());
        assert!(tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0)));
        assert!(!tree.insert(1u32, unit_cube_at(50.0, 50.0, 50.0)));

        assert_eq!(tree.object_count(), 1);
        assert_eq!(tree.get_bounds(1), Some(unit_cube_at(10.0, 10.0, 10.0)));
    }

    #[test]
    fn remove_unknown_returns_false() {
        let mut tree = Octree::new(world());
        tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0));

        assert!(!tree.remove(2));
        assert!(tree.remove(1));
        assert!(!tree.remove(1));
        assert!(tree.is_empty());
        assert!(tree.query_box(&world()).is_empty());
    }

    #[test]
    fn three_boxes_force_one_subdivision() {
        let mut tree = Octree::with_params(world(), 2, 1);
        assert!(tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0)));
        assert!(tree.insert(2u32, unit_cube_at(60.0, 10.0, 10.0)));
        assert!(tree.insert(3u32, unit_cube_at(10.0, 60.0, 10.0)));

        assert_eq!(tree.node_count(), 9);
        assert!(!tree.root().is_leaf());
        assert!(tree.root().entries().is_empty());
        assert_eq!(tree.depth(), 1);

        let root = tree.root();
        assert_eq!(tree.node_of(1), root.child(0));
        assert_eq!(tree.node_of(2), root.child(1));
        assert_eq!(tree.node_of(3), root.child(2));
    }

    #[test]
    fn subdivision_respects_max_depth() {
        let mut tree = Octree::with_params(world(), 0, 1);
        for i in 0..5u32 {
            tree.insert(i, unit_cube_at(10.0 * i as f32, 1.0, 1.0));
        }
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root().entries().len(), 5);
    }

    #[test]
    fn straddling_entry_stays_at_parent() {
        let mut tree = Octree::with_params(world(), 4, 1);
        tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0));
        // Crosses the x = 50 split plane.
        tree.insert(2u32, BoundingBox::from_coords(45.0, 10.0, 10.0, 55.0, 12.0, 12.0));

        assert_eq!(tree.node_of(2), Some(NodeId::ROOT));
        assert_eq!(tree.node_of(1), tree.root().child(0));
        assert_eq!(tree.stats().straddling_objects, 1);

        let region = BoundingBox::from_coords(54.0, 11.0, 11.0, 60.0, 20.0, 20.0);
        let hits = as_set(tree.query_box(&region));
        assert_eq!(hits, HashSet::from([2]));
    }

    #[test]
    fn object_outside_world_kept_at_root() {
        let mut tree = Octree::with_params(world(), 4, 1);
        tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0));
        tree.insert(2u32, unit_cube_at(10.0, 10.0, 10.0));
        assert!(tree.insert(9u32, unit_cube_at(150.0, 150.0, 150.0)));

        assert_eq!(tree.node_of(9), Some(NodeId::ROOT));
        assert_eq!(tree.query_point(Point3::new(150.5, 150.5, 150.5)), vec![9]);
    }

    #[test]
    fn update_moves_object() {
        let mut tree = Octree::with_params(world(), 4, 1);
        tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0));
        tree.insert(2u32, unit_cube_at(80.0, 80.0, 80.0));

        assert!(tree.update(1, unit_cube_at(70.0, 70.0, 70.0)));
        assert_eq!(tree.object_count(), 2);
        assert!(tree.query_point(Point3::new(10.5, 10.5, 10.5)).is_empty());
        assert_eq!(tree.query_point(Point3::new(70.5, 70.5, 70.5)), vec![1]);
    }

    #[test]
    fn update_unknown_object_inserts_it() {
        let mut tree = Octree::new(world());
        assert!(tree.update(4u32, unit_cube_at(1.0, 1.0, 1.0)));
        assert!(tree.contains(4));
    }

    #[test]
    fn sphere_query_uses_closest_point() {
        let mut tree = Octree::new(world());
        tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0));
        tree.insert(2u32, unit_cube_at(20.0, 10.0, 10.0));

        // Box 1 is 4 units away along x, box 2 is 14.
        let center = Point3::new(15.0, 10.5, 10.5);
        assert_eq!(as_set(tree.query_sphere(center, 4.0)), HashSet::from([1]));
        assert_eq!(as_set(tree.query_sphere(center, 5.0)), HashSet::from([1, 2]));
        assert!(tree.query_sphere(center, 3.9).is_empty());
    }

    #[test]
    fn sphere_query_rejects_non_positive_radius() {
        let mut tree = Octree::new(world());
        tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0));

        assert!(tree.query_sphere(Point3::new(10.5, 10.5, 10.5), 0.0).is_empty());
        assert!(tree.query_sphere(Point3::new(10.5, 10.5, 10.5), -1.0).is_empty());
    }

    #[test]
    fn nearest_compares_bounds_centers() {
        let mut tree = Octree::new(world());
        // Large box whose surface is close to the probe but whose center is far.
        tree.insert(1u32, BoundingBox::from_coords(12.0, 0.0, 0.0, 52.0, 40.0, 40.0));
        tree.insert(2u32, unit_cube_at(5.0, 14.0, 14.0));

        assert_eq!(tree.query_nearest(Point3::new(10.0, 14.5, 14.5)), Some(2));
    }

    #[test]
    fn nearest_falls_back_to_world_query() {
        let big = BoundingBox::from_coords(0.0, 0.0, 0.0, 1000.0, 1000.0, 1000.0);
        let mut tree = Octree::new(big);
        tree.insert(1u32, unit_cube_at(900.0, 900.0, 900.0));
        tree.insert(2u32, unit_cube_at(600.0, 600.0, 600.0));

        assert_eq!(tree.query_nearest(Point3::new(0.0, 0.0, 0.0)), Some(2));
    }

    #[test]
    fn nearest_finds_objects_outside_world() {
        let mut tree = Octree::new(world());
        assert!(tree.insert(1u32, unit_cube_at(150.0, 150.0, 150.0)));
        assert_eq!(tree.object_count(), 1);

        assert_eq!(tree.query_nearest(Point3::origin()), Some(1));
    }

    #[test]
    fn nearest_prefers_probe_hits_over_closer_centers_outside() {
        let mut tree = Octree::new(BoundingBox::from_coords(0.0, 0.0, 0.0, 1000.0, 1000.0, 1000.0));
        // Reaches into the probe, center ~150 away.
        tree.insert(1u32, BoundingBox::from_coords(50.0, 0.0, 0.0, 250.0, 1.0, 1.0));
        // Entirely outside the probe, center ~101.5 away.
        tree.insert(2u32, unit_cube_at(0.0, 101.0, 0.0));

        // Object 2 has the closer center but is never a candidate.
        assert_eq!(tree.query_nearest(Point3::origin()), Some(1));
    }

    #[test]
    fn clear_resets_to_single_leaf() {
        let mut tree = Octree::with_params(world(), 3, 1);
        for i in 0..10u32 {
            tree.insert(i, unit_cube_at(9.0 * i as f32, 2.0, 2.0));
        }
        assert!(tree.node_count() > 1);

        tree.clear();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.is_empty());
        assert!(tree.root().is_leaf());
        assert!(tree.insert(3, unit_cube_at(1.0, 1.0, 1.0)));
    }

    #[test]
    fn changing_params_rebuilds() {
        let mut tree = Octree::with_params(world(), 0, 1);
        tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0));
        tree.insert(2u32, unit_cube_at(60.0, 60.0, 60.0));
        assert_eq!(tree.node_count(), 1);

        tree.set_max_depth(3);
        assert_eq!(tree.node_count(), 9);
        assert_eq!(tree.object_count(), 2);

        tree.set_max_objects_per_node(8);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(as_set(tree.query_box(&world())), HashSet::from([1, 2]));
    }

    #[test]
    fn set_bounds_reindexes_objects() {
        let mut tree = Octree::new(world());
        tree.insert(1u32, unit_cube_at(150.0, 150.0, 150.0));

        tree.set_bounds(BoundingBox::from_coords(0.0, 0.0, 0.0, 200.0, 200.0, 200.0));
        assert_eq!(tree.bounds().max(), Point3::new(200.0, 200.0, 200.0));
        assert_eq!(tree.query_point(Point3::new(150.5, 150.5, 150.5)), vec![1]);
    }

    #[test]
    fn traverse_visits_every_node() {
        let mut tree = Octree::with_params(world(), 2, 1);
        tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0));
        tree.insert(2u32, unit_cube_at(60.0, 10.0, 10.0));

        let mut visited = 0;
        tree.traverse(&mut FnVisitor::new(|_: &OctreeNode<u32>| visited += 1));
        assert_eq!(visited, tree.node_count());

        let mut collector = CollectingVisitor::new();
        tree.traverse(&mut collector);
        assert_eq!(collector.entries().len(), 2);
    }

    #[test]
    fn traverse_within_prunes_disjoint_nodes() {
        let mut tree = Octree::with_params(world(), 2, 1);
        tree.insert(1u32, unit_cube_at(10.0, 10.0, 10.0));
        tree.insert(2u32, unit_cube_at(60.0, 10.0, 10.0));

        let mut depths = Vec::new();
        let region = unit_cube_at(5.0, 5.0, 5.0);
        let mut visitor = FnVisitor::new(|n: &OctreeNode<u32>| depths.push(n.depth()));
        tree.traverse_within(&region, &mut visitor);
        // Root plus the single octant containing the region.
        assert_eq!(depths, vec![0, 1]);
    }

    #[test]
    fn object_count_tracks_inserts_and_removes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = Octree::with_params(world(), 6, 2);
        let mut live = HashSet::new();
        let mut expected = 0usize;

        for _ in 0..2000 {
            let object = rng.gen_range(0..200u32);
            if rng.gen_bool(0.6) {
                if tree.insert(object, random_box(&mut rng)) {
                    expected += 1;
                    live.insert(object);
                }
            } else if tree.remove(object) {
                expected -= 1;
                live.remove(&object);
            }
            assert_eq!(tree.object_count(), expected);
        }

        assert_eq!(as_set(tree.query_box(&world())), live);
    }

    #[test]
    fn results_do_not_depend_on_leaf_capacity() {
        let mut rng = StdRng::seed_from_u64(11);
        let boxes: Vec<BoundingBox> = (0..300).map(|_| random_box(&mut rng)).collect();
        let probe = BoundingBox::from_coords(20.0, 20.0, 20.0, 60.0, 45.0, 70.0);

        let results: Vec<(HashSet<u32>, HashSet<u32>)> = [1usize, 2, 8, 64]
            .iter()
            .map(|&capacity| {
                let mut tree = Octree::with_params(world(), 8, capacity);
                for (i, b) in boxes.iter().enumerate() {
                    tree.insert(i as u32, *b);
                }
                (as_set(tree.query_box(&world())), as_set(tree.query_box(&probe)))
            })
            .collect();

        assert_eq!(results[0].0.len(), boxes.len());
        for pair in results.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }

    #[test]
    fn sphere_query_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(23);
        let boxes: Vec<BoundingBox> = (0..400).map(|_| random_box(&mut rng)).collect();
        let mut tree = Octree::with_params(world(), 6, 4);
        for (i, b) in boxes.iter().enumerate() {
            tree.insert(i as u32, *b);
        }

        for _ in 0..50 {
            let center = Point3::new(
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            );
            let radius = rng.gen_range(0.5..30.0);

            let expected: HashSet<u32> = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.intersects_sphere(center, radius))
                .map(|(i, _)| i as u32)
                .collect();
            assert_eq!(as_set(tree.query_sphere(center, radius)), expected);
        }
    }

    #[test]
    fn rebuild_preserves_live_objects() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut tree = Octree::with_params(world(), 5, 2);
        for i in 0..300u32 {
            tree.insert(i, random_box(&mut rng));
        }
        for i in (0..300u32).filter(|i| i % 3 == 0) {
            tree.remove(i);
        }
        let before = as_set(tree.query_box(&world()));
        let bounds_before: Vec<Option<BoundingBox>> =
            (0..300).map(|i| tree.get_bounds(i)).collect();

        tree.rebuild();

        assert_eq!(as_set(tree.query_box(&world())), before);
        assert_eq!(tree.object_count(), before.len());
        let bounds_after: Vec<Option<BoundingBox>> = (0..300).map(|i| tree.get_bounds(i)).collect();
        assert_eq!(bounds_before, bounds_after);
    }

    #[test]
    fn index_points_at_node_holding_entry() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut tree = Octree::with_params(world(), 6, 3);
        for i in 0..250u32 {
            tree.insert(i, random_box(&mut rng));
        }

        for entry in tree.iter() {
            let id = tree.node_of(entry.object).unwrap();
            let node = tree.node(id).unwrap();
            assert!(node.entries().iter().any(|e| e.object == entry.object));
            assert!(node.bounds().contains(&entry.bounds) || id == NodeId::ROOT);
        }
        assert_eq!(tree.iter().count(), 250);
    }
}
