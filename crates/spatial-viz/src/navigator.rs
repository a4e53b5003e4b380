//! Octree navigation utilities for interactive visualization.

use macroquad::prelude::*;
use spatial_level::{ObjectHandle, Octree, OctreeNode, OctreeVisitor};

use crate::{RenderVisitor, depth_color, draw_box_wireframe};

const OCTANT_KEYS: [KeyCode; 8] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
];

/// Interactive octree navigator for exploring node structure.
///
/// The current node is addressed by the octants taken from the root, so the
/// path stays valid while the tree only grows.
pub struct OctreeNavigator {
    path: Vec<usize>,
}

impl Default for OctreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl OctreeNavigator {
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Returns the octants taken from the root.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to descend into `octant`. Returns true if successful.
    pub fn go_child<H: ObjectHandle>(&mut self, tree: &Octree<H>, octant: usize) -> bool {
        let has_child = self
            .current_node(tree)
            .is_some_and(|node| node.child(octant).is_some());
        if has_child {
            self.path.push(octant);
        }
        has_child
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update<H: ObjectHandle>(&mut self, tree: &Octree<H>) -> bool {
        let mut changed = false;

        for (octant, key) in OCTANT_KEYS.iter().enumerate() {
            if is_key_pressed(*key) {
                changed |= self.go_child(tree, octant);
            }
        }
        if is_key_pressed(KeyCode::P) {
            changed |= self.go_parent();
        }
        if is_key_pressed(KeyCode::R) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        changed
    }

    /// Returns the current node, or `None` if the path no longer exists
    /// (after a rebuild, for example).
    pub fn current_node<'a, H: ObjectHandle>(
        &self,
        tree: &'a Octree<H>,
    ) -> Option<&'a OctreeNode<H>> {
        let mut node = tree.root();
        for &octant in &self.path {
            node = tree.node(node.child(octant)?)?;
        }
        Some(node)
    }

    /// Renders the current subtree: node outlines and the entries they hold.
    pub fn render<H: ObjectHandle>(&self, tree: &Octree<H>) {
        let Some(node) = self.current_node(tree) else {
            return;
        };
        let mut visitor = RenderVisitor { show_nodes: true };
        render_subtree(tree, node, &mut visitor);
        draw_box_wireframe(node.bounds(), YELLOW);
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui<H: ObjectHandle>(&self, tree: &Octree<H>, y_offset: f32) {
        let (entries, depth, is_leaf) = match self.current_node(tree) {
            Some(node) => (node.entries().len(), node.depth(), node.is_leaf()),
            None => (0, 0, true),
        };

        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|octant| (octant + 1).to_string())
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        draw_text(
            &format!("Node: {} entries at depth {}", entries, depth),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(&format!("Path: {}", path_str), 10.0, y_offset + 20.0, 18.0, YELLOW);
        draw_text(
            if is_leaf { "(leaf)" } else { "Children: [1]-[8]" },
            10.0,
            y_offset + 40.0,
            18.0,
            if is_leaf { ORANGE } else { depth_color(depth + 1) },
        );
        draw_text("[P]arent | [R]oot", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }
}

fn render_subtree<H: ObjectHandle>(
    tree: &Octree<H>,
    node: &OctreeNode<H>,
    visitor: &mut RenderVisitor,
) {
    visitor.visit(node);
    for child in node.children().filter_map(|id| tree.node(id)) {
        render_subtree(tree, child, visitor);
    }
}
