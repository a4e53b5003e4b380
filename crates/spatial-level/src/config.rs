//! Tuning parameters for the octree and the portal system.

use crate::error::{ConfigError, Result};

/// Deepest octree level accepted by [`OctreeConfig::validate`].
pub const MAX_OCTREE_DEPTH: u32 = 16;

/// Smallest and largest accepted portal traversal depth.
pub const PORTAL_DEPTH_RANGE: std::ops::RangeInclusive<u32> = 1..=16;

/// Octree subdivision parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctreeConfig {
    /// Depth at which leaves stop subdividing. The root is depth 0.
    pub max_depth: u32,

    /// Entry count a leaf may hold before it subdivides.
    pub max_objects_per_node: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_objects_per_node: 8,
        }
    }
}

impl OctreeConfig {
    /// Deep tree with small leaves, for levels with many small props.
    pub fn dense() -> Self {
        Self {
            max_depth: 10,
            max_objects_per_node: 4,
        }
    }

    /// Shallow tree with large leaves, for sparse outdoor levels.
    pub fn sparse() -> Self {
        Self {
            max_depth: 5,
            max_objects_per_node: 16,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the per-leaf entry threshold
    pub fn with_max_objects_per_node(mut self, max_objects_per_node: usize) -> Self {
        self.max_objects_per_node = max_objects_per_node;
        self
    }

    /// Checks the parameters, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.max_objects_per_node == 0 {
            return Err(ConfigError::ZeroObjectsPerNode);
        }
        if self.max_depth > MAX_OCTREE_DEPTH {
            return Err(ConfigError::OctreeTooDeep(self.max_depth));
        }
        Ok(())
    }
}

/// Portal traversal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortalConfig {
    /// How many portals deep visibility propagates from the camera's sector.
    pub max_portal_depth: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self { max_portal_depth: 8 }
    }
}

impl PortalConfig {
    /// Set maximum portal depth
    pub fn with_max_portal_depth(mut self, max_portal_depth: u32) -> Self {
        self.max_portal_depth = max_portal_depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !PORTAL_DEPTH_RANGE.contains(&self.max_portal_depth) {
            return Err(ConfigError::PortalDepthOutOfRange(self.max_portal_depth));
        }
        Ok(())
    }
}
