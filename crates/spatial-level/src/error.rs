//! Error types for configuration validation.
//!
//! Per-frame operations never return errors: lookups that miss, duplicate
//! inserts and unknown IDs are reported through `bool`/`Option` results.
//! Only configuration built from external input goes through [`ConfigError`].

use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `max_objects_per_node` must allow at least one entry per node.
    #[error("max_objects_per_node must be at least 1")]
    ZeroObjectsPerNode,

    /// Octree depth beyond what the arena can address sensibly.
    #[error(
        "octree max_depth {0} exceeds the limit of {limit}",
        limit = crate::config::MAX_OCTREE_DEPTH
    )]
    OctreeTooDeep(u32),

    /// Portal traversal depth outside `1..=16`.
    #[error("max_portal_depth {0} is outside the allowed range 1..=16")]
    PortalDepthOutOfRange(u32),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
