//! Spatial organization for game levels.
//!
//! - [`Octree`]: dynamic spatial index of object bounds
//! - [`PortalSystem`]: sector/portal graph for runtime visibility
//! - [`Level`]: spawn points, triggers, metadata and indexed models

mod bounds;
pub mod config;
pub mod error;
mod level;
pub mod octree;
pub mod visibility;

pub use bounds::BoundingBox;
pub use config::{OctreeConfig, PortalConfig};
pub use error::ConfigError;
pub use level::{Level, PropertyValue, SpawnPoint, Trigger};
pub use octree::{
    CollectingVisitor, FnVisitor, NodeId, ObjectHandle, Octree, OctreeEntry, OctreeNode,
    OctreeStats, OctreeVisitor,
};
pub use visibility::{Portal, PortalEvent, PortalSystem, Sector};
