//! Portal/sector graph for coarse runtime visibility.
//!
//! A level is divided into box-shaped [`Sector`]s joined by [`Portal`]s.
//! Each frame the [`PortalSystem`] finds the sector holding the camera and
//! walks outward through the portals the camera faces, producing the set of
//! sectors worth drawing. This is a cheap, conservative filter meant to run
//! before any finer culling, not a precomputed PVS.
//!
//! # Example
//!
//! ```ignore
//! use spatial_level::{BoundingBox, Portal, PortalSystem, Sector};
//! use nalgebra::Point3;
//!
//! let mut system = PortalSystem::new();
//! let hall = BoundingBox::from_coords(0.0, 0.0, 0.0, 10.0, 4.0, 10.0);
//! let kitchen = BoundingBox::from_coords(10.0, 0.0, 0.0, 20.0, 4.0, 10.0);
//! system.add_sector(Sector::new("hall", hall));
//! system.add_sector(Sector::new("kitchen", kitchen));
//! system.add_portal(Portal::new(
//!     "door",
//!     BoundingBox::from_coords(9.9, 0.0, 4.0, 10.1, 3.0, 6.0),
//!     "hall",
//!     "kitchen",
//! ));
//!
//! system.update(Point3::new(15.0, 1.5, 5.0));
//! for event in system.drain_events() {
//!     // forward to the renderer
//! }
//! ```

mod event;
mod portal;
mod sector;
mod system;

pub use event::PortalEvent;
pub use portal::Portal;
pub use sector::Sector;
pub use system::PortalSystem;
