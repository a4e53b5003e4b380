//! Runtime portal traversal from the camera's sector.

use std::collections::{BTreeMap, HashSet};

use log::{debug, trace, warn};
use nalgebra::{Point3, Vector3};

use crate::BoundingBox;
use crate::config::{PORTAL_DEPTH_RANGE, PortalConfig};
use crate::error::Result;

use super::event::PortalEvent;
use super::portal::Portal;
use super::sector::Sector;

/// Sector/portal graph with a per-frame visible set.
///
/// Each [`update`](Self::update) locates the camera's sector and floods
/// outward through every open portal the camera faces, up to
/// `max_portal_depth` portals away, never entering a sector twice.
///
/// Sectors and portals are keyed by string ID. Adding an item with an
/// existing ID replaces it, and lookups with unknown IDs return `None` or
/// nothing. Sectors are scanned in ID order, so when sectors overlap the
/// camera belongs to the one with the smallest ID.
///
/// Changes are reported as [`PortalEvent`]s queued internally; call
/// [`drain_events`](Self::drain_events) once per frame.
#[derive(Debug, Clone)]
pub struct PortalSystem {
    sectors: BTreeMap<String, Sector>,
    portals: BTreeMap<String, Portal>,
    current_sector: Option<String>,
    visible_sectors: Vec<String>,
    max_portal_depth: u32,
    events: Vec<PortalEvent>,
}

impl Default for PortalSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalSystem {
    /// Creates an empty system with the default traversal depth.
    pub fn new() -> Self {
        Self {
            sectors: BTreeMap::new(),
            portals: BTreeMap::new(),
            current_sector: None,
            visible_sectors: Vec::new(),
            max_portal_depth: PortalConfig::default().max_portal_depth,
            events: Vec::new(),
        }
    }

    /// Creates an empty system from a configuration, validating it first.
    pub fn from_config(config: &PortalConfig) -> Result<Self> {
        config.validate()?;
        let mut system = Self::new();
        system.max_portal_depth = config.max_portal_depth;
        Ok(system)
    }

    #[inline]
    pub fn max_portal_depth(&self) -> u32 {
        self.max_portal_depth
    }

    /// Sets how many portals deep visibility propagates.
    ///
    /// # Panics
    /// Panics if `depth` is outside `1..=16`.
    pub fn set_max_portal_depth(&mut self, depth: u32) {
        assert!(
            PORTAL_DEPTH_RANGE.contains(&depth),
            "max_portal_depth must be in 1..=16, got {depth}"
        );
        self.max_portal_depth = depth;
    }

    /// Adds or replaces a sector.
    ///
    /// Portals already registered against this ID are attached to it, so
    /// sectors and portals may be added in any order.
    pub fn add_sector(&mut self, mut sector: Sector) {
        let linked: Vec<String> = self
            .portals
            .values()
            .filter(|p| p.touches(sector.id()))
            .map(|p| p.id().to_string())
            .collect();
        for portal_id in linked {
            sector.add_portal(portal_id);
        }
        let visible = self.visible_sectors.iter().any(|s| s == sector.id());
        sector.set_visible(visible);
        debug!(
            "Added sector '{}' with {} portals",
            sector.id(),
            sector.portal_count()
        );
        self.sectors.insert(sector.id().to_string(), sector);
    }

    /// Removes a sector, returning it if it existed.
    ///
    /// Portals leading to it are kept and simply lead nowhere until a sector
    /// with the same ID is added again. If the camera was in this sector, a
    /// [`PortalEvent::SectorExited`] is queued, and if it was visible, a
    /// [`PortalEvent::VisibilityChanged`] carrying the reduced set follows.
    pub fn remove_sector(&mut self, id: &str) -> Option<Sector> {
        let sector = self.sectors.remove(id)?;
        if self.current_sector.as_deref() == Some(id) {
            self.current_sector = None;
            self.events.push(PortalEvent::SectorExited(id.to_string()));
        }
        let before = self.visible_sectors.len();
        self.visible_sectors.retain(|s| s != id);
        if self.visible_sectors.len() != before {
            self.events
                .push(PortalEvent::VisibilityChanged(self.visible_sectors.clone()));
        }
        Some(sector)
    }

    /// Adds or replaces a portal and attaches it to whichever of its two
    /// sectors already exist.
    pub fn add_portal(&mut self, portal: Portal) {
        if let Some(old) = self.portals.get(portal.id()) {
            let old_sides = [old.sector_a().to_string(), old.sector_b().to_string()];
            for side in &old_sides {
                if let Some(sector) = self.sectors.get_mut(side.as_str()) {
                    sector.remove_portal(portal.id());
                }
            }
        }

        for side in [portal.sector_a(), portal.sector_b()] {
            if let Some(sector) = self.sectors.get_mut(side) {
                sector.add_portal(portal.id());
            }
        }
        debug!(
            "Added portal '{}' between '{}' and '{}'",
            portal.id(),
            portal.sector_a(),
            portal.sector_b()
        );
        self.portals.insert(portal.id().to_string(), portal);
    }

    /// Removes a portal and detaches it from its sectors.
    pub fn remove_portal(&mut self, id: &str) -> Option<Portal> {
        let portal = self.portals.remove(id)?;
        for side in [portal.sector_a(), portal.sector_b()] {
            if let Some(sector) = self.sectors.get_mut(side) {
                sector.remove_portal(id);
            }
        }
        Some(portal)
    }

    /// Creates a portal between two existing sectors.
    ///
    /// Uses the derived normal unless `normal` is given. Returns `false`,
    /// adding nothing, if either sector is unknown.
    pub fn connect_sectors(
        &mut self,
        portal_id: &str,
        sector_a: &str,
        sector_b: &str,
        bounds: BoundingBox,
        normal: Option<Vector3<f32>>,
    ) -> bool {
        if !self.sectors.contains_key(sector_a) || !self.sectors.contains_key(sector_b) {
            return false;
        }
        let mut portal = Portal::new(portal_id, bounds, sector_a, sector_b);
        if let Some(normal) = normal {
            portal.set_normal(normal);
        }
        self.add_portal(portal);
        true
    }

    /// Opens or closes a portal. Returns `false` if the portal is unknown.
    pub fn set_portal_open(&mut self, id: &str, open: bool) -> bool {
        match self.portals.get_mut(id) {
            Some(portal) => {
                portal.set_open(open);
                true
            }
            None => false,
        }
    }

    /// Removes every sector and portal and forgets the camera state.
    ///
    /// Queued events are discarded as well.
    pub fn clear(&mut self) {
        self.sectors.clear();
        self.portals.clear();
        self.current_sector = None;
        self.visible_sectors.clear();
        self.events.clear();
    }

    /// Recomputes the camera's sector and the visible set.
    pub fn update(&mut self, camera_pos: Point3<f32>) {
        let Some(sector_id) = self.get_sector_at(camera_pos).map(|s| s.id().to_string()) else {
            if let Some(old) = self.current_sector.take() {
                debug!("Camera left sector '{}' into unmapped space", old);
                self.events.push(PortalEvent::SectorExited(old));
            }
            if !self.visible_sectors.is_empty() {
                self.apply_visible_set(Vec::new());
                self.events.push(PortalEvent::VisibilityChanged(Vec::new()));
            }
            return;
        };

        if self.current_sector.as_deref() != Some(sector_id.as_str()) {
            if let Some(old) = self.current_sector.take() {
                self.events.push(PortalEvent::SectorExited(old));
            }
            debug!("Camera entered sector '{}'", sector_id);
            self.events.push(PortalEvent::SectorEntered(sector_id.clone()));
            self.current_sector = Some(sector_id.clone());
        }

        let visible = self.flood_visible(&sector_id, camera_pos);
        trace!("{} sectors visible from '{}'", visible.len(), sector_id);
        self.apply_visible_set(visible);
        self.events
            .push(PortalEvent::VisibilityChanged(self.visible_sectors.clone()));
    }

    /// Returns the first sector (by ID) containing `point`.
    pub fn get_sector_at(&self, point: Point3<f32>) -> Option<&Sector> {
        self.sectors.values().find(|s| s.contains_point(point))
    }

    #[inline]
    pub fn get_sector(&self, id: &str) -> Option<&Sector> {
        self.sectors.get(id)
    }

    #[inline]
    pub fn get_portal(&self, id: &str) -> Option<&Portal> {
        self.portals.get(id)
    }

    /// Returns the ID of the sector the camera was in at the last update.
    #[inline]
    pub fn current_sector(&self) -> Option<&str> {
        self.current_sector.as_deref()
    }

    /// Returns the visible sector IDs from the last update, in traversal order.
    #[inline]
    pub fn visible_sectors(&self) -> &[String] {
        &self.visible_sectors
    }

    #[inline]
    pub fn visible_sector_count(&self) -> usize {
        self.visible_sectors.len()
    }

    pub fn is_sector_visible(&self, id: &str) -> bool {
        self.sectors.get(id).is_some_and(Sector::is_visible)
    }

    /// Returns the known portals attached to a sector.
    pub fn portals_of(&self, sector_id: &str) -> Vec<&Portal> {
        self.sectors
            .get(sector_id)
            .map(|sector| {
                sector
                    .portal_ids()
                    .filter_map(|id| self.portals.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the IDs of sectors one portal away, ignoring portal direction.
    pub fn adjacent_sectors(&self, sector_id: &str) -> Vec<&str> {
        self.portals_of(sector_id)
            .into_iter()
            .filter_map(|portal| portal.get_other_sector(sector_id))
            .collect()
    }

    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.values()
    }

    pub fn portals(&self) -> impl Iterator<Item = &Portal> {
        self.portals.values()
    }

    #[inline]
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    #[inline]
    pub fn portal_count(&self) -> usize {
        self.portals.len()
    }

    /// Returns the queued events without consuming them.
    #[inline]
    pub fn events(&self) -> &[PortalEvent] {
        &self.events
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<PortalEvent> {
        std::mem::take(&mut self.events)
    }

    /// Stores the new visible set and syncs each sector's `visible` flag.
    fn apply_visible_set(&mut self, visible: Vec<String>) {
        for id in &self.visible_sectors {
            if let Some(sector) = self.sectors.get_mut(id) {
                sector.set_visible(false);
            }
        }
        for id in &visible {
            if let Some(sector) = self.sectors.get_mut(id) {
                sector.set_visible(true);
            }
        }
        self.visible_sectors = visible;
    }

    fn flood_visible(&self, start: &str, camera_pos: Point3<f32>) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        self.flood_sector(start, camera_pos, 0, &mut visited, &mut order);
        order
    }

    /// Depth-first flood through open portals facing the camera.
    fn flood_sector<'a>(
        &'a self,
        sector_id: &str,
        camera_pos: Point3<f32>,
        depth: u32,
        visited: &mut HashSet<&'a str>,
        order: &mut Vec<String>,
    ) {
        if depth > self.max_portal_depth || visited.contains(sector_id) {
            return;
        }
        let Some(sector) = self.sectors.get(sector_id) else {
            warn!("Portal leads to unknown sector '{}'", sector_id);
            return;
        };

        visited.insert(sector.id());
        order.push(sector.id().to_string());

        for portal_id in sector.portal_ids() {
            let Some(portal) = self.portals.get(portal_id) else {
                trace!("Sector '{}' lists unknown portal '{}'", sector.id(), portal_id);
                continue;
            };
            if !portal.is_open() || !portal.is_visible_from(camera_pos) {
                continue;
            }
            if let Some(next) = portal.get_other_sector(sector.id()) {
                self.flood_sector(next, camera_pos, depth + 1, visited, order);
            }
        }
    }
}
