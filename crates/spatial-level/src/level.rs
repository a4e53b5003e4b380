//! Level container: spawn points, trigger volumes and indexed model bounds.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use nalgebra::{Point3, Vector3};

use crate::BoundingBox;
use crate::config::OctreeConfig;
use crate::octree::{ObjectHandle, Octree};

/// A named location where players or entities may appear.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnPoint {
    /// Unique name within the level
    pub name: String,
    /// World position
    pub position: Point3<f32>,
    /// Facing angle around +Y, in radians
    pub yaw: f32,
    /// Optional grouping tag (team, wave, checkpoint)
    pub tag: Option<String>,
}

impl SpawnPoint {
    pub fn new(name: impl Into<String>, position: Point3<f32>) -> Self {
        Self {
            name: name.into(),
            position,
            yaw: 0.0,
            tag: None,
        }
    }

    /// Set facing angle
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Set grouping tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// A box-shaped trigger volume, tested by brute force against points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trigger {
    /// Unique ID within the level
    pub id: String,
    /// World-space volume
    pub bounds: BoundingBox,
    /// Disabled triggers are skipped by [`Level::check_triggers`]
    pub enabled: bool,
    /// Optional gameplay tag
    pub tag: Option<String>,
}

impl Trigger {
    /// Creates an enabled trigger.
    pub fn new(id: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            id: id.into(),
            bounds,
            enabled: true,
            tag: None,
        }
    }

    /// Set gameplay tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set enabled state
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[inline]
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.bounds.contains_point(point)
    }
}

/// Free-form level metadata value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Vector(Vector3<f32>),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vector3<f32>> for PropertyValue {
    fn from(value: Vector3<f32>) -> Self {
        Self::Vector(value)
    }
}

/// A level: its extent, spawn points, triggers, metadata, and the bounds of
/// every renderable model indexed in an [`Octree`].
///
/// The model list, the model-to-bounds table and the octree are only ever
/// changed together through [`add_model`](Self::add_model),
/// [`remove_model`](Self::remove_model) and [`update_model`](Self::update_model),
/// so they cannot drift apart. The bounds table is the source of truth when
/// the octree has to be rebuilt.
#[derive(Debug, Clone)]
pub struct Level<H> {
    id: String,
    name: String,
    bounds: BoundingBox,
    spawn_points: Vec<SpawnPoint>,
    triggers: Vec<Trigger>,
    models: Vec<H>,
    model_bounds: HashMap<H, BoundingBox>,
    octree: Octree<H>,
    octree_config: OctreeConfig,
    properties: BTreeMap<String, PropertyValue>,
}

impl<H: ObjectHandle> Level<H> {
    /// Creates an empty level whose octree uses the default parameters.
    pub fn new(id: impl Into<String>, name: impl Into<String>, bounds: BoundingBox) -> Self {
        Self::with_octree_config(id, name, bounds, OctreeConfig::default())
    }

    /// Creates an empty level with explicit octree parameters.
    ///
    /// # Panics
    /// Panics if `config.max_objects_per_node` is zero.
    pub fn with_octree_config(
        id: impl Into<String>,
        name: impl Into<String>,
        bounds: BoundingBox,
        config: OctreeConfig,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bounds,
            spawn_points: Vec::new(),
            triggers: Vec::new(),
            models: Vec::new(),
            model_bounds: HashMap::new(),
            octree: Octree::from_config(bounds, &config),
            octree_config: config,
            properties: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Read-only access to the model index.
    #[inline]
    pub fn octree(&self) -> &Octree<H> {
        &self.octree
    }

    #[inline]
    pub fn octree_config(&self) -> OctreeConfig {
        self.octree_config
    }

    /// Changes the level extent, recreating the octree around it and
    /// re-indexing every model.
    pub fn set_bounds(&mut self, bounds: BoundingBox) {
        self.bounds = bounds;
        self.octree = Octree::from_config(bounds, &self.octree_config);
        self.rebuild_octree();
    }

    /// Changes the octree parameters and re-indexes every model.
    ///
    /// # Panics
    /// Panics if `max_objects_per_node` is zero.
    pub fn set_octree_params(&mut self, max_depth: u32, max_objects_per_node: usize) {
        self.octree_config = OctreeConfig {
            max_depth,
            max_objects_per_node,
        };
        self.octree = Octree::from_config(self.bounds, &self.octree_config);
        self.rebuild_octree();
    }

    /// Re-inserts every model into an emptied octree from the bounds table.
    pub fn rebuild_octree(&mut self) {
        self.octree.clear();
        for model in &self.models {
            if let Some(bounds) = self.model_bounds.get(model) {
                self.octree.insert(*model, *bounds);
            }
        }
        debug!(
            "Rebuilt octree for level '{}': {} models, {} nodes",
            self.id,
            self.octree.object_count(),
            self.octree.node_count()
        );
    }

    /// Registers a model and indexes its bounds.
    ///
    /// Returns `false`, changing nothing, if the model is already registered.
    pub fn add_model(&mut self, model: H, bounds: BoundingBox) -> bool {
        if self.model_bounds.contains_key(&model) || !self.octree.insert(model, bounds) {
            return false;
        }
        self.models.push(model);
        self.model_bounds.insert(model, bounds);
        true
    }

    /// Unregisters a model. Returns `false` if it was not registered.
    pub fn remove_model(&mut self, model: H) -> bool {
        if self.model_bounds.remove(&model).is_none() {
            return false;
        }
        self.models.retain(|m| *m != model);
        self.octree.remove(model);
        true
    }

    /// Moves a registered model to new bounds.
    ///
    /// Returns `false` for unknown models; use [`add_model`](Self::add_model)
    /// to register one.
    pub fn update_model(&mut self, model: H, bounds: BoundingBox) -> bool {
        match self.model_bounds.get_mut(&model) {
            Some(stored) => {
                *stored = bounds;
                self.octree.update(model, bounds)
            }
            None => false,
        }
    }

    #[inline]
    pub fn model_bounds(&self, model: H) -> Option<BoundingBox> {
        self.model_bounds.get(&model).copied()
    }

    #[inline]
    pub fn has_model(&self, model: H) -> bool {
        self.model_bounds.contains_key(&model)
    }

    /// Returns registered models in registration order.
    #[inline]
    pub fn models(&self) -> &[H] {
        &self.models
    }

    #[inline]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Models whose bounds intersect `region`.
    pub fn query_box(&self, region: &BoundingBox) -> Vec<H> {
        self.octree.query_box(region)
    }

    /// Models whose bounds come within `radius` of `center`.
    pub fn query_sphere(&self, center: Point3<f32>, radius: f32) -> Vec<H> {
        self.octree.query_sphere(center, radius)
    }

    /// Models whose bounds contain `point`.
    pub fn query_point(&self, point: Point3<f32>) -> Vec<H> {
        self.octree.query_point(point)
    }

    /// An approximately nearest model; see [`Octree::query_nearest`].
    pub fn query_nearest(&self, point: Point3<f32>) -> Option<H> {
        self.octree.query_nearest(point)
    }

    /// Adds a spawn point, replacing any existing one with the same name.
    pub fn add_spawn_point(&mut self, spawn: SpawnPoint) {
        match self.spawn_points.iter_mut().find(|s| s.name == spawn.name) {
            Some(existing) => *existing = spawn,
            None => self.spawn_points.push(spawn),
        }
    }

    pub fn remove_spawn_point(&mut self, name: &str) -> Option<SpawnPoint> {
        let index = self.spawn_points.iter().position(|s| s.name == name)?;
        Some(self.spawn_points.remove(index))
    }

    pub fn spawn_point(&self, name: &str) -> Option<&SpawnPoint> {
        self.spawn_points.iter().find(|s| s.name == name)
    }

    #[inline]
    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    /// Spawn points carrying `tag`, in insertion order.
    pub fn spawn_points_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a SpawnPoint> {
        self.spawn_points
            .iter()
            .filter(move |s| s.tag.as_deref() == Some(tag))
    }

    /// Adds a trigger, replacing any existing one with the same ID.
    pub fn add_trigger(&mut self, trigger: Trigger) {
        match self.triggers.iter_mut().find(|t| t.id == trigger.id) {
            Some(existing) => *existing = trigger,
            None => self.triggers.push(trigger),
        }
    }

    pub fn remove_trigger(&mut self, id: &str) -> Option<Trigger> {
        let index = self.triggers.iter().position(|t| t.id == id)?;
        Some(self.triggers.remove(index))
    }

    pub fn trigger(&self, id: &str) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.id == id)
    }

    #[inline]
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Enables or disables a trigger. Returns `false` if the ID is unknown.
    pub fn set_trigger_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.triggers.iter_mut().find(|t| t.id == id) {
            Some(trigger) => {
                trigger.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Enabled triggers containing `point`, in insertion order.
    ///
    /// Scans every trigger.
    pub fn check_triggers(&self, point: Point3<f32>) -> Vec<&Trigger> {
        self.triggers
            .iter()
            .filter(|t| t.enabled && t.contains_point(point))
            .collect()
    }

    /// Sets a property, returning the previous value.
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    /// Iterates over properties in key order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}
