//! Shared visualization utilities for the spatial-level demos.

use std::hash::{Hash, Hasher};

use macroquad::prelude::*;
use nalgebra::Point3;
use spatial_level::{BoundingBox, ObjectHandle, OctreeNode, OctreeVisitor, Portal, Sector};

pub mod navigator;
pub use navigator::OctreeNavigator;

/// Generates a deterministic color from an object handle using hashing.
/// The same handle keeps its color across frames and rebuilds.
pub fn handle_color<H: Hash>(handle: &H) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    handle.hash(&mut hasher);
    let hash = hasher.finish();

    let r = ((hash >> 16) & 0xFF) as u8;
    let g = ((hash >> 8) & 0xFF) as u8;
    let b = (hash & 0xFF) as u8;

    // Keep colors readable against the dark background
    Color::from_rgba(r.max(60), g.max(60), b.max(60), 255)
}

/// Color for an octree node outline, fading with depth.
pub fn depth_color(depth: u32) -> Color {
    let fade = 1.0 / (1.0 + depth as f32 * 0.5);
    Color::new(0.3, 0.6 * fade + 0.2, 1.0 * fade, 0.8)
}

pub fn to_vec3(p: Point3<f32>) -> Vec3 {
    vec3(p.x, p.y, p.z)
}

pub fn to_point(v: Vec3) -> Point3<f32> {
    Point3::new(v.x, v.y, v.z)
}

/// Draws the twelve edges of a box.
pub fn draw_box_wireframe(bounds: &BoundingBox, color: Color) {
    let size = bounds.size();
    draw_cube_wires(to_vec3(bounds.center()), vec3(size.x, size.y, size.z), color);
}

/// Draws a box as a filled cube.
pub fn draw_box_solid(bounds: &BoundingBox, color: Color) {
    let size = bounds.size();
    draw_cube(to_vec3(bounds.center()), vec3(size.x, size.y, size.z), None, color);
}

/// Draws a sector outline, highlighted when visible.
pub fn draw_sector(sector: &Sector, is_current: bool) {
    let color = match (is_current, sector.is_visible()) {
        (true, _) => YELLOW,
        (false, true) => GREEN,
        (false, false) => Color::from_rgba(80, 80, 80, 255),
    };
    draw_box_wireframe(sector.bounds(), color);
}

/// Draws a portal quad and a short line along its normal.
pub fn draw_portal(portal: &Portal) {
    let color = if portal.is_open() { SKYBLUE } else { RED };
    draw_box_solid(portal.bounds(), color);

    let start = portal.center();
    let end = start + portal.normal();
    draw_line_3d(to_vec3(start), to_vec3(end), WHITE);
}

/// Visitor that renders octree nodes and their entries using macroquad's 3D drawing.
pub struct RenderVisitor {
    /// Draw node outlines as well as entries
    pub show_nodes: bool,
}

impl<H: ObjectHandle> OctreeVisitor<H> for RenderVisitor {
    fn visit(&mut self, node: &OctreeNode<H>) {
        if self.show_nodes {
            draw_box_wireframe(node.bounds(), depth_color(node.depth()));
        }
        for entry in node.entries() {
            draw_box_solid(&entry.bounds, handle_color(&entry.object));
        }
    }
}

/// Orbit camera circling a point of interest in a level.
///
/// Built around a [`BoundingBox`] so the zoom range scales with the scene,
/// and able to glide after a moving target such as the player marker.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Distance change per scroll step
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Radians per frame while an arrow key is held
    const KEY_ORBIT_SPEED: f32 = 0.02;
    const PITCH_LIMIT: f32 = 1.5;

    /// Looks at the center of `bounds` from far enough away to see all of it.
    ///
    /// Zoom is limited to between a tenth and three times the box diagonal.
    pub fn framing(bounds: &BoundingBox, yaw: f32, pitch: f32) -> Self {
        let diagonal = bounds.size().norm().max(1.0);
        Self {
            distance: diagonal * 1.2,
            yaw,
            pitch: pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            target: to_vec3(bounds.center()),
            zoom_speed: diagonal * 0.05,
            min_distance: diagonal * 0.1,
            max_distance: diagonal * 3.0,
        }
    }

    /// Moves the target a fraction `rate` (0..=1) of the way toward `point`.
    pub fn follow(&mut self, point: Point3<f32>, rate: f32) {
        self.target = self.target.lerp(to_vec3(point), rate.clamp(0.0, 1.0));
    }

    /// Updates orbit angles and zoom from mouse drag, scroll and arrow keys.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        let scroll = mouse_wheel().1;
        if scroll != 0.0 {
            self.distance = (self.distance - scroll.signum() * self.zoom_speed)
                .clamp(self.min_distance, self.max_distance);
        }

        if is_key_down(KeyCode::Left) {
            self.yaw += Self::KEY_ORBIT_SPEED;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= Self::KEY_ORBIT_SPEED;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += Self::KEY_ORBIT_SPEED;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= Self::KEY_ORBIT_SPEED;
        }
        self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Returns the eye position in world space.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * vec3(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: Vec3::Y,
            target: self.target,
            ..Default::default()
        }
    }
}
