use log::info;
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};
use spatial_level::{BoundingBox, Level, PortalEvent, PortalSystem, Sector, SpawnPoint, Trigger};
use spatial_viz::{
    OrbitCamera, draw_box_solid, draw_box_wireframe, draw_portal, draw_sector, handle_color,
    to_point, to_vec3,
};

const ROOM_SIZE: f32 = 10.0;
const ROOM_COUNT: usize = 5;
const MARKER_SPEED: f32 = 8.0;

/// Builds a row of rooms along +X joined by doorways, each room holding a few crates.
fn build_house() -> (Level<u32>, PortalSystem) {
    let extent = ROOM_SIZE * ROOM_COUNT as f32;
    let mut level = Level::new(
        "walkthrough",
        "Portal Walkthrough",
        BoundingBox::from_coords(0.0, 0.0, 0.0, extent, extent, extent),
    );
    let mut system = PortalSystem::new();

    for i in 0..ROOM_COUNT {
        let x = i as f32 * ROOM_SIZE;
        system.add_sector(Sector::new(
            format!("room_{i}"),
            BoundingBox::from_coords(x, 0.0, 0.0, x + ROOM_SIZE, 4.0, ROOM_SIZE),
        ));
        for c in 0..3u32 {
            let offset = 1.5 + c as f32 * 3.0;
            let handle = i as u32 * 10 + c;
            let (lo_x, lo_z) = (x + offset, offset);
            let bounds = BoundingBox::from_coords(lo_x, 0.0, lo_z, lo_x + 1.0, 1.0, lo_z + 1.0);
            level.add_model(handle, bounds);
        }
    }

    // Doorways face back toward room 0, so the view floods down the row
    for i in 0..ROOM_COUNT - 1 {
        let x = (i + 1) as f32 * ROOM_SIZE;
        system.connect_sectors(
            &format!("door_{i}"),
            &format!("room_{i}"),
            &format!("room_{}", i + 1),
            BoundingBox::from_coords(x - 0.1, 0.0, 4.0, x + 0.1, 3.0, 6.0),
            Some(-Vector3::x()),
        );
    }

    level.add_spawn_point(SpawnPoint::new("start", Point3::new(3.0, 1.0, 5.0)));
    level.add_trigger(Trigger::new(
        "far_end",
        BoundingBox::from_coords(extent - 3.0, 0.0, 0.0, extent, 4.0, ROOM_SIZE),
    ));

    (level, system)
}

#[macroquad::main("Portal Walkthrough")]
async fn main() {
    env_logger::init();

    let (level, mut system) = build_house();
    info!(
        "Built '{}': {} sectors, {} portals, {} models",
        level.name(),
        system.sector_count(),
        system.portal_count(),
        level.model_count()
    );

    let mut marker = level
        .spawn_point("start")
        .map(|s| s.position)
        .unwrap_or_else(|| level.bounds().center());
    let mut camera = OrbitCamera::framing(level.bounds(), 0.3, 0.9);
    camera.distance = ROOM_SIZE * 3.0;
    let mut in_trigger = false;

    loop {
        camera.update();

        let dt = get_frame_time();
        let mut step = vec3(0.0, 0.0, 0.0);
        if is_key_down(KeyCode::D) {
            step.x += 1.0;
        }
        if is_key_down(KeyCode::A) {
            step.x -= 1.0;
        }
        if is_key_down(KeyCode::S) {
            step.z += 1.0;
        }
        if is_key_down(KeyCode::W) {
            step.z -= 1.0;
        }
        marker = to_point(to_vec3(marker) + step * MARKER_SPEED * dt);

        if is_key_pressed(KeyCode::Space) {
            let open = system.get_portal("door_1").is_some_and(|p| !p.is_open());
            system.set_portal_open("door_1", open);
            info!("door_1 {}", if open { "opened" } else { "closed" });
        }

        camera.follow(marker, 4.0 * dt);

        system.update(marker);
        for event in system.drain_events() {
            match event {
                PortalEvent::SectorEntered(id) => info!("Entered {}", id),
                PortalEvent::SectorExited(id) => info!("Left {}", id),
                PortalEvent::VisibilityChanged(_) => {}
            }
        }

        let triggered = !level.check_triggers(marker).is_empty();
        if triggered != in_trigger {
            info!("Trigger 'far_end' {}", if triggered { "entered" } else { "left" });
            in_trigger = triggered;
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        for sector in system.sectors() {
            draw_sector(sector, system.current_sector() == Some(sector.id()));
        }
        for portal in system.portals() {
            draw_portal(portal);
        }

        let mut drawn = 0;
        for sector in system.visible_sectors().iter().filter_map(|id| system.get_sector(id)) {
            for model in level.query_box(sector.bounds()) {
                if let Some(bounds) = level.model_bounds(model) {
                    draw_box_solid(&bounds, handle_color(&model));
                    drawn += 1;
                }
            }
        }
        for trigger in level.triggers() {
            draw_box_wireframe(&trigger.bounds, if in_trigger { ORANGE } else { PURPLE });
        }
        draw_sphere(to_vec3(marker), 0.4, None, YELLOW);

        set_default_camera();

        draw_text("Portal Walkthrough", 10.0, 25.0, 20.0, WHITE);
        draw_text(
            &format!(
                "Sector: {} | Visible: {} | Models drawn: {}/{}",
                system.current_sector().unwrap_or("none"),
                system.visible_sector_count(),
                drawn,
                level.model_count()
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );
        draw_text("WASD to move, Space toggles door_1", 10.0, 65.0, 16.0, DARKGRAY);
        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 83.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 101.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
