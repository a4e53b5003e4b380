use log::info;
use macroquad::prelude::*;
use nalgebra::Point3;
use spatial_level::{BoundingBox, Octree, OctreeConfig};
use spatial_viz::{OctreeNavigator, OrbitCamera, draw_box_wireframe, to_vec3};

const WORLD_SIZE: f32 = 64.0;
const QUERY_RADIUS: f32 = 10.0;

/// Scatters small boxes on a deterministic pseudo-random grid, clustered in one corner
/// so the tree subdivides unevenly.
fn scatter_boxes(count: u32) -> Vec<(u32, BoundingBox)> {
    (0..count)
        .map(|i| {
            let t = i as f32;
            let spread = if i % 3 == 0 { WORLD_SIZE - 2.0 } else { WORLD_SIZE / 4.0 };
            let x = (t * 7.31).sin().abs() * spread;
            let y = (t * 3.17).cos().abs() * spread;
            let z = (t * 5.43).sin().abs() * spread;
            (i, BoundingBox::from_coords(x, y, z, x + 1.0, y + 1.0, z + 1.0))
        })
        .collect()
}

#[macroquad::main("Octree Explorer")]
async fn main() {
    env_logger::init();

    let world = BoundingBox::from_coords(0.0, 0.0, 0.0, WORLD_SIZE, WORLD_SIZE, WORLD_SIZE);
    let mut tree = Octree::from_config(world, &OctreeConfig::dense());
    for (handle, bounds) in scatter_boxes(200) {
        tree.insert(handle, bounds);
    }
    let stats = tree.stats();
    info!(
        "Octree built: {} objects, {} nodes, {} leaves, depth {}",
        stats.object_count, stats.node_count, stats.leaf_count, stats.max_depth
    );

    let mut camera = OrbitCamera::framing(&world, 0.6, 0.5);
    let mut navigator = OctreeNavigator::new();
    let mut probe = Point3::new(WORLD_SIZE / 8.0, WORLD_SIZE / 8.0, WORLD_SIZE / 8.0);

    loop {
        camera.update();
        navigator.update(&tree);

        let step = 20.0 * get_frame_time();
        if is_key_down(KeyCode::D) {
            probe.x += step;
        }
        if is_key_down(KeyCode::A) {
            probe.x -= step;
        }
        if is_key_down(KeyCode::W) {
            probe.z -= step;
        }
        if is_key_down(KeyCode::S) {
            probe.z += step;
        }
        if is_key_pressed(KeyCode::B) {
            tree.rebuild();
            navigator.go_root();
        }

        let hits = tree.query_sphere(probe, QUERY_RADIUS);
        let nearest = tree.query_nearest(probe);

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        navigator.render(&tree);
        for handle in &hits {
            if let Some(bounds) = tree.get_bounds(*handle) {
                draw_box_wireframe(&bounds.expand(0.2), WHITE);
            }
        }
        if let Some(bounds) = nearest.and_then(|h| tree.get_bounds(h)) {
            draw_box_wireframe(&bounds.expand(0.4), RED);
        }
        draw_sphere_wires(to_vec3(probe), QUERY_RADIUS, None, Color::new(1.0, 1.0, 1.0, 0.2));

        set_default_camera();

        draw_text(
            &format!(
                "Octree Explorer - {} objects in {} nodes",
                tree.object_count(),
                tree.node_count()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!("Sphere query: {} hits | nearest: {:?}", hits.len(), nearest),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(&tree, 70.0);

        draw_text("WASD moves the probe, [B] rebuilds", 10.0, 155.0, 16.0, DARKGRAY);
        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 173.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 191.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
