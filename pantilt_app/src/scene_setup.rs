//! Placeholder scene for the rig demo
//!
//! A ground plane and a ring of coloured blocks so the sweeping sensor has
//! something to look at.

use pantilt_sim::foundation::math::{constants, Transform, Vec3};
use pantilt_sim::render::{Material, Mesh};
use pantilt_sim::scene::{Scene, SceneError, SceneNode};

/// Number of blocks placed around the rig
const BLOCK_COUNT: usize = 8;

/// Distance of the block ring from the rig base
const RING_RADIUS: f32 = 6.0;

pub fn populate(scene: &mut Scene) -> Result<(), SceneError> {
    scene.add_to_root(
        SceneNode::new("ground")
            .with_mesh(Mesh::ground_plane(40.0, 20), Material::new().with_color(0.35, 0.38, 0.35)),
    )?;

    for i in 0..BLOCK_COUNT {
        let angle = i as f32 / BLOCK_COUNT as f32 * constants::TAU;
        let height = 0.5 + 0.4 * i as f32;
        let position = Vec3::new(RING_RADIUS * angle.cos(), height, -RING_RADIUS * angle.sin());

        // Hue walks around the ring so the sensor feed shows where it points
        let hue = i as f32 / BLOCK_COUNT as f32;
        let [r, g, b] = hue_to_rgb(hue);

        scene.add_to_root(
            SceneNode::new(format!("block_{}", i))
                .with_transform(Transform::from_position(position).with_uniform_scale(0.5))
                .with_mesh(Mesh::cube(), Material::new().with_color(r, g, b)),
        )?;
    }

    log::info!("Placeholder scene populated with {} nodes", scene.len());
    Ok(())
}

fn hue_to_rgb(hue: f32) -> [f32; 3] {
    let h = hue.fract() * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}
