use glam::{IVec2, Vec2};

use crate::assets::registry::Assets;
use crate::core::scene::{Scene, TRANSITION_TICKS};
use crate::renderer::frame::{Color, Frame, Layer};
use crate::systems::clouds::Clouds;

/// Offsets at which the outline silhouette is stamped.
const OUTLINE_OFFSETS: [IVec2; 4] = [
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
];

/// Pixels of wipe radius per transition tick.
const WIPE_SCALE: f32 = 8.0;

/// Build the frame's draw list for a scene.
///
/// Backdrop: background, clouds. Display: tiles, enemies, player,
/// projectiles, sparks, particles. Then the outline is stamped onto the
/// backdrop, the wipe is applied and the result is presented with the
/// screenshake offset.
pub fn build_frame(
    scene: &Scene,
    clouds: &Clouds,
    assets: &Assets,
    shake_offset: Vec2,
    frame: &mut Frame,
) {
    frame.clear();

    let offset_px = scene.camera.render_offset();
    let offset = offset_px.as_vec2();

    frame.blit(Layer::Backdrop, assets.background.id, Vec2::ZERO, false);
    clouds.render(frame, offset);

    scene.tilemap.render(frame, assets, offset_px);

    for enemy in &scene.enemies {
        enemy.render(frame, assets, offset);
    }
    if scene.player_alive() {
        scene.player.render(frame, offset);
    }

    for projectile in &scene.projectiles {
        projectile.render(frame, assets.projectile, offset);
    }
    for spark in &scene.sparks {
        spark.render(frame, offset);
    }
    for particle in &scene.particles {
        particle.render(frame, offset);
    }

    for outline in OUTLINE_OFFSETS {
        frame.silhouette(outline, Color::OUTLINE);
    }

    if scene.transition != 0 {
        let radius = (TRANSITION_TICKS - scene.transition.abs()) as f32 * WIPE_SCALE;
        frame.transition_wipe(frame.size() * 0.5, radius);
    }

    frame.present(shake_offset);
}
