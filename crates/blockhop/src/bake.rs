//! Turning an editable [`Level`] into a live [`Game`].

use blockhop_engine::{BodyDesc, BoxGeometry, ColliderDesc, ColliderMaterial, Entity, Mx};
use glam::Vec2;

use crate::level::Level;
use crate::play::Game;

/// Half extents at or below this are treated as zero.
pub const MIN_HALF_EXTENT: f64 = 1e-9;
/// Cosine tolerance for "the block's axes are perpendicular".
pub const SHEAR_TOLERANCE: f64 = 1e-6;

/// Friction of every baked platform.
const BLOCK_FRICTION: f32 = 0.3;

/// What happened to each block during a bake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeReport {
    pub baked: usize,
    /// Degenerate blocks that got no collider.
    pub skipped: usize,
    /// Sheared blocks that were baked with an approximate box.
    pub sheared: usize,
}

/// Collider geometry for a block transform, or `None` when it has
/// non-finite elements or (near) zero extent.
pub fn block_geometry(t: &Mx) -> Option<BoxGeometry> {
    if !t.is_finite() {
        return None;
    }
    let g = t.geometry();
    if g.half_width <= MIN_HALF_EXTENT || g.half_height <= MIN_HALF_EXTENT {
        return None;
    }
    Some(g)
}

/// Populate `game` with the contents of `level`.
///
/// Each block becomes a fixed box collider that restores the player's jump.
/// The box is read from where the transform sends the unit square's center
/// and half axes, which is exact only without shear; sheared blocks are
/// baked anyway and logged. Art, background, player art, audio and triggers
/// are copied across unchanged.
pub fn apply(level: &Level, game: &mut Game) -> BakeReport {
    let mut report = BakeReport::default();
    let player = game.player();
    game.ctx.set_position(player, world_point(level.spawn.x, level.spawn.y), 0.0);

    for (i, block) in level.blocks.iter().enumerate() {
        let Some(g) = block_geometry(&block.transform) else {
            log::warn!("Skipping degenerate block {}: {:?}", i, block.transform.elements());
            report.skipped += 1;
            continue;
        };
        if !block.transform.is_orthogonal(SHEAR_TOLERANCE) {
            log::warn!("Block {} is sheared; its collider is approximate", i);
            report.sheared += 1;
        }

        let (hw, hh) = (g.half_width as f32, g.half_height as f32);
        let id = game.ctx.next_id();
        game.ctx.spawn_with_body(
            Entity::new(id)
                .with_tag("block")
                .with_size(Vec2::new(hw * 2.0, hh * 2.0))
                .with_restores_jump(true),
            BodyDesc::fixed(ColliderDesc::cuboid(hw, hh))
                .with_position(world_point(g.center.x, g.center.y))
                .with_rotation(g.angle as f32),
            ColliderMaterial {
                restitution: 0.0,
                friction: BLOCK_FRICTION,
                density: 1.0,
            },
        );
        report.baked += 1;
    }

    game.art = level.art.clone();
    game.background = level.background.clone();
    game.background_audio = level.background_audio.clone();
    game.player_art = level.player.clone();
    game.triggers = level.triggers.clone();

    log::info!(
        "Baked level: {} blocks, {} skipped, {} art",
        report.baked,
        report.skipped,
        game.art.len()
    );
    report
}

fn world_point(x: f64, y: f64) -> Vec2 {
    Vec2::new(x as f32, y as f32)
}
