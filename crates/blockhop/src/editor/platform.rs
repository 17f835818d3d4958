use blockhop_engine::{Camera2D, FrameInput, MouseButton, Mx};
use glam::DVec2;

use crate::bake::block_geometry;
use crate::level::{Block, Level};

/// Drag out new platforms: press sets one corner, the cursor is the
/// opposite corner, release commits.
#[derive(Debug, Clone, Default)]
pub struct PlatformTool {
    anchor: Option<DVec2>,
    creating: Option<Mx>,
}

impl PlatformTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The block being dragged out, if any.
    pub fn creating(&self) -> Option<&Mx> {
        self.creating.as_ref()
    }

    pub fn update(&mut self, level: &mut Level, camera: &Camera2D, input: &FrameInput) {
        let cursor = camera.screen_to_world(input.cursor);
        if input.button_down(MouseButton::Left) {
            if input.clicked(MouseButton::Left) {
                self.anchor = Some(cursor);
            }
            if let Some(anchor) = self.anchor {
                self.creating = Some(rect_between(anchor, cursor));
            }
            return;
        }

        self.anchor = None;
        if let Some(t) = self.creating.take() {
            // A click without a drag has no area.
            if block_geometry(&t).is_some() {
                level.blocks.push(Block::new(t));
                log::debug!("Added block {}", level.blocks.len() - 1);
            } else {
                log::debug!("Discarded empty block");
            }
        }
    }
}

/// Axis-aligned transform spanning two opposite corners.
pub fn rect_between(a: DVec2, b: DVec2) -> Mx {
    let min = a.min(b);
    let max = a.max(b);
    Mx::from_rect((min + max) / 2.0, max - min)
}
