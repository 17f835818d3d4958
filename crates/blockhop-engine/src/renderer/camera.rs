use glam::DVec2;

use crate::core::transform::Mx;

/// Per-notch zoom factor applied to both half extents.
pub const ZOOM_STEP: f64 = 0.98;

/// Orthographic 2D camera.
///
/// The visible region is `center ± (half_width, half_height)` in world units
/// (y up); the screen is `screen_width × screen_height` pixels with the origin
/// top-left and y down.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    /// Screen size in pixels.
    pub screen_width: f64,
    pub screen_height: f64,
    /// Half of the visible extent in world units.
    pub half_width: f64,
    pub half_height: f64,
    /// Camera center position in world space.
    pub center: DVec2,
    /// Smoothing factor for camera follow (0.0 = instant, 1.0 = never moves).
    pub smoothing: f64,
}

impl Camera2D {
    /// Camera for a screen of the given pixel size with a fixed visible
    /// half-height; half-width follows the aspect ratio.
    pub fn new(screen_width: f64, screen_height: f64, half_height: f64) -> Self {
        let mut cam = Self {
            screen_width,
            screen_height,
            half_width: half_height,
            half_height,
            center: DVec2::ZERO,
            smoothing: 0.0,
        };
        cam.layout(screen_width, screen_height);
        cam
    }

    /// Camera with explicit half extents, ignoring aspect ratio.
    pub fn with_extents(screen_width: f64, screen_height: f64, half_width: f64, half_height: f64) -> Self {
        Self {
            screen_width,
            screen_height,
            half_width,
            half_height,
            center: DVec2::ZERO,
            smoothing: 0.0,
        }
    }

    /// Resize the screen. The half-height is kept and the half-width is
    /// derived from the new aspect ratio.
    pub fn layout(&mut self, screen_width: f64, screen_height: f64) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
        if screen_height > 0.0 {
            self.half_width = self.half_height * screen_width / screen_height;
        }
    }

    /// World to screen-pixel transform.
    pub fn to_screen(&self) -> Mx {
        let mut m = Mx::IDENTITY;
        m.translate(-self.center.x + self.half_width, -self.center.y + self.half_height);
        m.scale(1.0 / (2.0 * self.half_width), 1.0 / (2.0 * self.half_height));
        m.scale(1.0, -1.0);
        m.translate(0.0, 1.0);
        m.scale(self.screen_width, self.screen_height);
        m
    }

    /// Screen-pixel transform for a world-space unit-square transform.
    pub fn quad_to_screen(&self, t: &Mx) -> Mx {
        self.to_screen().concat(t)
    }

    /// Map a screen-pixel position to world coordinates.
    pub fn screen_to_world(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            self.center.x - self.half_width + p.x / self.screen_width * 2.0 * self.half_width,
            self.center.y + self.half_height - p.y / self.screen_height * 2.0 * self.half_height,
        )
    }

    pub fn world_to_screen(&self, p: DVec2) -> DVec2 {
        self.to_screen().apply(p.x, p.y)
    }

    /// World units per screen pixel.
    pub fn px_to_world(&self) -> f64 {
        2.0 * self.half_width / self.screen_width
    }

    /// Convert a screen-space drag (y down) into a world-space delta (y up).
    pub fn drag_to_world(&self, delta: DVec2) -> DVec2 {
        DVec2::new(
            2.0 * self.half_width * delta.x / self.screen_width,
            -2.0 * self.half_height * delta.y / self.screen_height,
        )
    }

    /// Zoom by `ZOOM_STEP^amount`; positive amounts zoom in.
    pub fn zoom(&mut self, amount: f64) {
        if amount == 0.0 {
            return;
        }
        let factor = ZOOM_STEP.powf(amount);
        self.half_width *= factor;
        self.half_height *= factor;
    }

    /// Grab-and-pull panning: the world moves with the screen-space drag.
    pub fn pan(&mut self, delta: DVec2) {
        self.center -= self.drag_to_world(delta);
    }

    pub fn set_smoothing(&mut self, smoothing: f64) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    pub fn look_at(&mut self, target: DVec2) {
        self.center = target;
    }

    /// Smoothly move camera toward target position.
    /// Call this each tick with the target's position.
    pub fn follow(&mut self, target: DVec2, dt: f64) {
        if self.smoothing <= 0.0 {
            self.look_at(target);
        } else {
            let lerp_factor = 1.0 - self.smoothing.powf(dt * 60.0);
            self.center += (target - self.center) * lerp_factor;
        }
    }

    /// Check if a world-space rectangle overlaps the viewport.
    pub fn is_rect_visible(&self, rect_center: DVec2, rect_half_size: DVec2) -> bool {
        (rect_center.x - self.center.x).abs() <= self.half_width + rect_half_size.x
            && (rect_center.y - self.center.y).abs() <= self.half_height + rect_half_size.y
    }
}
