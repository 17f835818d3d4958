//! Renderer contract consumed by the game and editor.
//!
//! Everything is drawn in screen pixels: callers map world geometry through
//! [`Camera2D::to_screen`](super::camera::Camera2D::to_screen) before
//! submitting it. Backends (a GPU window, or the recording [`DrawList`]) only
//! need to rasterize textured unit quads, lines, points and text.
//!
//! [`DrawList`]: super::draw_list::DrawList

use glam::DVec2;
use thiserror::Error;

use crate::assets::ImageHandle;
use crate::core::transform::Mx;

/// Opaque handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Straight-alpha RGBA color, each channel 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Per-draw shader inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Uniforms {
    /// Screen size in pixels.
    pub screen_pixels: DVec2,
    /// Player velocity, for the cosmetic fragment effect.
    pub velocity: DVec2,
}

/// Engine-initialization failures. Fatal: nothing can be drawn without them.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("shader `{name}` failed to compile: {message}")]
    Shader { name: String, message: String },
}

/// Renderer backend.
///
/// # Example Implementation
///
/// ```ignore
/// struct GlRenderer { /* context, programs, textures */ }
///
/// impl Renderer for GlRenderer {
///     fn load_shader(&mut self, name: &str, source: &str) -> Result<ShaderId, RenderError> {
///         // compile + link ...
///     }
///     fn draw_textured_quad(&mut self, transform: &Mx, image: Option<&ImageHandle>,
///                           shader: ShaderId, uniforms: &Uniforms) {
///         // upload the 2x3 matrix, bind texture, draw two triangles
///     }
///     // ...
/// }
/// ```
pub trait Renderer {
    /// Called once before anything is drawn for a new frame.
    fn begin_frame(&mut self) {}

    /// Compile a shader. Called once at startup; an error aborts the program.
    fn load_shader(&mut self, name: &str, source: &str) -> Result<ShaderId, RenderError>;

    /// Draw the unit square centered at the origin mapped through `transform`
    /// (already in screen pixels). `None` draws a flat, untextured quad.
    fn draw_textured_quad(
        &mut self,
        transform: &Mx,
        image: Option<&ImageHandle>,
        shader: ShaderId,
        uniforms: &Uniforms,
    );

    fn draw_line(&mut self, from: DVec2, to: DVec2, color: Color);

    fn draw_point(&mut self, at: DVec2, color: Color);

    /// Draw a line of text with its top-left corner at `at`.
    fn draw_text(&mut self, at: DVec2, text: &str, color: Color);

    /// Outline of the unit square mapped through `transform`.
    fn draw_outline(&mut self, transform: &Mx, color: Color) {
        let corners = [
            transform.apply(-0.5, -0.5),
            transform.apply(0.5, -0.5),
            transform.apply(0.5, 0.5),
            transform.apply(-0.5, 0.5),
        ];
        for i in 0..corners.len() {
            self.draw_line(corners[i], corners[(i + 1) % corners.len()], color);
        }
    }
}
