use glam::DVec2;

use super::traits::{Color, RenderError, Renderer, ShaderId, Uniforms};
use crate::assets::ImageHandle;
use crate::core::transform::Mx;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Quad {
        transform: Mx,
        /// Id of the bound image, if any.
        image: Option<u32>,
        shader: ShaderId,
        uniforms: Uniforms,
    },
    Line {
        from: DVec2,
        to: DVec2,
        color: Color,
    },
    Point {
        at: DVec2,
        color: Color,
    },
    Text {
        at: DVec2,
        text: String,
        color: Color,
    },
}

/// Renderer that records draw calls instead of rasterizing them.
///
/// Used by headless hosts and tests; a windowed host can replay the list
/// into its own backend each frame.
pub struct DrawList {
    commands: Vec<DrawCommand>,
    shaders: Vec<String>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(256),
            shaders: Vec::new(),
        }
    }

    /// Drop this frame's commands. Loaded shaders survive.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn quads(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Quad { .. }))
    }

    /// All text drawn this frame, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn shader_name(&self, id: ShaderId) -> Option<&str> {
        self.shaders.get(id.0 as usize).map(String::as_str)
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DrawList {
    fn begin_frame(&mut self) {
        self.clear();
    }

    fn load_shader(&mut self, name: &str, source: &str) -> Result<ShaderId, RenderError> {
        if source.trim().is_empty() {
            return Err(RenderError::Shader {
                name: name.to_string(),
                message: "empty source".to_string(),
            });
        }
        let id = ShaderId(self.shaders.len() as u32);
        self.shaders.push(name.to_string());
        log::debug!("Loaded shader `{}` as {:?}", name, id);
        Ok(id)
    }

    fn draw_textured_quad(
        &mut self,
        transform: &Mx,
        image: Option<&ImageHandle>,
        shader: ShaderId,
        uniforms: &Uniforms,
    ) {
        self.commands.push(DrawCommand::Quad {
            transform: *transform,
            image: image.map(|i| i.id),
            shader,
            uniforms: *uniforms,
        });
    }

    fn draw_line(&mut self, from: DVec2, to: DVec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn draw_point(&mut self, at: DVec2, color: Color) {
        self.commands.push(DrawCommand::Point { at, color });
    }

    fn draw_text(&mut self, at: DVec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut list = DrawList::new();
        let shader = list.load_shader("flat", "void main() {}").unwrap();
        list.draw_textured_quad(&Mx::IDENTITY, None, shader, &Uniforms::default());
        list.draw_text(DVec2::ZERO, "hello", Color::WHITE);
        assert_eq!(list.len(), 2);
        assert_eq!(list.quads().count(), 1);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["hello"]);
        assert_eq!(list.shader_name(shader), Some("flat"));
    }

    #[test]
    fn empty_shader_is_rejected() {
        let mut list = DrawList::new();
        assert!(list.load_shader("broken", "   ").is_err());
    }

    #[test]
    fn outline_draws_four_edges() {
        let mut list = DrawList::new();
        list.draw_outline(&Mx::from_rect(DVec2::ZERO, DVec2::new(2.0, 2.0)), Color::RED);
        assert_eq!(list.len(), 4);
        list.clear();
        assert!(list.is_empty());
    }
}
