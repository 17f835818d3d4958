use blockhop_engine::{RenderError, Renderer, ShaderId};

const MAIN_SOURCE: &str = include_str!("shaders/main.frag");
const OUTLINE_SOURCE: &str = include_str!("shaders/outline.frag");

/// Shader programs compiled once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Shaders {
    /// Blocks, art and the player.
    pub main: ShaderId,
    /// Blocks still being dragged out.
    pub outline: ShaderId,
}

impl Shaders {
    pub fn load(renderer: &mut dyn Renderer) -> Result<Self, RenderError> {
        Ok(Self {
            main: renderer.load_shader("main", MAIN_SOURCE)?,
            outline: renderer.load_shader("outline", OUTLINE_SOURCE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockhop_engine::DrawList;

    #[test]
    fn both_programs_load() {
        let mut list = DrawList::new();
        let shaders = Shaders::load(&mut list).unwrap();
        assert_eq!(list.shader_name(shaders.main), Some("main"));
        assert_eq!(list.shader_name(shaders.outline), Some("outline"));
    }
}
