pub mod camera;
pub mod draw_list;
pub mod traits;

// Re-export key types for convenient access
pub use camera::Camera2D;
pub use draw_list::{DrawCommand, DrawList};
pub use traits::{Color, RenderError, Renderer, ShaderId, Uniforms};
