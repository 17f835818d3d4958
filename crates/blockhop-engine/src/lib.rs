pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::context::EngineContext;
pub use api::types::EntityId;
pub use assets::{AssetError, Assets, AudioBackend, ClipId, ImageCache, ImageHandle, SilentAudio};
#[cfg(feature = "audio")]
pub use assets::RodioAudio;
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::time::{FixedTimestep, Interval};
pub use core::transform::{BoxGeometry, Mx, SINGULAR_EPSILON};
pub use input::{FrameInput, InputEvent, InputQueue, InputState, Key, MouseButton, TextEdit};
pub use renderer::{
    Camera2D, Color, DrawCommand, DrawList, RenderError, Renderer, ShaderId, Uniforms,
};

#[cfg(feature = "physics")]
pub use core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld,
};
