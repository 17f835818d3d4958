use glam::Vec2;
use crate::api::types::EntityId;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsBody;

/// One baked object in play: a platform, a piece of art, the player or a bullet.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Kind of object (`"player"`, `"block"`, `"bullet"`, ...).
    pub tag: String,
    /// Position in world space.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// World-space size of the drawn box (full width and height).
    pub size: Vec2,
    /// Touching this entity gives the player its jump back.
    pub restores_jump: bool,
    /// Art and other decoration has no body.
    #[cfg(feature = "physics")]
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            pos: Vec2::ZERO,
            rotation: 0.0,
            size: Vec2::ONE,
            restores_jump: false,
            #[cfg(feature = "physics")]
            body: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_restores_jump(mut self, restores: bool) -> Self {
        self.restores_jump = restores;
        self
    }

    #[cfg(feature = "physics")]
    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}
