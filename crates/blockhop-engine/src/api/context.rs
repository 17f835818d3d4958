use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::scene::Scene;
#[cfg(feature = "physics")]
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld};
#[cfg(feature = "physics")]
use glam::Vec2;

/// Live simulation state for one play session: entities plus the physics
/// world they are bound to. Built fresh from a level, discarded with it.
pub struct EngineContext {
    pub scene: Scene,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    #[cfg(not(feature = "physics"))]
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            next_id: 1,
        }
    }

    /// Create a context whose physics world uses `gravity` and steps by `dt`.
    #[cfg(feature = "physics")]
    pub fn new(gravity: Vec2, dt: f32) -> Self {
        let mut physics = PhysicsWorld::new(gravity);
        physics.set_dt(dt);
        Self {
            scene: Scene::new(),
            next_id: 1,
            physics,
            collision_events: Vec::new(),
        }
    }

    /// Ids are never reused within one context.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Bind `entity` to a new body. The body's pose overrides the entity's.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Remove an entity and its body, if any.
    pub fn despawn(&mut self, id: EntityId) {
        let removed = self.scene.despawn(id);
        #[cfg(feature = "physics")]
        if let Some(body) = removed.and_then(|e| e.body) {
            self.physics.remove_body(&body);
        }
        #[cfg(not(feature = "physics"))]
        drop(removed);
    }

    #[cfg(feature = "physics")]
    fn body_of(&self, id: EntityId) -> Option<PhysicsBody> {
        self.scene.get(id)?.body
    }

    /// Push `id` for the next step only.
    #[cfg(feature = "physics")]
    pub fn apply_force(&mut self, id: EntityId, force: Vec2) {
        if let Some(body) = self.body_of(id) {
            self.physics.apply_force(&body, force);
        }
    }

    /// Zero for entities without a body.
    #[cfg(feature = "physics")]
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.body_of(id)
            .map_or(Vec2::ZERO, |body| self.physics.velocity(&body))
    }

    /// Teleport an entity and its body, clearing the body's velocity.
    #[cfg(feature = "physics")]
    pub fn set_position(&mut self, id: EntityId, pos: Vec2, rotation: f32) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
            entity.rotation = rotation;
            if let Some(body) = entity.body {
                self.physics.set_position(&body, pos, rotation);
            }
        }
    }

    /// Entities currently touching `id`.
    #[cfg(feature = "physics")]
    pub fn contacts(&self, id: EntityId) -> Vec<EntityId> {
        self.body_of(id)
            .map(|body| self.physics.contacts_with(&body))
            .unwrap_or_default()
    }

    /// Collisions that started or ended during the last step.
    #[cfg(feature = "physics")]
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Advance one fixed step, then copy body poses onto their entities.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        let physics = &self.physics;
        for entity in self.scene.iter_mut() {
            if let Some(body) = entity.body {
                (entity.pos, entity.rotation) = physics.body_position(&body);
            }
        }
    }
}
