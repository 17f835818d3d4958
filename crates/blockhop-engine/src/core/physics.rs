//! Box-only rigid body physics on top of rapier2d.
//!
//! Every body carries exactly one box collider centered on it, and the
//! owning [`EntityId`] rides in the body's `user_data` so contacts can be
//! reported in entity terms. World units are y-up.

use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::EntityId;

fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_vector(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Whether a body is moved by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

/// Box collider, by half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderDesc {
    pub half_width: f32,
    pub half_height: f32,
}

impl ColliderDesc {
    pub fn cuboid(half_width: f32, half_height: f32) -> Self {
        Self {
            half_width,
            half_height,
        }
    }
}

/// Surface and mass properties of a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.3,
            density: 1.0,
        }
    }
}

/// Initial pose and shape of a body, built up before
/// [`PhysicsWorld::create_body`].
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    /// Continuous collision detection, for small fast bodies.
    pub ccd: bool,
    pub collider: ColliderDesc,
}

impl BodyDesc {
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            rotation: 0.0,
            ccd: false,
            collider,
        }
    }

    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            ..Self::dynamic(collider)
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    fn rigid_body(&self, owner: EntityId) -> RigidBody {
        let builder = match self.body_type {
            BodyType::Dynamic => RigidBodyBuilder::dynamic(),
            BodyType::Fixed => RigidBodyBuilder::fixed(),
        };
        builder
            .translation(to_vector(self.position))
            .rotation(self.rotation)
            .ccd_enabled(self.ccd)
            .user_data(owner.0 as u128)
            .build()
    }
}

/// Handles of one body and its collider.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// Two entities started or stopped touching during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub started: bool,
}

impl CollisionPair {
    /// The other entity, if `id` takes part in this collision.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

/// Collects rapier's collision events during a step. The pipeline only
/// hands out `&self`, hence the lock.
#[derive(Default)]
struct CollisionLog {
    events: Mutex<Vec<CollisionEvent>>,
}

impl CollisionLog {
    fn take(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventHandler for CollisionLog {
    fn handle_collision_event(
        &self,
        _: &RigidBodySet,
        _: &ColliderSet,
        event: CollisionEvent,
        _: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _: Real,
        _: &RigidBodySet,
        _: &ColliderSet,
        _: &ContactPair,
        _: Real,
    ) {
    }
}

/// A rapier world with its pipeline state.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    queries: QueryPipeline,
    log: CollisionLog,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_vector(gravity),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            queries: QueryPipeline::new(),
            log: CollisionLog::default(),
        }
    }

    /// Length of one [`PhysicsWorld::step_into`] in seconds.
    pub fn set_dt(&mut self, dt: f32) {
        self.params.dt = dt;
    }

    pub fn create_body(
        &mut self,
        owner: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let body_handle = self.bodies.insert(desc.rigid_body(owner));
        let collider = ColliderBuilder::cuboid(desc.collider.half_width, desc.collider.half_height)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body together with its collider.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance one step and append the step's collisions to `out`.
    pub fn step_into(&mut self, out: &mut Vec<CollisionPair>) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.queries),
            &(),
            &self.log,
        );

        // Forces act for a single step.
        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
        }

        for event in self.log.take() {
            let (a, b) = (event.collider1(), event.collider2());
            if let (Some(entity_a), Some(entity_b)) = (self.owner(a), self.owner(b)) {
                out.push(CollisionPair {
                    entity_a,
                    entity_b,
                    started: event.started(),
                });
            }
        }
    }

    /// Entities currently in active contact with `body`.
    pub fn contacts_with(&self, body: &PhysicsBody) -> Vec<EntityId> {
        let own = body.collider_handle;
        self.narrow_phase
            .contact_pairs_with(own)
            .filter(|pair| pair.has_any_active_contact)
            .filter_map(|pair| {
                let other = if pair.collider1 == own {
                    pair.collider2
                } else {
                    pair.collider1
                };
                self.owner(other)
            })
            .collect()
    }

    /// Push `body` during the next step only.
    pub fn apply_force(&mut self, body: &PhysicsBody, force: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.add_force(to_vector(force), true);
        }
    }

    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map_or(Vec2::ZERO, |rb| from_vector(rb.linvel()))
    }

    /// Teleport a body, clearing its velocity.
    pub fn set_position(&mut self, body: &PhysicsBody, pos: Vec2, rotation: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_position(Isometry::new(to_vector(pos), rotation), true);
            rb.set_linvel(Vector::zeros(), true);
            rb.set_angvel(0.0, true);
        }
    }

    /// Position and rotation in radians.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies.get(body.body_handle).map_or((Vec2::ZERO, 0.0), |rb| {
            let pose = rb.position();
            (from_vector(&pose.translation.vector), pose.rotation.angle())
        })
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Half extents of the box collider of `body`.
    pub fn collider_shape(&self, body: &PhysicsBody) -> Option<ColliderDesc> {
        let half = self
            .colliders
            .get(body.collider_handle)?
            .shape()
            .as_cuboid()?
            .half_extents;
        Some(ColliderDesc::cuboid(half.x, half.y))
    }

    pub fn collider_material(&self, body: &PhysicsBody) -> Option<ColliderMaterial> {
        let collider = self.colliders.get(body.collider_handle)?;
        Some(ColliderMaterial {
            restitution: collider.restitution(),
            friction: collider.friction(),
            density: collider.density(),
        })
    }

    fn owner(&self, collider: ColliderHandle) -> Option<EntityId> {
        let parent = self.colliders.get(collider)?.parent()?;
        let body = self.bodies.get(parent)?;
        Some(EntityId(body.user_data as u32))
    }
}
