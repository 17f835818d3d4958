use std::collections::BTreeMap;

use blockhop_engine::{
    Assets, BodyDesc, Camera2D, ColliderDesc, ColliderMaterial, Color, EngineContext, Entity,
    EntityId, FrameInput, Key, MouseButton, Mx, Renderer, Uniforms,
};
use glam::{DVec2, Vec2};

use crate::config::Config;
use crate::level::{Art, ArtRef, AudioRef, Trigger};
use crate::shaders::Shaders;

/// Side length of the player box.
pub const PLAYER_SIZE: f32 = 1.0;
/// Where the player starts before a level moves it to its spawn.
const PLAYER_START: Vec2 = Vec2::new(0.0, 3.0);
/// Horizontal push while a move key is held.
pub const MOVE_FORCE: f32 = 60.0;
/// No more push once the player is this fast.
pub const MAX_RUN_SPEED: f32 = 5.0;
pub const JUMP_FORCE: f32 = 300.0;
/// Minimum ticks between two jumps.
pub const JUMP_COOLDOWN: u64 = 30;
pub const SHOT_COOLDOWN: u64 = 30;
pub const BULLET_SIZE: f32 = 0.25;
/// Bullets spawn this far from the player's center, toward the cursor.
const BULLET_OFFSET: f32 = 0.5;
const BULLET_FORCE: f32 = 100.0;
/// Recoil on the player, as a multiple of the bullet's push.
const RECOIL: f32 = 10.0;
/// Camera eases this fraction of the way to the player each tick.
const FOLLOW: f64 = 0.1;
/// Bullets that fall below this height are removed.
pub const BULLET_FLOOR: f32 = -100.0;

/// Trigger names fired by play mode.
pub const TRIGGER_LAND: &str = "land";
pub const TRIGGER_JUMP: &str = "jump";
pub const TRIGGER_SHOOT: &str = "shoot";

/// A running play session built from a level snapshot.
///
/// Owns its physics world exclusively; the editor's level is never touched.
pub struct Game {
    pub ctx: EngineContext,
    pub camera: Camera2D,
    player: EntityId,
    dt: f64,
    pub art: Vec<Art>,
    pub background: Option<ArtRef>,
    pub background_audio: Option<AudioRef>,
    pub player_art: Option<ArtRef>,
    pub triggers: BTreeMap<String, Trigger>,
    /// Ticks since the session started.
    time: u64,
    has_jump: bool,
    last_jump: u64,
    last_shot: u64,
    /// Total jumps and shots, for the HUD and tests.
    jumps: u32,
    shots: u32,
}

impl Game {
    /// Empty world with gravity and a player box.
    pub fn new(config: &Config) -> Self {
        let gravity = Vec2::new(config.gravity[0], config.gravity[1]);
        let mut ctx = EngineContext::new(gravity, config.fixed_dt as f32);

        let player = ctx.next_id();
        let half = PLAYER_SIZE / 2.0;
        ctx.spawn_with_body(
            Entity::new(player)
                .with_tag("player")
                .with_size(Vec2::splat(PLAYER_SIZE)),
            BodyDesc::dynamic(ColliderDesc::cuboid(half, half)).with_position(PLAYER_START),
            ColliderMaterial {
                restitution: 0.0,
                friction: 3.0,
                density: 1.0,
            },
        );

        let mut camera = Camera2D::with_extents(
            config.screen_width,
            config.screen_height,
            config.play_camera_half_width,
            config.play_camera_half_height,
        );
        camera.set_smoothing(1.0 - FOLLOW);

        Self {
            ctx,
            camera,
            player,
            dt: config.fixed_dt,
            art: Vec::new(),
            background: None,
            background_audio: None,
            player_art: None,
            triggers: BTreeMap::new(),
            time: 0,
            has_jump: false,
            last_jump: 0,
            last_shot: 0,
            jumps: 0,
            shots: 0,
        }
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn player_position(&self) -> DVec2 {
        self.ctx
            .scene
            .get(self.player)
            .map(|e| e.pos.as_dvec2())
            .unwrap_or_default()
    }

    pub fn player_velocity(&self) -> DVec2 {
        self.ctx.velocity(self.player).as_dvec2()
    }

    pub fn has_jump(&self) -> bool {
        self.has_jump
    }

    pub fn jumps(&self) -> u32 {
        self.jumps
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Number of live bullets.
    pub fn bullets(&self) -> usize {
        self.ctx.scene.tagged("bullet").count()
    }

    pub fn layout(&mut self, width: f64, height: f64) {
        self.camera.layout(width, height);
    }

    /// Called once when play mode is entered.
    pub fn start(&mut self, assets: &mut Assets) {
        if let Some(music) = &self.background_audio {
            music.play(assets.audio.as_mut());
        }
        log::info!("Play started with {} entities", self.ctx.scene.len());
    }

    /// Fire a named trigger if the level defines it.
    pub fn activate(&self, name: &str, assets: &mut Assets) {
        match self.triggers.get(name) {
            Some(trigger) => trigger.activate(assets.audio.as_mut()),
            None => log::trace!("No trigger named {}", name),
        }
    }

    /// One fixed tick.
    pub fn update(&mut self, input: &FrameInput, assets: &mut Assets) {
        self.time += 1;
        self.restore_jump(assets);
        self.control_camera(input);
        self.movement(input, assets);
        self.camera.follow(self.player_position(), self.dt);
        self.shooting(input, assets);
        self.ctx.step_physics();
        self.cull_bullets();
    }

    fn cull_bullets(&mut self) {
        let fallen: Vec<EntityId> = self
            .ctx
            .scene
            .tagged("bullet")
            .filter(|e| e.pos.y < BULLET_FLOOR)
            .map(|e| e.id)
            .collect();
        for id in fallen {
            self.ctx.despawn(id);
        }
    }

    fn restore_jump(&mut self, assets: &mut Assets) {
        let restoring = |ctx: &EngineContext, id: EntityId| {
            ctx.scene.get(id).is_some_and(|e| e.restores_jump)
        };
        let landed = self
            .ctx
            .collisions()
            .iter()
            .filter(|c| c.started)
            .filter_map(|c| c.other(self.player))
            .any(|other| restoring(&self.ctx, other));
        if landed {
            self.activate(TRIGGER_LAND, assets);
        }
        // Continuous contact also restores, so standing still on a
        // platform keeps the jump available.
        if self
            .ctx
            .contacts(self.player)
            .into_iter()
            .any(|other| restoring(&self.ctx, other))
        {
            self.has_jump = true;
        }
    }

    fn control_camera(&mut self, input: &FrameInput) {
        let pan = [
            (Key::Right, DVec2::X),
            (Key::Left, DVec2::NEG_X),
            (Key::Up, DVec2::Y),
            (Key::Down, DVec2::NEG_Y),
        ];
        for (key, dir) in pan {
            if input.is_down(key) {
                self.camera.center += dir;
            }
        }
        self.camera.zoom(input.scroll);
        if input.is_down(Key::Space) {
            let factor = if input.is_down(Key::Shift) { 0.99 } else { 1.01 };
            self.camera.half_width *= factor;
            self.camera.half_height *= factor;
        }
    }

    fn movement(&mut self, input: &FrameInput, assets: &mut Assets) {
        let velocity = self.ctx.velocity(self.player);
        if input.is_down(Key::char('d')) && velocity.x < MAX_RUN_SPEED {
            self.ctx.apply_force(self.player, Vec2::new(MOVE_FORCE, 0.0));
        }
        if input.is_down(Key::char('a')) && velocity.x > -MAX_RUN_SPEED {
            self.ctx.apply_force(self.player, Vec2::new(-MOVE_FORCE, 0.0));
        }
        if input.is_down(Key::char('w')) {
            if self.has_jump && self.time - self.last_jump > JUMP_COOLDOWN {
                self.ctx.apply_force(self.player, Vec2::new(0.0, JUMP_FORCE));
                self.last_jump = self.time;
                self.jumps += 1;
                self.activate(TRIGGER_JUMP, assets);
            }
            self.has_jump = false;
        }
    }

    fn shooting(&mut self, input: &FrameInput, assets: &mut Assets) {
        if !input.button_down(MouseButton::Right) || self.time - self.last_shot <= SHOT_COOLDOWN {
            return;
        }
        let target = self.camera.screen_to_world(input.cursor).as_vec2();
        let pos = self.player_position().as_vec2();
        let dir = (target - pos).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        self.last_shot = self.time;
        self.shots += 1;

        let offset = dir * BULLET_OFFSET;
        let half = BULLET_SIZE / 2.0;
        let bullet = self.ctx.next_id();
        self.ctx.spawn_with_body(
            Entity::new(bullet)
                .with_tag("bullet")
                .with_size(Vec2::splat(BULLET_SIZE)),
            BodyDesc::dynamic(ColliderDesc::cuboid(half, half))
                .with_position(pos + offset)
                .with_ccd(true),
            ColliderMaterial {
                restitution: 0.7,
                friction: 0.3,
                density: 1.0,
            },
        );
        let push = offset * BULLET_FORCE;
        self.ctx.apply_force(bullet, push);
        self.ctx.apply_force(self.player, push * -RECOIL);
        self.activate(TRIGGER_SHOOT, assets);
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, shaders: &Shaders) {
        let screen = DVec2::new(self.camera.screen_width, self.camera.screen_height);
        let uniforms = Uniforms {
            screen_pixels: screen,
            velocity: self.player_velocity(),
        };

        // Full-screen backdrop.
        let backdrop = Mx::from_rect(screen / 2.0, screen);
        let background = self.background.as_ref().and_then(|b| b.image);
        renderer.draw_textured_quad(&backdrop, background.as_ref(), shaders.main, &uniforms);

        for entity in self.ctx.scene.iter() {
            let pos = entity.pos.as_dvec2();
            let size = entity.size.as_dvec2();
            if !self.camera.is_rect_visible(pos, size * std::f64::consts::FRAC_1_SQRT_2) {
                continue;
            }
            let mut t = Mx::IDENTITY;
            t.scale(size.x, size.y);
            t.rotate(entity.rotation as f64);
            t.translate(pos.x, pos.y);
            let image = if entity.id == self.player {
                self.player_art.as_ref().and_then(|a| a.image)
            } else {
                None
            };
            renderer.draw_textured_quad(
                &self.camera.quad_to_screen(&t),
                image.as_ref(),
                shaders.main,
                &uniforms,
            );
        }

        for art in &self.art {
            renderer.draw_textured_quad(
                &self.camera.quad_to_screen(&art.transform),
                art.image.as_ref(),
                shaders.main,
                &uniforms,
            );
        }

        renderer.draw_text(DVec2::new(10.0, 10.0), "(E) Edit Mode", Color::WHITE);
    }
}
