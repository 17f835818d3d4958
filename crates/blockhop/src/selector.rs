//! Point-and-drag selection: pick, move, rotate and scale anything that
//! exposes a unit-square transform.
//!
//! The [`Selector`] is generic over a [`Selectables`] collection. A
//! collection must be able to read and write the transform of each of its
//! objects; deleting, copying and pasting are optional capabilities with
//! default implementations that decline.
//!
//! Handles keep a constant on-screen size, so their world-space size is
//! recomputed from the camera's pixel-to-world ratio every frame.

use blockhop_engine::{Camera2D, Color, FrameInput, Key, MouseButton, Mx, Renderer};
use glam::DVec2;

use crate::level::{Art, Block, Level};

/// Slack on the hit-test bounds so points exactly on an edge count.
pub const HIT_EPSILON: f64 = 1e-9;
/// Side of a handle, in screen pixels.
pub const HANDLE_PX: f64 = 10.0;
/// Distance of the rotation handle beyond the top edge, in screen pixels.
pub const ROTATOR_OFFSET_PX: f64 = 25.0;
/// Side of the spawn marker, in screen pixels.
pub const SPAWN_PX: f64 = 20.0;
/// Local positions of the scale handles.
pub const CORNERS: [DVec2; 4] = [
    DVec2::new(0.5, 0.5),
    DVec2::new(-0.5, 0.5),
    DVec2::new(0.5, -0.5),
    DVec2::new(-0.5, -0.5),
];
/// Scale ratios closer to zero than this would collapse the object.
const MIN_SCALE_RATIO: f64 = 1e-6;

/// An object with a transform mapping the unit square centered at the origin
/// onto its world rectangle.
pub trait Selectable {
    fn transform(&self) -> Mx;
    fn set_transform(&mut self, t: Mx);
}

impl Selectable for Block {
    fn transform(&self) -> Mx {
        self.transform
    }

    fn set_transform(&mut self, t: Mx) {
        self.transform = t;
    }
}

impl Selectable for Art {
    fn transform(&self) -> Mx {
        self.transform
    }

    fn set_transform(&mut self, t: Mx) {
        self.transform = t;
    }
}

/// A collection the selector can operate on.
pub trait Selectables {
    /// Identifies one object in the collection.
    type Key: Copy + PartialEq + std::fmt::Debug;
    /// What the clipboard holds.
    type Clip;

    /// Every object, in pick order (ties go to the earlier key).
    fn keys(&self) -> Vec<Self::Key>;

    /// `None` if `key` no longer names an object.
    fn transform(&self, key: Self::Key) -> Option<Mx>;

    fn set_transform(&mut self, key: Self::Key, t: Mx);

    /// Remove the object. Returns `false` if it cannot be deleted.
    fn delete(&mut self, _key: Self::Key) -> bool {
        false
    }

    /// Clipboard contents for the object, or `None` if it cannot be copied.
    fn copy(&self, _key: Self::Key) -> Option<Self::Clip> {
        None
    }

    /// Insert a fresh copy of the clip and return its key.
    fn paste(&mut self, _clip: &Self::Clip) -> Option<Self::Key> {
        None
    }
}

/// What a drag is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Moving,
    Rotating,
    /// Dragging the scale handle at `CORNERS[corner]`.
    Scaling { corner: usize },
}

/// Whether `point` lies inside the unit square mapped by `t`. Singular
/// transforms contain nothing.
pub fn hit(point: DVec2, t: &Mx) -> bool {
    let Some(inv) = t.inverse() else {
        return false;
    };
    let local = inv.apply(point.x, point.y);
    let bound = 0.5 + HIT_EPSILON;
    local.x.abs() <= bound && local.y.abs() <= bound
}

/// Squared length of the diagonal of the mapped unit square.
pub fn diagonal_sq(t: &Mx) -> f64 {
    t.apply(-0.5, -0.5).distance_squared(t.apply(0.5, 0.5))
}

fn handle_at(center: DVec2, camera: &Camera2D) -> Mx {
    let side = HANDLE_PX * camera.px_to_world();
    Mx::from_rect(center, DVec2::splat(side))
}

/// Rotation handle: a square beyond the middle of the top edge, along the
/// object's local up direction.
pub fn rotator(t: &Mx, camera: &Camera2D) -> Mx {
    let center = t.apply(0.0, 0.0);
    let top = t.apply(0.0, 0.5);
    let up = (top - center).normalize_or_zero();
    handle_at(top + up * ROTATOR_OFFSET_PX * camera.px_to_world(), camera)
}

/// Scale handles, one per entry of [`CORNERS`].
pub fn scalers(t: &Mx, camera: &Camera2D) -> [Mx; 4] {
    CORNERS.map(|c| handle_at(t.apply(c.x, c.y), camera))
}

/// Smallest object under `point`; ties go to the first in key order.
pub fn pick<S: Selectables>(items: &S, point: DVec2) -> Option<S::Key> {
    let mut best: Option<(S::Key, f64)> = None;
    for key in items.keys() {
        let Some(t) = items.transform(key) else {
            continue;
        };
        if !hit(point, &t) {
            continue;
        }
        let d = diagonal_sq(&t);
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((key, d));
        }
    }
    best.map(|(key, _)| key)
}

/// Selection plus drag state. At most one object is selected at a time.
#[derive(Debug)]
pub struct Selector<K, C> {
    selected: Option<K>,
    clipboard: Option<C>,
    state: DragState,
}

impl<K: Copy + PartialEq + std::fmt::Debug, C> Selector<K, C> {
    pub fn new() -> Self {
        Self {
            selected: None,
            clipboard: None,
            state: DragState::Idle,
        }
    }

    pub fn selected(&self) -> Option<K> {
        self.selected
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn has_clip(&self) -> bool {
        self.clipboard.is_some()
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.state = DragState::Idle;
    }

    /// Process one frame of input against `items`.
    pub fn update<S>(&mut self, items: &mut S, camera: &Camera2D, input: &FrameInput)
    where
        S: Selectables<Key = K, Clip = C>,
    {
        // Forget selections whose object went away underneath us.
        if let Some(key) = self.selected {
            if items.transform(key).is_none() {
                self.clear();
            }
        }

        self.clipboard_commands(items, input);

        if !input.button_down(MouseButton::Left) {
            self.state = DragState::Idle;
            return;
        }

        let cursor = camera.screen_to_world(input.cursor);
        if input.clicked(MouseButton::Left) {
            self.press(items, camera, cursor);
        }

        let Some(key) = self.selected else {
            return;
        };
        let Some(t) = items.transform(key) else {
            return;
        };
        let updated = match self.state {
            DragState::Idle => None,
            DragState::Moving => moved(&t, camera, input.drag(MouseButton::Left)),
            DragState::Rotating => rotated(&t, cursor),
            DragState::Scaling { corner } => scaled(&t, corner, cursor),
        };
        if let Some(t) = updated {
            items.set_transform(key, t);
        }
    }

    fn clipboard_commands<S>(&mut self, items: &mut S, input: &FrameInput)
    where
        S: Selectables<Key = K, Clip = C>,
    {
        if let Some(key) = self.selected {
            if input.pressed(Key::Backspace) || input.pressed(Key::Delete) {
                if items.delete(key) {
                    log::debug!("Deleted {:?}", key);
                    self.clear();
                }
            }
        }
        if let Some(key) = self.selected {
            if input.command(Key::char('c')) {
                if let Some(clip) = items.copy(key) {
                    self.clipboard = Some(clip);
                }
            }
        }
        if input.command(Key::char('v')) {
            if let Some(clip) = &self.clipboard {
                if let Some(key) = items.paste(clip) {
                    log::debug!("Pasted {:?}", key);
                    self.selected = Some(key);
                    self.state = DragState::Idle;
                }
            }
        }
    }

    /// Handle a fresh left click at world position `cursor`.
    fn press<S>(&mut self, items: &S, camera: &Camera2D, cursor: DVec2)
    where
        S: Selectables<Key = K, Clip = C>,
    {
        // Handles and body of the current selection win over everything else.
        if let Some(t) = self.selected.and_then(|key| items.transform(key)) {
            if hit(cursor, &rotator(&t, camera)) {
                self.state = DragState::Rotating;
                return;
            }
            if let Some(corner) = scalers(&t, camera).iter().position(|h| hit(cursor, h)) {
                self.state = DragState::Scaling { corner };
                return;
            }
            if hit(cursor, &t) {
                self.state = DragState::Moving;
                return;
            }
        }

        self.selected = pick(items, cursor);
        self.state = match self.selected {
            Some(key) => {
                log::debug!("Selected {:?}", key);
                DragState::Moving
            }
            None => DragState::Idle,
        };
    }

    /// Outline the selection and its handles.
    pub fn draw<S>(&self, items: &S, camera: &Camera2D, renderer: &mut dyn Renderer)
    where
        S: Selectables<Key = K, Clip = C>,
    {
        if let Some(t) = self.selected.and_then(|key| items.transform(key)) {
            draw_selection(&t, camera, renderer);
        }
    }
}

/// Outline of a selected transform plus its rotate and scale handles.
pub fn draw_selection(t: &Mx, camera: &Camera2D, renderer: &mut dyn Renderer) {
    renderer.draw_outline(&camera.quad_to_screen(t), Color::RED);
    for handle in std::iter::once(rotator(t, camera)).chain(scalers(t, camera)) {
        renderer.draw_outline(&camera.quad_to_screen(&handle), Color::RED);
    }
}

impl<K: Copy + PartialEq + std::fmt::Debug, C> Default for Selector<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate by a screen-space drag.
fn moved(t: &Mx, camera: &Camera2D, drag: DVec2) -> Option<Mx> {
    if drag == DVec2::ZERO {
        return None;
    }
    let d = camera.drag_to_world(drag);
    let mut out = *t;
    out.translate(d.x, d.y);
    Some(out)
}

/// Turn the object about its own center so its local up axis points at the cursor.
fn rotated(t: &Mx, cursor: DVec2) -> Option<Mx> {
    let center = t.apply(0.0, 0.0);
    let up = t.apply(0.0, 0.5) - center;
    let toward = cursor - center;
    if up.length_squared() == 0.0 || toward.length_squared() == 0.0 {
        return None;
    }
    let delta = toward.y.atan2(toward.x) - up.y.atan2(up.x);
    let mut out = *t;
    out.translate(-center.x, -center.y);
    out.rotate(delta);
    out.translate(center.x, center.y);
    Some(out)
}

/// Rescale along the object's own axes so the grabbed corner lands on the
/// cursor while the center stays put.
fn scaled(t: &Mx, corner: usize, cursor: DVec2) -> Option<Mx> {
    let inv = t.inverse()?;
    let local = inv.apply(cursor.x, cursor.y);
    let handle = CORNERS.get(corner)?;
    let ratio = |c: f64, h: f64| {
        let r = c / h;
        if r.is_finite() && r.abs() >= MIN_SCALE_RATIO {
            r
        } else {
            1.0
        }
    };
    let mut s = Mx::IDENTITY;
    s.scale(ratio(local.x, handle.x), ratio(local.y, handle.y));
    Some(t.concat(&s))
}

/// One object of a [`Level`], in pick order: spawn, art, blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRef {
    Spawn,
    Art(usize),
    Block(usize),
}

/// Copied level object.
#[derive(Debug, Clone)]
pub enum LevelClip {
    Art(Art),
    Block(Block),
}

/// A level viewed as a selectable collection.
///
/// The spawn point has no size of its own; it is exposed as a fixed
/// on-screen square, and only the translation of a written-back transform
/// is kept. Art and blocks can be deleted, copied and pasted; the spawn
/// cannot.
pub struct LevelSelection<'a> {
    pub level: &'a mut Level,
    pub camera: &'a Camera2D,
}

impl<'a> LevelSelection<'a> {
    pub fn new(level: &'a mut Level, camera: &'a Camera2D) -> Self {
        Self { level, camera }
    }
}

/// Transform of one level object as the selector sees it.
pub fn level_transform(level: &Level, camera: &Camera2D, key: ObjectRef) -> Option<Mx> {
    match key {
        ObjectRef::Spawn => {
            let side = SPAWN_PX * camera.px_to_world();
            Some(Mx::from_rect(level.spawn.into(), DVec2::splat(side)))
        }
        ObjectRef::Art(i) => level.art.get(i).map(Selectable::transform),
        ObjectRef::Block(i) => level.blocks.get(i).map(Selectable::transform),
    }
}

impl Selectables for LevelSelection<'_> {
    type Key = ObjectRef;
    type Clip = LevelClip;

    fn keys(&self) -> Vec<ObjectRef> {
        std::iter::once(ObjectRef::Spawn)
            .chain((0..self.level.art.len()).map(ObjectRef::Art))
            .chain((0..self.level.blocks.len()).map(ObjectRef::Block))
            .collect()
    }

    fn transform(&self, key: ObjectRef) -> Option<Mx> {
        level_transform(&*self.level, self.camera, key)
    }

    fn set_transform(&mut self, key: ObjectRef, t: Mx) {
        match key {
            ObjectRef::Spawn => self.level.spawn = t.translation().into(),
            ObjectRef::Art(i) => {
                if let Some(art) = self.level.art.get_mut(i) {
                    art.set_transform(t);
                }
            }
            ObjectRef::Block(i) => {
                if let Some(block) = self.level.blocks.get_mut(i) {
                    block.set_transform(t);
                }
            }
        }
    }

    fn delete(&mut self, key: ObjectRef) -> bool {
        match key {
            ObjectRef::Spawn => false,
            ObjectRef::Art(i) if i < self.level.art.len() => {
                self.level.art.remove(i);
                true
            }
            ObjectRef::Block(i) if i < self.level.blocks.len() => {
                self.level.blocks.remove(i);
                true
            }
            _ => false,
        }
    }

    fn copy(&self, key: ObjectRef) -> Option<LevelClip> {
        match key {
            ObjectRef::Spawn => None,
            ObjectRef::Art(i) => self.level.art.get(i).cloned().map(LevelClip::Art),
            ObjectRef::Block(i) => self.level.blocks.get(i).cloned().map(LevelClip::Block),
        }
    }

    fn paste(&mut self, clip: &LevelClip) -> Option<ObjectRef> {
        match clip {
            LevelClip::Art(art) => {
                self.level.art.push(art.clone());
                Some(ObjectRef::Art(self.level.art.len() - 1))
            }
            LevelClip::Block(block) => {
                self.level.blocks.push(block.clone());
                Some(ObjectRef::Block(self.level.blocks.len() - 1))
            }
        }
    }
}

/// Selector over a level.
pub type LevelSelector = Selector<ObjectRef, LevelClip>;
