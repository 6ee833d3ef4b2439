//! Shared body state and the integrate-then-confine tick
//!
//! Every actor owns a [`Body`]. The generic [`Body::tick`] applies gravity,
//! integrates, refreshes hitboxes and clamps the body to the screen; what the
//! actor does about an overflow is its own boundary policy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Hitbox, HitboxSet, Rect};
use super::level::LevelView;

/// Screen edge a body ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Sides a body was clamped against this tick (at most one per axis)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overflow {
    pub horizontal: Option<ScreenSide>,
    pub vertical: Option<ScreenSide>,
}

impl Overflow {
    pub fn any(&self) -> bool {
        self.horizontal.is_some() || self.vertical.is_some()
    }
}

/// Position, velocity and hitboxes of a simulated actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Added to `vel.y` every tick
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub hitboxes: HitboxSet,
    /// Cooperative removal flag, acted on by the owner after the tick
    pub remove: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            gravity: 0.0,
            max_fall_speed: 0.0,
            hitboxes: HitboxSet::new(),
            remove: false,
        }
    }

    pub fn with_gravity(mut self, gravity: f32, max_fall_speed: f32) -> Self {
        self.gravity = gravity;
        self.max_fall_speed = max_fall_speed;
        self
    }

    /// Add a hitbox and place it at the current position
    pub fn with_hitbox(mut self, hitbox: Hitbox) -> Self {
        self.hitboxes.insert(hitbox.at(self.pos));
        self
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Accelerate downward, capped at the max fall speed
    pub fn apply_gravity(&mut self) {
        self.vel.y = (self.vel.y + self.gravity).min(self.max_fall_speed);
    }

    /// Where the body would be after moving by its velocity
    #[inline]
    pub fn predicted_position(&self) -> Vec2 {
        self.pos + self.vel
    }

    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    pub fn refresh_hitboxes(&mut self) {
        self.hitboxes.refresh(self.pos);
    }

    pub fn hitbox_by_name(&self, name: &str) -> Option<&Hitbox> {
        self.hitboxes.get(name)
    }

    /// Clamp the body inside `screen`, reporting which sides it crossed.
    ///
    /// Hitboxes are refreshed again when a clamp moved the body.
    pub fn confine(&mut self, screen: Rect) -> Overflow {
        let mut overflow = Overflow::default();

        if self.pos.x < screen.x {
            self.pos.x = screen.x;
            overflow.horizontal = Some(ScreenSide::Left);
        } else if self.pos.x + self.size.x > screen.right() {
            self.pos.x = screen.right() - self.size.x;
            overflow.horizontal = Some(ScreenSide::Right);
        }

        if self.pos.y < screen.y {
            self.pos.y = screen.y;
            overflow.vertical = Some(ScreenSide::Top);
        } else if self.pos.y + self.size.y > screen.bottom() {
            self.pos.y = screen.bottom() - self.size.y;
            overflow.vertical = Some(ScreenSide::Bottom);
        }

        if overflow.any() {
            self.refresh_hitboxes();
        }
        overflow
    }

    /// Generic tick: gravity, integrate, refresh hitboxes, confine to screen
    pub fn tick(&mut self, screen: Rect) -> Overflow {
        self.apply_gravity();
        self.integrate();
        self.refresh_hitboxes();
        self.confine(screen)
    }
}

/// Capability set shared by the body-driven actors
pub trait Actor {
    /// Advance one simulation tick
    fn update(&mut self, level: &dyn LevelView);

    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    fn hitboxes(&self) -> &HitboxSet {
        &self.body().hitboxes
    }

    fn hitbox_by_name(&self, name: &str) -> Option<&Hitbox> {
        self.body().hitbox_by_name(name)
    }

    fn is_removed(&self) -> bool {
        self.body().remove
    }

    fn set_removed(&mut self, remove: bool) {
        self.body_mut().remove = remove;
    }
}
