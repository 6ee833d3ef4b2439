//! Barrel AI: rolling along sloped platforms, taking ladders down
//!
//! A barrel is either grounded (rolling, possibly falling) or descending a
//! ladder. Landing snaps the barrel onto a stepped slope; each landing may
//! roll the dice to take an aligned ladder. After stepping off a ladder the
//! barrel ignores platforms for a few grace ticks and reverses direction if it
//! spent long enough on the ladder.

use std::collections::HashSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Hitbox, Rect};
use super::kinematics::{Actor, Body, Overflow};
use super::level::{Ladder, LadderId, LevelView, Platform, PlatformId};
use crate::consts::*;
use crate::tuning::BarrelTuning;

/// Source of the ladder-acquisition dice rolls
pub trait LadderRoll {
    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool;

    /// Uniform index in `0..len` (`len > 0`)
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng> LadderRoll for R {
    fn chance(&mut self, p: f32) -> bool {
        self.random::<f32>() < p
    }

    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Stable barrel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BarrelId(pub u32);

/// Movement state of a barrel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrelState {
    Grounded,
    OnLadder(LadderId),
}

/// A rolling barrel
#[derive(Debug, Clone)]
pub struct Barrel<R = Pcg32> {
    pub id: BarrelId,
    body: Body,
    state: BarrelState,
    current_platform: Option<PlatformId>,
    fall_grace: u32,
    ladder_ticks: u32,
    reverse_after_ladder: bool,
    checked_ladders: HashSet<LadderId>,
    jumped_over: bool,
    tuning: BarrelTuning,
    rng: R,
}

impl Barrel<Pcg32> {
    /// Barrel with its own seeded generator
    pub fn seeded(id: BarrelId, pos: Vec2, tuning: BarrelTuning, seed: u64) -> Self {
        Self::new(id, pos, tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: LadderRoll> Barrel<R> {
    pub fn new(id: BarrelId, pos: Vec2, tuning: BarrelTuning, rng: R) -> Self {
        let size = Vec2::new(tuning.width, tuning.height);
        let probe = size + Vec2::splat(4.0);
        let core = Vec2::splat(8.0);

        let mut body = Body::new(pos, size)
            .with_gravity(tuning.gravity, tuning.max_fall_speed)
            .with_hitbox(Hitbox::rect(HITBOX_DEFAULT, size, Vec2::ZERO, DEFAULT_HITBOX_COLOR))
            .with_hitbox(Hitbox::rect(HITBOX_LADDER, probe, Vec2::splat(-2.0), LADDER_HITBOX_COLOR))
            .with_hitbox(Hitbox::rect(HITBOX_PLAYER, core, (size - core) / 2.0, PLAYER_HITBOX_COLOR));
        body.vel.x = tuning.roll_speed;

        Self {
            id,
            body,
            state: BarrelState::Grounded,
            current_platform: None,
            fall_grace: 0,
            ladder_ticks: 0,
            reverse_after_ladder: false,
            checked_ladders: HashSet::new(),
            jumped_over: false,
            tuning,
            rng,
        }
    }

    pub fn state(&self) -> BarrelState {
        self.state
    }

    pub fn is_on_ladder(&self) -> bool {
        matches!(self.state, BarrelState::OnLadder(_))
    }

    pub fn current_ladder(&self) -> Option<LadderId> {
        match self.state {
            BarrelState::OnLadder(id) => Some(id),
            BarrelState::Grounded => None,
        }
    }

    pub fn current_platform(&self) -> Option<PlatformId> {
        self.current_platform
    }

    pub fn fall_grace(&self) -> u32 {
        self.fall_grace
    }

    pub fn ladder_ticks(&self) -> u32 {
        self.ladder_ticks
    }

    pub fn has_checked(&self, ladder: LadderId) -> bool {
        self.checked_ladders.contains(&ladder)
    }

    /// Allow a previously taken ladder to be acquired again
    pub fn forget_ladder(&mut self, ladder: LadderId) {
        self.checked_ladders.remove(&ladder);
    }

    pub fn has_been_jumped_over(&self) -> bool {
        self.jumped_over
    }

    /// Set by the scoring collaborator once the player clears this barrel
    pub fn mark_jumped_over(&mut self) {
        self.jumped_over = true;
    }

    pub fn reset_jump_state(&mut self) {
        self.jumped_over = false;
    }

    fn roll(&mut self, level: &dyn LevelView) {
        self.body.apply_gravity();
        let next = self.body.predicted_position();

        let landing = if self.fall_grace == 0 {
            level.platforms().iter().find(|p| self.lands_on(p, next))
        } else {
            None
        };

        match landing {
            Some(platform) => {
                let slope = self.slope_offset(platform, next.x, level.screen_bounds());
                self.body.pos = Vec2::new(next.x, platform.top() - self.body.size.y + slope);
                self.body.vel.y = 0.0;
                self.current_platform = Some(platform.id);
                self.body.refresh_hitboxes();
                self.try_take_ladder(level);
            }
            None => {
                self.body.pos = next;
                self.current_platform = None;
            }
        }
    }

    /// Falling onto `platform` from above at the predicted position
    fn lands_on(&self, platform: &Platform, next: Vec2) -> bool {
        let Some(hitbox) = self.body.hitbox_by_name(HITBOX_DEFAULT) else {
            return false;
        };
        if !hitbox.at(next).intersects_rect(&platform.rect) {
            return false;
        }
        let top = platform.top();
        self.body.vel.y >= 0.0 && next.y + self.body.size.y >= top && self.body.pos.y < top
    }

    /// Stepped slope: one `slope_step` per segment, sign set by level half
    fn slope_offset(&self, platform: &Platform, x: f32, screen: Rect) -> f32 {
        let segment = ((x - platform.rect.x) / self.tuning.slope_segment_width).floor();
        let step = if platform.rect.x - screen.x > self.tuning.slope_pivot_x {
            -self.tuning.slope_step
        } else {
            self.tuning.slope_step
        };
        segment * step
    }

    fn try_take_ladder(&mut self, level: &dyn LevelView) {
        if self.is_on_ladder() {
            return;
        }
        let Some(probe) = self.body.hitbox_by_name(HITBOX_LADDER).map(Hitbox::bounds) else {
            return;
        };

        let tolerance = self.tuning.alignment_tolerance;
        let candidates: Vec<&Ladder> = level
            .ladders()
            .iter()
            .filter(|l| l.pass_through && !self.checked_ladders.contains(&l.id))
            .filter(|l| probe.intersects(&l.rect) && (probe.center().x - l.center_x()).abs() <= tolerance)
            .collect();

        if candidates.is_empty() || !self.rng.chance(self.tuning.ladder_probability) {
            return;
        }
        let ladder = candidates[self.rng.pick(candidates.len())];
        self.enter_ladder(ladder);
    }

    fn enter_ladder(&mut self, ladder: &Ladder) {
        self.checked_ladders.insert(ladder.id);
        self.state = BarrelState::OnLadder(ladder.id);
        self.body.vel.y = 0.0;
        self.body.pos.x = ladder.rect.x + (ladder.rect.width - self.body.size.x) / 2.0;
        self.reverse_after_ladder = true;
        self.ladder_ticks = 0;
        log::debug!("Barrel {:?} took ladder {:?}", self.id, ladder.id);
    }

    fn descend(&mut self, ladder_id: LadderId, level: &dyn LevelView) {
        // Ladder vanished from the level: hold still this tick
        let Some(ladder) = level.ladder(ladder_id) else {
            return;
        };

        self.ladder_ticks += 1;
        self.body.pos.y += self.tuning.ladder_descent_speed;
        self.body.pos.x = ladder.rect.x + (ladder.rect.width - self.body.size.x) / 2.0;

        let threshold = self.tuning.platform_detection_threshold;
        if self.body.bottom() >= ladder.rect.bottom() - threshold {
            if let Some(platform) = self.platform_below(level) {
                if (platform.top() - self.body.bottom()).abs() <= threshold {
                    self.body.pos.y = platform.top() - self.body.size.y;
                }
            }
            self.exit_ladder();
        }
    }

    /// Closest platform strictly below the barrel that spans it horizontally
    fn platform_below<'a>(&self, level: &'a dyn LevelView) -> Option<&'a Platform> {
        let bottom = self.body.bottom();
        level
            .platforms()
            .iter()
            .filter(|p| p.top() > bottom && p.spans(self.body.pos.x, self.body.size.x))
            .min_by(|a, b| a.top().total_cmp(&b.top()))
    }

    fn exit_ladder(&mut self) {
        self.state = BarrelState::Grounded;
        self.body.vel.y = self.tuning.ladder_exit_speed;
        self.fall_grace = self.tuning.fall_grace_ticks;
        if self.reverse_after_ladder && self.ladder_ticks >= self.tuning.min_ladder_ticks {
            self.body.vel.x = -self.body.vel.x;
            self.reverse_after_ladder = false;
        }
        log::debug!(
            "Barrel {:?} left ladder after {} ticks, heading {}",
            self.id,
            self.ladder_ticks,
            if self.body.vel.x >= 0.0 { "right" } else { "left" }
        );
        self.ladder_ticks = 0;
    }

    fn on_overflow(&mut self, overflow: Overflow, level: &dyn LevelView) {
        if overflow.horizontal.is_some() && self.body.vel.y <= 0.0 {
            if self.body.pos.y > level.player_position().y + self.tuning.fall_out_margin {
                self.body.remove = true;
                log::debug!("Barrel {:?} dropped off the side below the player", self.id);
            } else {
                // confine() already clamped the position
                self.body.vel.x = -self.body.vel.x;
            }
        }
        if overflow.vertical.is_some() {
            self.body.remove = true;
            self.body.vel.y = 0.0;
            log::debug!("Barrel {:?} left the screen vertically", self.id);
        }
    }
}

impl<R: LadderRoll> Actor for Barrel<R> {
    fn update(&mut self, level: &dyn LevelView) {
        match self.state {
            BarrelState::OnLadder(ladder) => self.descend(ladder, level),
            BarrelState::Grounded => self.roll(level),
        }
        self.body.refresh_hitboxes();
        let overflow = self.body.confine(level.screen_bounds());
        self.on_overflow(overflow, level);
        self.fall_grace = self.fall_grace.saturating_sub(1);
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
