//! Breakout paddle: the plain clamp-to-screen actor

use glam::Vec2;

use super::geometry::Hitbox;
use super::kinematics::{Actor, Body};
use super::level::LevelView;
use crate::consts::*;
use crate::tuning::PaddleTuning;

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    body: Body,
    tuning: PaddleTuning,
    pub moving_left: bool,
    pub moving_right: bool,
    /// Set once the round is lost; movement input is ignored afterwards
    pub losing: bool,
    /// Input only moves the paddle while the round is active
    pub active: bool,
}

impl Paddle {
    pub fn new(pos: Vec2, width: f32, tuning: PaddleTuning) -> Self {
        let width = width.clamp(tuning.min_width, tuning.max_width);
        let body = Body::new(pos, Vec2::new(width, tuning.height));
        let mut paddle = Self {
            body,
            tuning,
            moving_left: false,
            moving_right: false,
            losing: false,
            active: true,
        };
        paddle.rebuild_hitboxes();
        paddle
    }

    pub fn width(&self) -> f32 {
        self.body.size.x
    }

    /// Resize within the tuning clamp and rebuild the hitbox layout
    pub fn set_width(&mut self, width: f32) {
        self.body.size.x = width.clamp(self.tuning.min_width, self.tuning.max_width);
        self.rebuild_hitboxes();
    }

    pub fn move_left(&mut self) {
        if !self.losing {
            self.moving_left = true;
        }
    }

    pub fn stop_moving_left(&mut self) {
        self.moving_left = false;
    }

    pub fn move_right(&mut self) {
        if !self.losing {
            self.moving_right = true;
        }
    }

    pub fn stop_moving_right(&mut self) {
        self.moving_right = false;
    }

    fn rebuild_hitboxes(&mut self) {
        let Vec2 { x: width, y: height } = self.body.size;
        let center = self.tuning.center_hitbox_width;
        let side = self.tuning.boost_hitbox_width;

        self.body.hitboxes.clear();
        self.body.hitboxes.insert(Hitbox::rect(HITBOX_DEFAULT, self.body.size, Vec2::ZERO, PADDLE_COLOR));
        self.body.hitboxes.insert(Hitbox::rect(
            HITBOX_BALL,
            Vec2::new(center, height),
            Vec2::new((width - center) / 2.0, 0.0),
            PADDLE_BALL_HITBOX_COLOR,
        ));
        self.body.hitboxes.insert(Hitbox::rect(
            HITBOX_BOOST_LEFT,
            Vec2::new(side, height),
            Vec2::ZERO,
            PADDLE_BOOST_HITBOX_COLOR,
        ));
        self.body.hitboxes.insert(Hitbox::rect(
            HITBOX_BOOST_RIGHT,
            Vec2::new(side, height),
            Vec2::new(width - side, 0.0),
            PADDLE_BOOST_HITBOX_COLOR,
        ));
        self.body.refresh_hitboxes();
    }

    fn intent(&self) -> f32 {
        if !self.active {
            return 0.0;
        }
        match (self.moving_left, self.moving_right) {
            (true, false) => -self.tuning.speed,
            (false, true) => self.tuning.speed,
            _ => 0.0,
        }
    }
}

impl Actor for Paddle {
    fn update(&mut self, level: &dyn LevelView) {
        self.body.vel = Vec2::new(self.intent(), 0.0);
        // Clamp only; the paddle has no boundary side effects
        self.body.tick(level.screen_bounds());
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
