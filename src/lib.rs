//! GeoWare Arcade - simulation core for the arcade minigames
//!
//! Core modules:
//! - `sim`: Deterministic per-tick simulation (hitboxes, bodies, barrel AI, bubbles)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, menus, asset loading and score transport live in the host
//! application; this crate only advances state.

pub mod sim;
pub mod tuning;

pub use tuning::{BarrelTuning, BubbleTuning, PaddleTuning, Tuning, TuningError};

use glam::Vec2;

/// Shared simulation constants
pub mod consts {
    /// Body-sized hitbox every actor carries
    pub const HITBOX_DEFAULT: &str = "default";
    /// Wider probe a barrel uses to find ladders
    pub const HITBOX_LADDER: &str = "ladder";
    /// Smaller hitbox the player is tested against
    pub const HITBOX_PLAYER: &str = "player";
    /// Paddle center region that returns the ball normally
    pub const HITBOX_BALL: &str = "ball_hitbox";
    /// Paddle edge regions that boost the ball
    pub const HITBOX_BOOST_LEFT: &str = "boost_ball_hitbox_l";
    pub const HITBOX_BOOST_RIGHT: &str = "boost_ball_hitbox_r";
    /// Circular hitbox of a bubble
    pub const HITBOX_BUBBLE: &str = "bubble";

    /// Debug colors (ARGB) handed to the renderer with each hitbox
    pub const DEFAULT_HITBOX_COLOR: u32 = 0xffff_aaff;
    pub const LADDER_HITBOX_COLOR: u32 = 0x8800_ff00;
    pub const PLAYER_HITBOX_COLOR: u32 = 0x88ff_0000;
    pub const PADDLE_COLOR: u32 = 0xff83_00ff;
    pub const PADDLE_BALL_HITBOX_COLOR: u32 = 0xffc3_c3c3;
    pub const PADDLE_BOOST_HITBOX_COLOR: u32 = 0xaaff_5d00;
    pub const BUBBLE_HITBOX_COLOR: u32 = 0xffff_ffff;
}

/// Convert a launch heading in degrees to a screen-space velocity.
///
/// Screen y grows downward, so a heading of 90° points straight up.
#[inline]
pub fn heading_to_velocity(angle_degrees: f32, speed: f32) -> Vec2 {
    let theta = angle_degrees.to_radians();
    Vec2::new(theta.cos() * speed, -theta.sin() * speed)
}
