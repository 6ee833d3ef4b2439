//! Deterministic simulation module
//!
//! All per-tick gameplay logic lives here. This module must stay pure:
//! - One `update` per entity per tick, driven by the host
//! - Injected RNG only (no global or time-seeded sources)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod barrel;
pub mod bubble;
pub mod bubble_grid;
pub mod geometry;
pub mod kinematics;
pub mod level;
pub mod paddle;

pub use barrel::{Barrel, BarrelId, BarrelState, LadderRoll};
pub use bubble::{Bubble, BubbleEvent, BubbleId, propagate_top_connection};
pub use bubble_grid::{BubbleGrid, GridReport};
pub use geometry::{Circle, Hitbox, HitboxSet, Rect, Shape, circle_intersects, rect_circle_intersects, rect_intersects};
pub use kinematics::{Actor, Body, Overflow, ScreenSide};
pub use level::{Ladder, LadderId, Level, LevelView, Platform, PlatformId};
pub use paddle::Paddle;
