//! Static level geometry and the read-only view actors query each tick

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Stable platform identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

/// Stable ladder identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LadderId(pub u32);

/// A girder segment barrels roll along
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub rect: Rect,
}

impl Platform {
    pub fn new(id: u32, rect: Rect) -> Self {
        Self {
            id: PlatformId(id),
            rect,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.rect.y
    }

    /// True when `[x, x + width)` overlaps the platform horizontally
    #[inline]
    pub fn spans(&self, x: f32, width: f32) -> bool {
        x + width > self.rect.x && x < self.rect.right()
    }
}

/// A ladder; only `pass_through` ladders can be taken by barrels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    pub id: LadderId,
    pub rect: Rect,
    pub pass_through: bool,
}

impl Ladder {
    pub fn new(id: u32, rect: Rect, pass_through: bool) -> Self {
        Self {
            id: LadderId(id),
            rect,
            pass_through,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.rect.x + self.rect.width / 2.0
    }
}

/// Read-only collaborators an actor needs during its tick
pub trait LevelView {
    fn platforms(&self) -> &[Platform];

    fn ladders(&self) -> &[Ladder];

    fn screen_bounds(&self) -> Rect;

    /// Current player position (top-left), used by the barrel removal policy
    fn player_position(&self) -> Vec2;

    fn ladder(&self, id: LadderId) -> Option<&Ladder> {
        self.ladders().iter().find(|l| l.id == id)
    }

    fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms().iter().find(|p| p.id == id)
    }
}

/// Owned level layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub screen: Rect,
    pub platforms: Vec<Platform>,
    pub ladders: Vec<Ladder>,
    pub player_pos: Vec2,
}

impl Level {
    pub fn new(screen: Rect) -> Self {
        Self {
            screen,
            platforms: Vec::new(),
            ladders: Vec::new(),
            player_pos: Vec2::new(screen.x, screen.y),
        }
    }

    pub fn with_platform(mut self, id: u32, rect: Rect) -> Self {
        self.platforms.push(Platform::new(id, rect));
        self
    }

    pub fn with_ladder(mut self, id: u32, rect: Rect, pass_through: bool) -> Self {
        self.ladders.push(Ladder::new(id, rect, pass_through));
        self
    }

    pub fn with_player_at(mut self, pos: Vec2) -> Self {
        self.player_pos = pos;
        self
    }
}

impl LevelView for Level {
    fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    fn ladders(&self) -> &[Ladder] {
        &self.ladders
    }

    fn screen_bounds(&self) -> Rect {
        self.screen
    }

    fn player_position(&self) -> Vec2 {
        self.player_pos
    }
}
