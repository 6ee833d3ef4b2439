//! Bubble container: ticks bubbles and resolves their signals
//!
//! Bubbles are kept sorted by id for deterministic iteration. A launched
//! bubble that stops (against another bubble or the ceiling) is attached to
//! every resting neighbor it touches, in both directions. Support is then
//! recomputed from the ceiling and any resting bubble left unconnected starts
//! to fall.

use glam::Vec2;

use super::bubble::{Bubble, BubbleEvent, BubbleId, propagate_top_connection};
use super::geometry::Rect;
use crate::tuning::BubbleTuning;

/// What happened during one [`BubbleGrid::update`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridReport {
    /// Launched bubbles that stopped and joined the grid
    pub attached: Vec<BubbleId>,
    /// Resting bubbles that lost their support and started falling
    pub dropped: Vec<BubbleId>,
    /// Falling bubbles that reached the floor and were removed
    pub removed: Vec<BubbleId>,
}

/// The bubble play field
#[derive(Debug, Clone)]
pub struct BubbleGrid {
    bounds: Rect,
    tuning: BubbleTuning,
    bubbles: Vec<Bubble>,
    next_id: u32,
}

impl BubbleGrid {
    pub fn new(bounds: Rect, tuning: BubbleTuning) -> Self {
        Self {
            bounds,
            tuning,
            bubbles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn tuning(&self) -> &BubbleTuning {
        &self.tuning
    }

    /// All bubbles, ascending by id
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    fn index(&self, id: BubbleId) -> Option<usize> {
        self.bubbles.binary_search_by_key(&id, |b| b.id).ok()
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        let i = self.index(id)?;
        Some(&self.bubbles[i])
    }

    pub fn get_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        let i = self.index(id)?;
        Some(&mut self.bubbles[i])
    }

    /// Add a resting bubble at `pos`
    pub fn spawn(&mut self, pos: Vec2, kind: u32) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;
        self.bubbles.push(Bubble::new(id, pos, self.tuning.radius, kind));
        id
    }

    /// Add a bubble and fire it immediately
    pub fn spawn_launched(&mut self, pos: Vec2, kind: u32, angle_degrees: f32, speed: f32) -> BubbleId {
        let id = self.spawn(pos, kind);
        self.launch(id, angle_degrees, speed);
        id
    }

    pub fn launch(&mut self, id: BubbleId, angle_degrees: f32, speed: f32) -> bool {
        match self.get_mut(id) {
            Some(bubble) => {
                bubble.launch(angle_degrees, speed);
                true
            }
            None => false,
        }
    }

    /// Record an edge in both directions
    pub fn connect(&mut self, a: BubbleId, b: BubbleId) -> bool {
        if a == b || self.index(a).is_none() || self.index(b).is_none() {
            return false;
        }
        if let Some(bubble) = self.get_mut(a) {
            bubble.add_connection(b);
        }
        if let Some(bubble) = self.get_mut(b) {
            bubble.add_connection(a);
        }
        true
    }

    /// Delete a bubble and every edge pointing at it
    pub fn remove(&mut self, id: BubbleId) -> Option<Bubble> {
        let index = self.index(id)?;
        let removed = self.bubbles.remove(index);
        for bubble in &mut self.bubbles {
            bubble.remove_connection(id);
        }
        Some(removed)
    }

    /// Remove a set of bubbles (e.g. a matched cluster) and drop whatever
    /// they were holding up. Returns the dropped ids.
    pub fn pop(&mut self, ids: &[BubbleId]) -> Vec<BubbleId> {
        for &id in ids {
            self.remove(id);
        }
        self.refresh_support()
    }

    pub fn propagate_top_connection(&mut self, seed: BubbleId) -> usize {
        propagate_top_connection(&mut self.bubbles, seed)
    }

    fn touches_ceiling(&self, bubble: &Bubble) -> bool {
        bubble.pos().y - bubble.radius() <= self.bounds.y + self.tuning.attach_tolerance
    }

    /// Link a stopped bubble to the resting bubbles it touches, then
    /// recompute support. Returns the ids that started falling.
    pub fn attach(&mut self, id: BubbleId) -> Vec<BubbleId> {
        self.attach_within(id, self.tuning.attach_tolerance)
    }

    /// `attach` with an explicit gap allowance. A shot rolled back to its last
    /// clear micro-step may sit up to one step short of the bubble it hit.
    fn attach_within(&mut self, id: BubbleId, slack: f32) -> Vec<BubbleId> {
        let Some(bubble) = self.get(id) else {
            return Vec::new();
        };
        let (pos, radius) = (bubble.pos(), bubble.radius());

        let neighbors: Vec<BubbleId> = self
            .bubbles
            .iter()
            .filter(|o| o.id != id && o.is_resting())
            .filter(|o| o.pos().distance(pos) <= radius + o.radius() + slack)
            .map(|o| o.id)
            .collect();
        for &neighbor in &neighbors {
            self.connect(id, neighbor);
        }
        log::debug!("Bubble {:?} attached to {} neighbors", id, neighbors.len());

        self.refresh_support()
    }

    /// Re-seed the top connection from the ceiling and drop every resting
    /// bubble that is no longer reachable. Returns the dropped ids.
    pub fn refresh_support(&mut self) -> Vec<BubbleId> {
        for bubble in &mut self.bubbles {
            bubble.set_connected_to_top(false);
        }

        let seeds: Vec<BubbleId> = self
            .bubbles
            .iter()
            .filter(|b| b.is_resting() && self.touches_ceiling(b))
            .map(|b| b.id)
            .collect();
        for seed in seeds {
            propagate_top_connection(&mut self.bubbles, seed);
        }

        let dropped: Vec<BubbleId> = self
            .bubbles
            .iter()
            .filter(|b| b.is_resting() && !b.is_connected_to_top())
            .map(|b| b.id)
            .collect();
        let fall_speed = self.tuning.fall_speed;
        for &id in &dropped {
            for bubble in &mut self.bubbles {
                bubble.remove_connection(id);
            }
            if let Some(bubble) = self.get_mut(id) {
                bubble.clear_connections();
                bubble.start_falling(fall_speed);
            }
        }
        if !dropped.is_empty() {
            log::debug!("Dropped {} unsupported bubbles", dropped.len());
        }
        dropped
    }

    /// Keep a launched bubble between the side walls; stop it at the ceiling
    fn confine_launched(bounds: Rect, bubble: &mut Bubble) -> Option<BubbleEvent> {
        if !bubble.is_moving() || bubble.is_falling() {
            return None;
        }
        let r = bubble.radius();
        let mut pos = bubble.pos();

        if pos.x - r < bounds.x {
            pos.x = bounds.x + r;
            bubble.bounce_horizontal();
        } else if pos.x + r > bounds.right() {
            pos.x = bounds.right() - r;
            bubble.bounce_horizontal();
        }

        let hit_ceiling = pos.y - r <= bounds.y;
        if hit_ceiling {
            pos.y = bounds.y + r;
        }
        bubble.set_position(pos);

        if hit_ceiling {
            bubble.stop();
            Some(BubbleEvent::Collided)
        } else {
            None
        }
    }

    /// Tick every bubble once and resolve the signals they raised
    pub fn update(&mut self) -> GridReport {
        let floor = self.bounds.bottom();
        let steps = self.tuning.micro_steps;
        let mut stopped = Vec::new();
        let mut landed = Vec::new();

        for i in 0..self.bubbles.len() {
            let mut bubble = self.bubbles[i].clone();
            let step_length = bubble.vel().length() / steps.max(1) as f32;
            let event = bubble
                .update(&self.bubbles, floor, steps)
                .or_else(|| Self::confine_launched(self.bounds, &mut bubble));
            match event {
                Some(BubbleEvent::Collided) => stopped.push((bubble.id, step_length)),
                Some(BubbleEvent::ReachedFloor) => landed.push(bubble.id),
                None => {}
            }
            self.bubbles[i] = bubble;
        }

        let mut report = GridReport::default();
        for (id, step_length) in stopped {
            let dropped = self.attach_within(id, self.tuning.attach_tolerance + step_length);
            // A shot that found no support falls with the rest; it never joined
            if !dropped.contains(&id) {
                report.attached.push(id);
            }
            report.dropped.extend(dropped);
        }
        for id in landed {
            if self.remove(id).is_some() {
                report.removed.push(id);
            }
        }
        report
    }
}
