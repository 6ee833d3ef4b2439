//! Bubble motion and connectivity
//!
//! A bubble is either launched (sub-stepped motion that halts at the last
//! non-colliding micro-step) or falling (detached, straight down, no
//! collision). Resting bubbles form a graph through their connection lists;
//! [`propagate_top_connection`] floods the "connected to top" mark through it.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Hitbox};
use crate::consts::*;
use crate::heading_to_velocity;

/// Stable bubble identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

/// Signal a bubble raises for its container (at most one per tick)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleEvent {
    /// Launched bubble stopped against another bubble; needs attaching
    Collided,
    /// Falling bubble reached the floor; needs removing
    ReachedFloor,
}

/// A bubble: projectile while moving, graph node while resting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    /// Center
    pos: Vec2,
    radius: f32,
    vel: Vec2,
    /// Color/kind index for the match logic and renderer
    pub kind: u32,
    moving: bool,
    falling: bool,
    connected_to_top: bool,
    connections: Vec<BubbleId>,
    hitbox: Hitbox,
}

impl Bubble {
    pub fn new(id: BubbleId, pos: Vec2, radius: f32, kind: u32) -> Self {
        Self {
            id,
            pos,
            radius,
            vel: Vec2::ZERO,
            kind,
            moving: false,
            falling: false,
            connected_to_top: false,
            connections: Vec::new(),
            hitbox: Hitbox::circle(HITBOX_BUBBLE, radius, Vec2::ZERO, BUBBLE_HITBOX_COLOR).at(pos),
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    pub fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    /// Resting in the grid: neither launched nor falling
    pub fn is_resting(&self) -> bool {
        !self.moving && !self.falling
    }

    pub fn is_connected_to_top(&self) -> bool {
        self.connected_to_top
    }

    pub fn set_connected_to_top(&mut self, connected: bool) {
        self.connected_to_top = connected;
    }

    pub fn connections(&self) -> &[BubbleId] {
        &self.connections
    }

    /// Record an edge to `other` on this bubble only; duplicates are ignored
    pub fn add_connection(&mut self, other: BubbleId) {
        if other != self.id && !self.connections.contains(&other) {
            self.connections.push(other);
        }
    }

    pub fn remove_connection(&mut self, other: BubbleId) {
        self.connections.retain(|&id| id != other);
    }

    pub fn clear_connections(&mut self) {
        self.connections.clear();
    }

    /// Move the bubble and its hitbox together
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.hitbox.update_position(pos);
    }

    /// Fire the bubble at `angle_degrees` (90° is straight up)
    pub fn launch(&mut self, angle_degrees: f32, speed: f32) {
        self.vel = heading_to_velocity(angle_degrees, speed);
        self.moving = true;
    }

    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
        self.moving = false;
    }

    /// Detach and drop straight down; no-op if already falling
    pub fn start_falling(&mut self, speed: f32) {
        if self.falling {
            return;
        }
        self.falling = true;
        self.moving = true;
        self.vel = Vec2::new(0.0, speed);
    }

    /// Reflect horizontal motion (side walls)
    pub fn bounce_horizontal(&mut self) {
        self.vel.x = -self.vel.x;
    }

    /// Advance one tick.
    ///
    /// `others` may contain this bubble; it is skipped by id. Falling bubbles
    /// in `others` are ignored as obstacles.
    pub fn update(&mut self, others: &[Bubble], floor_y: f32, micro_steps: u32) -> Option<BubbleEvent> {
        if self.falling {
            self.moving = true;
            self.set_position(self.pos + self.vel);
            if self.pos.y + self.radius >= floor_y {
                return Some(BubbleEvent::ReachedFloor);
            }
            return None;
        }
        if !self.moving {
            return None;
        }

        let steps = micro_steps.max(1);
        let step = self.vel / steps as f32;
        let mut clear = self.pos;

        for _ in 0..steps {
            let next = clear + step;
            self.hitbox.update_position(next);
            let blocked = others
                .iter()
                .any(|other| other.id != self.id && !other.falling && self.hitbox.intersects(&other.hitbox));
            if blocked {
                self.set_position(clear);
                self.stop();
                return Some(BubbleEvent::Collided);
            }
            clear = next;
        }

        self.set_position(clear);
        None
    }
}

/// Flood the top-connected mark from `seed` along stored edges.
///
/// A bubble already marked is not expanded again, so cycles terminate and the
/// walk costs O(nodes + edges). Edges to ids missing from `bubbles` are
/// skipped. Returns how many bubbles were newly marked.
pub fn propagate_top_connection(bubbles: &mut [Bubble], seed: BubbleId) -> usize {
    let index: HashMap<BubbleId, usize> = bubbles.iter().enumerate().map(|(i, b)| (b.id, i)).collect();
    let Some(&start) = index.get(&seed) else {
        return 0;
    };
    if bubbles[start].connected_to_top {
        return 0;
    }

    let mut marked = 0;
    let mut work = vec![start];
    bubbles[start].connected_to_top = true;

    while let Some(current) = work.pop() {
        marked += 1;
        for i in 0..bubbles[current].connections.len() {
            let neighbor = bubbles[current].connections[i];
            let Some(&next) = index.get(&neighbor) else {
                continue;
            };
            if !bubbles[next].connected_to_top {
                bubbles[next].connected_to_top = true;
                work.push(next);
            }
        }
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const R: f32 = 10.0;

    fn bubble(id: u32, x: f32, y: f32) -> Bubble {
        Bubble::new(BubbleId(id), Vec2::new(x, y), R, 0)
    }

    #[test]
    fn test_launch_straight_up() {
        let mut b = bubble(1, 50.0, 200.0);
        b.launch(90.0, 6.0);
        assert!(b.is_moving());

        assert_eq!(b.update(&[], 300.0, 30), None);
        assert!(b.vel().x.abs() < 1e-5);
        assert!((b.vel().y + 6.0).abs() < 1e-5);
        assert!((b.pos().y - 194.0).abs() < 1e-3);
    }

    #[test]
    fn test_stops_at_last_clear_micro_step() {
        let obstacle = bubble(2, 50.0, 150.0);
        let mut b = bubble(1, 50.0, 173.9);
        b.launch(90.0, 6.0);

        // Contact happens once centers are closer than 20 (micro-step 20 of 30)
        let event = b.update(std::slice::from_ref(&obstacle), 300.0, 30);
        assert_eq!(event, Some(BubbleEvent::Collided));
        assert!(!b.is_moving());
        assert_eq!(b.vel(), Vec2::ZERO);

        // Partial progress kept, no overlap left
        assert!(b.pos().y < 173.9);
        assert!(b.pos().y > 170.0);
        assert!(!b.hitbox().intersects(obstacle.hitbox()));
        assert_eq!(b.hitbox().pos, b.pos());
    }

    #[test]
    fn test_ignores_self_and_falling_bubbles() {
        let mut falling = bubble(2, 50.0, 190.0);
        falling.start_falling(5.0);
        let mut b = bubble(1, 50.0, 200.0);
        b.launch(90.0, 6.0);
        let snapshot = vec![b.clone(), falling];

        assert_eq!(b.update(&snapshot, 300.0, 30), None);
        assert!(b.is_moving());
    }

    #[test]
    fn test_resting_bubble_does_not_move() {
        let mut b = bubble(1, 50.0, 50.0);
        assert_eq!(b.update(&[], 300.0, 30), None);
        assert_eq!(b.pos(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_falling_bubble_reaches_floor_after_one_tick() {
        let floor = 240.0;
        let mut b = bubble(1, 50.0, floor - R + 1.0);
        b.start_falling(5.0);

        assert_eq!(b.update(&[], floor, 30), Some(BubbleEvent::ReachedFloor));
        assert_eq!(b.pos().y, floor - R + 6.0);
    }

    #[test]
    fn test_falling_bubble_above_floor() {
        let mut b = bubble(1, 50.0, 100.0);
        b.start_falling(5.0);
        assert_eq!(b.update(&[], 240.0, 30), None);
        assert_eq!(b.pos(), Vec2::new(50.0, 105.0));
    }

    #[test]
    fn test_start_falling_is_idempotent() {
        let mut b = bubble(1, 50.0, 100.0);
        b.launch(45.0, 4.0);
        b.start_falling(5.0);
        assert_eq!(b.vel(), Vec2::new(0.0, 5.0));
        b.start_falling(9.0);
        assert_eq!(b.vel(), Vec2::new(0.0, 5.0));
        assert!(b.is_falling() && b.is_moving());
    }

    #[test]
    fn test_add_connection_is_duplicate_safe_and_one_way() {
        let mut a = bubble(1, 0.0, 0.0);
        let b = bubble(2, 20.0, 0.0);
        a.add_connection(b.id);
        a.add_connection(b.id);
        a.add_connection(a.id);
        assert_eq!(a.connections(), &[BubbleId(2)]);
        assert!(b.connections().is_empty());
    }

    #[test]
    fn test_propagation_over_cycle() {
        let mut bubbles = vec![bubble(1, 0.0, 0.0), bubble(2, 20.0, 0.0), bubble(3, 10.0, 17.0)];
        let links = [(0, 1), (1, 2), (2, 0)];
        for (a, b) in links {
            let (ida, idb) = (bubbles[a].id, bubbles[b].id);
            bubbles[a].add_connection(idb);
            bubbles[b].add_connection(ida);
        }

        assert_eq!(propagate_top_connection(&mut bubbles, BubbleId(1)), 3);
        assert!(bubbles.iter().all(Bubble::is_connected_to_top));

        // Already marked seed short-circuits
        assert_eq!(propagate_top_connection(&mut bubbles, BubbleId(2)), 0);
    }

    #[test]
    fn test_propagation_follows_stored_direction_only() {
        let mut bubbles = vec![bubble(1, 0.0, 0.0), bubble(2, 20.0, 0.0), bubble(3, 40.0, 0.0)];
        // 2 -> 1 and 2 -> 3 recorded on bubble 2 only
        bubbles[1].add_connection(BubbleId(1));
        bubbles[1].add_connection(BubbleId(3));

        assert_eq!(propagate_top_connection(&mut bubbles, BubbleId(1)), 1);
        assert!(!bubbles[1].is_connected_to_top());

        assert_eq!(propagate_top_connection(&mut bubbles, BubbleId(2)), 2);
        assert!(bubbles[2].is_connected_to_top());
    }

    #[test]
    fn test_propagation_skips_dangling_edges() {
        let mut bubbles = vec![bubble(1, 0.0, 0.0)];
        bubbles[0].add_connection(BubbleId(99));
        assert_eq!(propagate_top_connection(&mut bubbles, BubbleId(1)), 1);
        assert_eq!(propagate_top_connection(&mut bubbles, BubbleId(42)), 0);
    }

    proptest! {
        #[test]
        fn prop_propagation_marks_exactly_reachable(
            n in 1usize..24,
            edges in proptest::collection::vec((0usize..24, 0usize..24), 0..64)
        ) {
            let mut bubbles: Vec<Bubble> = (0..n).map(|i| bubble(i as u32, i as f32 * 20.0, 0.0)).collect();
            for &(a, b) in &edges {
                if a < n && b < n {
                    let target = bubbles[b].id;
                    bubbles[a].add_connection(target);
                }
            }

            // Reference reachability
            let mut reach = vec![false; n];
            let mut stack = vec![0usize];
            reach[0] = true;
            while let Some(i) = stack.pop() {
                for id in bubbles[i].connections().to_vec() {
                    let j = id.0 as usize;
                    if !reach[j] {
                        reach[j] = true;
                        stack.push(j);
                    }
                }
            }

            let marked = propagate_top_connection(&mut bubbles, BubbleId(0));
            prop_assert_eq!(marked, reach.iter().filter(|&&r| r).count());
            for (i, b) in bubbles.iter().enumerate() {
                prop_assert_eq!(b.is_connected_to_top(), reach[i]);
            }
        }
    }
}
