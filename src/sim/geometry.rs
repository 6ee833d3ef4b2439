//! Hitbox primitives and intersection tests
//!
//! Every overlap test is strict: shapes that only touch along an edge or at a
//! single point do not intersect. Hitbox positions are absolute and derived
//! from the owner's anchor plus a fixed offset, so they must be refreshed
//! whenever the owner moves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left corner + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min.x, min.y, size.x, size.y)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        rect_intersects(self, other)
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.min() + self.size())
    }
}

/// Circle stored by its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Axis-aligned overlap test. Symmetric; touching edges do not count.
#[inline]
pub fn rect_intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Squared center distance against squared radius sum (no square root).
#[inline]
pub fn circle_intersects(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius + b.radius;
    a.center.distance_squared(b.center) < reach * reach
}

/// Closest-point test between a rectangle and a circle.
#[inline]
pub fn rect_circle_intersects(rect: &Rect, circle: &Circle) -> bool {
    let closest = rect.clamp_point(circle.center);
    closest.distance_squared(circle.center) < circle.radius * circle.radius
}

/// Shape of a hitbox
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Rectangle; `pos` is its top-left corner
    Rect { size: Vec2 },
    /// Circle; `pos` is its center
    Circle { radius: f32 },
}

/// Named geometric region attached to an owner at a fixed offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub name: String,
    pub shape: Shape,
    /// Offset from the owner's anchor
    pub offset: Vec2,
    /// Absolute position (anchor + offset)
    pub pos: Vec2,
    /// Debug color handed to the renderer
    pub color: u32,
}

impl Hitbox {
    pub fn rect(name: impl Into<String>, size: Vec2, offset: Vec2, color: u32) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Rect { size },
            offset,
            pos: offset,
            color,
        }
    }

    pub fn circle(name: impl Into<String>, radius: f32, offset: Vec2, color: u32) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Circle { radius },
            offset,
            pos: offset,
            color,
        }
    }

    /// Recompute the absolute position from the owner's anchor
    #[inline]
    pub fn update_position(&mut self, anchor: Vec2) {
        self.pos = anchor + self.offset;
    }

    /// Copy of this hitbox as it would sit at another anchor
    pub fn at(&self, anchor: Vec2) -> Self {
        let mut moved = self.clone();
        moved.update_position(anchor);
        moved
    }

    /// Bounding rectangle (exact for rectangle hitboxes)
    pub fn bounds(&self) -> Rect {
        match self.shape {
            Shape::Rect { size } => Rect::from_min_size(self.pos, size),
            Shape::Circle { radius } => {
                Rect::from_min_size(self.pos - Vec2::splat(radius), Vec2::splat(radius * 2.0))
            }
        }
    }

    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        match self.shape {
            Shape::Rect { size } => rect_intersects(&Rect::from_min_size(self.pos, size), rect),
            Shape::Circle { radius } => rect_circle_intersects(rect, &Circle::new(self.pos, radius)),
        }
    }

    pub fn intersects(&self, other: &Hitbox) -> bool {
        match (self.shape, other.shape) {
            (Shape::Circle { radius: a }, Shape::Circle { radius: b }) => {
                circle_intersects(&Circle::new(self.pos, a), &Circle::new(other.pos, b))
            }
            (Shape::Rect { size }, _) => other.intersects_rect(&Rect::from_min_size(self.pos, size)),
            (Shape::Circle { .. }, Shape::Rect { size }) => {
                self.intersects_rect(&Rect::from_min_size(other.pos, size))
            }
        }
    }
}

/// Ordered, name-keyed hitbox collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitboxSet {
    entries: Vec<Hitbox>,
}

impl HitboxSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a hitbox; an existing entry with the same name is replaced in place
    pub fn insert(&mut self, hitbox: Hitbox) {
        match self.entries.iter_mut().find(|h| h.name == hitbox.name) {
            Some(slot) => *slot = hitbox,
            None => self.entries.push(hitbox),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Hitbox> {
        self.entries.iter().find(|h| h.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hitbox> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Recompute every hitbox from the owner's anchor
    pub fn refresh(&mut self, anchor: Vec2) {
        for hitbox in &mut self.entries {
            hitbox.update_position(anchor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(rect_intersects(&a, &b));
        assert!(rect_intersects(&b, &a));
    }

    #[test]
    fn test_rect_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let corner = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(!rect_intersects(&a, &right));
        assert!(!rect_intersects(&a, &below));
        assert!(!rect_intersects(&a, &corner));
    }

    #[test]
    fn test_circle_overlap_and_touch() {
        let a = Circle::new(Vec2::ZERO, 5.0);
        assert!(circle_intersects(&a, &Circle::new(Vec2::new(9.0, 0.0), 5.0)));
        // Exactly touching
        assert!(!circle_intersects(&a, &Circle::new(Vec2::new(10.0, 0.0), 5.0)));
    }

    #[test]
    fn test_rect_circle() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_circle_intersects(&rect, &Circle::new(Vec2::new(12.0, 5.0), 3.0)));
        assert!(!rect_circle_intersects(&rect, &Circle::new(Vec2::new(13.0, 5.0), 3.0)));
        // Near a corner the closest point is the corner itself
        assert!(!rect_circle_intersects(&rect, &Circle::new(Vec2::new(13.0, 13.0), 4.0)));
    }

    #[test]
    fn test_hitbox_follows_anchor() {
        let mut hitbox = Hitbox::rect("ladder", Vec2::splat(16.0), Vec2::splat(-2.0), 0);
        hitbox.update_position(Vec2::new(20.0, 30.0));
        assert_eq!(hitbox.pos, Vec2::new(18.0, 28.0));
        assert_eq!(hitbox.bounds(), Rect::new(18.0, 28.0, 16.0, 16.0));
    }

    #[test]
    fn test_mixed_hitbox_intersection() {
        let rect = Hitbox::rect("default", Vec2::splat(10.0), Vec2::ZERO, 0).at(Vec2::ZERO);
        let circle = Hitbox::circle("bubble", 4.0, Vec2::ZERO, 0).at(Vec2::new(12.0, 5.0));
        assert!(rect.intersects(&circle));
        assert!(circle.intersects(&rect));
    }

    #[test]
    fn test_hitbox_set_replaces_by_name() {
        let mut set = HitboxSet::new();
        set.insert(Hitbox::rect("default", Vec2::splat(4.0), Vec2::ZERO, 0));
        set.insert(Hitbox::rect("player", Vec2::splat(2.0), Vec2::ONE, 0));
        set.insert(Hitbox::rect("default", Vec2::splat(8.0), Vec2::ZERO, 0));

        assert_eq!(set.len(), 2);
        let names: Vec<_> = set.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["default", "player"]);
        assert_eq!(set.get("default").map(|h| h.shape), Some(Shape::Rect { size: Vec2::splat(8.0) }));
        assert!(set.get("missing").is_none());

        set.refresh(Vec2::new(5.0, 5.0));
        assert_eq!(set.get("player").map(|h| h.pos), Some(Vec2::new(6.0, 6.0)));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-100.0f32..100.0, -100.0f32..100.0, 0.0f32..50.0, 0.0f32..50.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_rect_intersection_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(rect_intersects(&a, &b), rect_intersects(&b, &a));
        }

        #[test]
        fn prop_edge_adjacent_rects_never_intersect(a in rect_strategy(), h in 0.0f32..50.0, dy in -50.0f32..50.0) {
            let neighbor = Rect::new(a.right(), a.y + dy, 10.0, h);
            prop_assert!(!rect_intersects(&a, &neighbor));
        }

        #[test]
        fn prop_circle_intersection_is_symmetric(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0, ar in 0.1f32..20.0,
            bx in -50.0f32..50.0, by in -50.0f32..50.0, br in 0.1f32..20.0
        ) {
            let a = Circle::new(Vec2::new(ax, ay), ar);
            let b = Circle::new(Vec2::new(bx, by), br);
            prop_assert_eq!(circle_intersects(&a, &b), circle_intersects(&b, &a));
        }
    }
}
