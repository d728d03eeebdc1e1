//! Rect-transform geometry.
//!
//! Every node is placed relative to its parent by an anchor box (fractions of
//! the parent rect) plus offsets, with a pivot inside its own rect. The space
//! is y-up.

use graft_shared::Vec2;

/// A rectangle in tree space (y-up, `y` is the bottom edge).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (bottom edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from its min and max corners.
    #[must_use]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Bottom-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Top-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.top())
    }

    /// Size as a vector.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.top()
    }
}

/// Placement of a node inside its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectTransform {
    /// Lower-left anchor, as a fraction of the parent rect.
    pub anchor_min: Vec2,
    /// Upper-right anchor, as a fraction of the parent rect.
    pub anchor_max: Vec2,
    /// Pivot, as a fraction of the node's own rect.
    pub pivot: Vec2,
    /// Pivot position relative to the anchor reference point.
    pub anchored_position: Vec2,
    /// Size relative to the distance between the anchors.
    pub size_delta: Vec2,
    /// Local scale.
    pub local_scale: Vec2,
}

impl Default for RectTransform {
    fn default() -> Self {
        Self {
            anchor_min: Vec2::new(0.5, 0.5),
            anchor_max: Vec2::new(0.5, 0.5),
            pivot: Vec2::new(0.5, 0.5),
            anchored_position: Vec2::ZERO,
            size_delta: Vec2::new(100.0, 100.0),
            local_scale: Vec2::ONE,
        }
    }
}

impl RectTransform {
    /// A transform filling its parent exactly.
    #[must_use]
    pub const fn fill() -> Self {
        Self {
            anchor_min: Vec2::ZERO,
            anchor_max: Vec2::ONE,
            pivot: Vec2::new(0.5, 0.5),
            anchored_position: Vec2::ZERO,
            size_delta: Vec2::ZERO,
            local_scale: Vec2::ONE,
        }
    }

    /// A fixed-size transform anchored at the parent's bottom-left corner.
    #[must_use]
    pub const fn sized(size: Vec2) -> Self {
        Self {
            anchor_min: Vec2::ZERO,
            anchor_max: Vec2::ZERO,
            pivot: Vec2::ZERO,
            anchored_position: Vec2::ZERO,
            size_delta: size,
            local_scale: Vec2::ONE,
        }
    }

    /// A strip hanging from the parent's top edge, stretched horizontally.
    #[must_use]
    pub const fn top_strip(y: f32, height: f32) -> Self {
        Self {
            anchor_min: Vec2::new(0.0, 1.0),
            anchor_max: Vec2::new(1.0, 1.0),
            pivot: Vec2::new(0.5, 1.0),
            anchored_position: Vec2::new(0.0, y),
            size_delta: Vec2::new(0.0, height),
            local_scale: Vec2::ONE,
        }
    }

    /// Offset of the lower-left corner from the lower-left anchor.
    #[must_use]
    pub fn offset_min(&self) -> Vec2 {
        self.anchored_position - self.size_delta.scale(self.pivot)
    }

    /// Offset of the upper-right corner from the upper-right anchor.
    #[must_use]
    pub fn offset_max(&self) -> Vec2 {
        self.anchored_position + self.size_delta.scale(Vec2::ONE - self.pivot)
    }

    /// Moves the lower-left corner, keeping the upper-right corner fixed.
    pub fn set_offset_min(&mut self, value: Vec2) {
        let offset = value - self.offset_min();
        self.size_delta -= offset;
        self.anchored_position += offset.scale(Vec2::ONE - self.pivot);
    }

    /// Moves the upper-right corner, keeping the lower-left corner fixed.
    pub fn set_offset_max(&mut self, value: Vec2) {
        let offset = value - self.offset_max();
        self.size_delta += offset;
        self.anchored_position += offset.scale(self.pivot);
    }

    /// Resolves this transform inside `parent`.
    #[must_use]
    pub fn resolve(&self, parent: Rect) -> Rect {
        let size = parent.size();
        let anchor_lo = parent.min() + size.scale(self.anchor_min);
        let anchor_hi = parent.min() + size.scale(self.anchor_max);
        Rect::from_min_max(anchor_lo + self.offset_min(), anchor_hi + self.offset_max())
    }

    /// Resolves a root transform, which has no parent rect.
    #[must_use]
    pub fn resolve_root(&self) -> Rect {
        Rect::from_min_max(self.offset_min(), self.offset_max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(50.0, 30.0));
        assert!(!rect.contains(5.0, 30.0));
        assert!(!rect.contains(50.0, 80.0));
    }

    #[test]
    fn test_offsets_round_trip_through_setters() {
        let mut rect = RectTransform::top_strip(-10.0, 60.0);
        rect.set_offset_min(Vec2::new(20.0, rect.offset_min().y));
        rect.set_offset_max(Vec2::new(-20.0, rect.offset_max().y));

        assert_eq!(rect.offset_min().x, 20.0);
        assert_eq!(rect.offset_max().x, -20.0);
        assert_eq!(rect.size_delta.x, -40.0);
        assert_eq!(rect.size_delta.y, 60.0);
    }

    #[test]
    fn test_resolve_stretched_child() {
        let parent = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let mut child = RectTransform::top_strip(-20.0, 60.0);
        child.set_offset_min(Vec2::new(45.0, child.offset_min().y));
        child.set_offset_max(Vec2::new(-45.0, child.offset_max().y));

        let resolved = child.resolve(parent);
        assert_eq!(resolved.x, 45.0);
        assert_eq!(resolved.width, 910.0);
        assert_eq!(resolved.top(), 780.0);
        assert_eq!(resolved.height, 60.0);
    }

    #[test]
    fn test_resolve_root() {
        let root = RectTransform::sized(Vec2::new(1920.0, 1080.0));
        assert_eq!(root.resolve_root(), Rect::new(0.0, 0.0, 1920.0, 1080.0));
    }
}
