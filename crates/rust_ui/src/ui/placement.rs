//! Node placement
//!
//! A placement describes a node's rectangle relative to its parent the way a
//! rect transform does: two normalized anchors select a region of the parent,
//! `size_delta` grows or shrinks that region, and `anchored_position` moves
//! the pivot away from the anchor reference point.

use crate::foundation::math::{Rect, Vec2};

/// Anchor point for UI positioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    /// Top-left corner (0, 0)
    #[default]
    TopLeft,
    /// Top-center
    TopCenter,
    /// Top-right corner
    TopRight,
    /// Middle-left
    MiddleLeft,
    /// Center
    Center,
    /// Middle-right
    MiddleRight,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom-center
    BottomCenter,
    /// Bottom-right corner
    BottomRight,
}

impl Anchor {
    /// Get the normalized anchor position (0.0 to 1.0)
    pub fn to_normalized(self) -> Vec2 {
        let (x, y) = match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopCenter => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::MiddleLeft => (0.0, 0.5),
            Anchor::Center => (0.5, 0.5),
            Anchor::MiddleRight => (1.0, 0.5),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomCenter => (0.5, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        };
        Vec2::new(x, y)
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    /// Left-aligned text
    #[default]
    Left,
    /// Center-aligned text
    Center,
    /// Right-aligned text
    Right,
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    /// Top-aligned text
    #[default]
    Top,
    /// Middle-aligned text
    Middle,
    /// Bottom-aligned text
    Bottom,
}

/// Parent-relative placement of a node
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Normalized lower anchor inside the parent
    pub anchor_min: Vec2,
    /// Normalized upper anchor inside the parent
    pub anchor_max: Vec2,
    /// Normalized pivot inside this node
    pub pivot: Vec2,
    /// Pivot offset from the anchor reference point, in pixels
    pub anchored_position: Vec2,
    /// Size added to the anchored region, in pixels
    pub size_delta: Vec2,
    /// Explicit z-order; inherited from the parent when `None`
    pub depth_override: Option<i32>,
}

impl Default for Placement {
    fn default() -> Self {
        Self::stretch()
    }
}

impl Placement {
    /// Fill the parent rectangle
    pub fn stretch() -> Self {
        Self {
            anchor_min: Vec2::zeros(),
            anchor_max: Vec2::new(1.0, 1.0),
            pivot: Vec2::new(0.5, 0.5),
            anchored_position: Vec2::zeros(),
            size_delta: Vec2::zeros(),
            depth_override: None,
        }
    }

    /// Fixed-size rectangle at `(x, y)` from the parent's top-left corner
    pub fn absolute(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            anchor_min: Vec2::zeros(),
            anchor_max: Vec2::zeros(),
            pivot: Vec2::zeros(),
            anchored_position: Vec2::new(x, y),
            size_delta: Vec2::new(width, height),
            depth_override: None,
        }
    }

    /// Fixed-size rectangle pinned to one of the nine parent anchor points
    ///
    /// The pivot matches the anchor, so `BottomRight` with a zero offset puts
    /// the node's bottom-right corner on the parent's bottom-right corner.
    pub fn anchored(anchor: Anchor, offset: Vec2, size: Vec2) -> Self {
        let point = anchor.to_normalized();
        Self {
            anchor_min: point,
            anchor_max: point,
            pivot: point,
            anchored_position: offset,
            size_delta: size,
            depth_override: None,
        }
    }

    /// Builder pattern: set an explicit z-order
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth_override = Some(depth);
        self
    }

    /// Rectangle of this node in its parent's local space
    pub fn local_rect(&self, parent_size: Vec2) -> Rect {
        let region_min = self.anchor_min.component_mul(&parent_size);
        let region_max = self.anchor_max.component_mul(&parent_size);
        let region = region_max - region_min;

        let size = region + self.size_delta;
        let size = Vec2::new(size.x.max(0.0), size.y.max(0.0));

        let reference = region_min + region.component_mul(&self.pivot);
        let pivot_point = reference + self.anchored_position;
        Rect::from_origin_size(pivot_point - size.component_mul(&self.pivot), size)
    }

    /// Pin this placement to `rect` (parent-local), as layout groups do
    ///
    /// Anchors move to the parent's top-left corner; the pivot is kept.
    pub fn set_layout_rect(&mut self, rect: Rect) {
        self.anchor_min = Vec2::zeros();
        self.anchor_max = Vec2::zeros();
        self.size_delta = rect.size;
        self.anchored_position = rect.origin + rect.size.component_mul(&self.pivot);
    }

    /// Whether both anchors coincide (size does not follow the parent)
    pub fn is_fixed_size(&self) -> bool {
        self.anchor_min == self.anchor_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_left_absolute() {
        let placement = Placement::absolute(10.0, 20.0, 100.0, 50.0);
        let rect = placement.local_rect(Vec2::new(800.0, 600.0));
        assert_eq!(rect, Rect::new(10.0, 20.0, 100.0, 50.0));
    }

    #[test]
    fn test_center_anchor() {
        let placement = Placement::anchored(Anchor::Center, Vec2::zeros(), Vec2::new(100.0, 50.0));
        let rect = placement.local_rect(Vec2::new(800.0, 600.0));
        assert_eq!(rect, Rect::new(350.0, 275.0, 100.0, 50.0));
    }

    #[test]
    fn test_bottom_right_anchor_with_offset() {
        let placement = Placement::anchored(
            Anchor::BottomRight,
            Vec2::new(-10.0, -10.0),
            Vec2::new(100.0, 40.0),
        );
        let rect = placement.local_rect(Vec2::new(800.0, 600.0));
        assert_eq!(rect, Rect::new(690.0, 550.0, 100.0, 40.0));
    }

    #[test]
    fn test_stretch_follows_parent() {
        let mut placement = Placement::stretch();
        assert_eq!(placement.local_rect(Vec2::new(300.0, 200.0)), Rect::new(0.0, 0.0, 300.0, 200.0));

        // Inset by 10 pixels on every side
        placement.size_delta = Vec2::new(-20.0, -20.0);
        assert_eq!(placement.local_rect(Vec2::new(300.0, 200.0)), Rect::new(10.0, 10.0, 280.0, 180.0));
    }

    #[test]
    fn test_layout_rect_round_trips_with_any_pivot() {
        let target = Rect::new(40.0, 12.0, 120.0, 30.0);
        for pivot in [Vec2::zeros(), Vec2::new(0.5, 0.5), Vec2::new(1.0, 0.25)] {
            let mut placement = Placement { pivot, ..Placement::stretch() };
            placement.set_layout_rect(target);
            assert!(placement.is_fixed_size());
            assert_eq!(placement.local_rect(Vec2::new(500.0, 500.0)), target);
        }
    }

    #[test]
    fn test_negative_size_is_clamped() {
        let mut placement = Placement::stretch();
        placement.size_delta = Vec2::new(-1000.0, 0.0);
        assert_eq!(placement.local_rect(Vec2::new(100.0, 100.0)).width(), 0.0);
    }
}
