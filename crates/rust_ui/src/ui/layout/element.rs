//! Layout element descriptor and measured size contracts

use crate::foundation::math::{Axis, Vec2};
use crate::ui::error::{UiError, UiResult};

/// A node's size contract as seen by its parent group
///
/// Both axes are independent. A flexible weight of zero means the node never
/// grows past its preferred size.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutElement {
    /// Smallest acceptable size
    pub min: Vec2,
    /// Size the node asks for
    pub preferred: Vec2,
    /// Share of the slack the node takes when the group grows children
    pub flexible: Vec2,
}

impl Default for LayoutElement {
    fn default() -> Self {
        Self {
            min: Vec2::zeros(),
            preferred: Vec2::zeros(),
            flexible: Vec2::zeros(),
        }
    }
}

impl LayoutElement {
    /// Descriptor with explicit min, preferred and flexible sizes
    pub fn new(min: Vec2, preferred: Vec2, flexible: Vec2) -> Self {
        Self { min, preferred, flexible }
    }

    /// Rigid descriptor: min and preferred are both `size`
    pub fn fixed(width: f32, height: f32) -> Self {
        let size = Vec2::new(width, height);
        Self::new(size, size, Vec2::zeros())
    }

    /// Builder pattern: minimum size
    pub fn with_min(mut self, width: f32, height: f32) -> Self {
        self.min = Vec2::new(width, height);
        self
    }

    /// Builder pattern: preferred size
    pub fn with_preferred(mut self, width: f32, height: f32) -> Self {
        self.preferred = Vec2::new(width, height);
        self
    }

    /// Builder pattern: flexible weights
    pub fn with_flexible(mut self, width: f32, height: f32) -> Self {
        self.flexible = Vec2::new(width, height);
        self
    }

    /// Reject descriptors whose min exceeds preferred on either axis
    pub fn validate(&self) -> UiResult<()> {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let i = axis.index();
            if self.min[i] > self.preferred[i] {
                return Err(UiError::InvalidLayoutConstraint {
                    axis,
                    min: self.min[i],
                    preferred: self.preferred[i],
                });
            }
        }
        Ok(())
    }

    /// Contract reported to the parent group
    pub fn contract(&self) -> SizeContract {
        SizeContract {
            min: self.min,
            preferred: self.preferred,
            flexible: Vec2::new(self.flexible.x.max(0.0), self.flexible.y.max(0.0)),
        }
    }
}

/// Measured min/preferred/flexible sizes of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeContract {
    /// Smallest acceptable size
    pub min: Vec2,
    /// Requested size
    pub preferred: Vec2,
    /// Flexible weights
    pub flexible: Vec2,
}

impl Default for SizeContract {
    fn default() -> Self {
        Self {
            min: Vec2::zeros(),
            preferred: Vec2::zeros(),
            flexible: Vec2::zeros(),
        }
    }
}

/// One axis of a [`SizeContract`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisContract {
    /// Smallest acceptable size
    pub min: f32,
    /// Requested size
    pub preferred: f32,
    /// Flexible weight
    pub flexible: f32,
}

impl SizeContract {
    /// Contract of a node that reports `preferred` and can shrink to zero
    pub fn preferred_only(preferred: Vec2) -> Self {
        Self {
            preferred,
            ..Self::default()
        }
    }

    /// Project the contract onto one axis
    pub fn axis(&self, axis: Axis) -> AxisContract {
        let i = axis.index();
        AxisContract {
            min: self.min[i],
            preferred: self.preferred[i],
            flexible: self.flexible[i],
        }
    }

    /// Raise min and preferred to at least `floor`'s and take its flexible weights
    pub fn floored_by(self, floor: &LayoutElement) -> Self {
        let floor = floor.contract();
        let min = self.min.sup(&floor.min);
        Self {
            min,
            preferred: self.preferred.sup(&floor.preferred).sup(&min),
            flexible: floor.flexible,
        }
    }
}
