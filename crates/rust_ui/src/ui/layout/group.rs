//! Layout group descriptors

use crate::foundation::math::{Axis, Rect, Vec2};
use crate::ui::placement::Anchor;

/// Inner spacing between a group's edge and its children
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    /// Left inset
    pub left: f32,
    /// Right inset
    pub right: f32,
    /// Top inset
    pub top: f32,
    /// Bottom inset
    pub bottom: f32,
}

impl Padding {
    /// Same inset on all four edges
    pub fn uniform(value: f32) -> Self {
        Self { left: value, right: value, top: value, bottom: value }
    }

    /// Horizontal and vertical insets
    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self { left: horizontal, right: horizontal, top: vertical, bottom: vertical }
    }

    /// Total inset along `axis`
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.left + self.right,
            Axis::Vertical => self.top + self.bottom,
        }
    }

    /// Leading inset along `axis`
    pub fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Both totals as a vector
    pub fn total(&self) -> Vec2 {
        Vec2::new(self.along(Axis::Horizontal), self.along(Axis::Vertical))
    }

    /// Area left inside `size` once the padding is removed
    pub fn inner_rect(&self, size: Vec2) -> Rect {
        let inner = size - self.total();
        Rect::new(self.left, self.top, inner.x.max(0.0), inner.y.max(0.0))
    }
}

/// How a grid picks its column and row count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridConstraint {
    /// As many columns as fit the allocated width
    #[default]
    Flexible,
    /// Fixed number of columns, rows grow with the child count
    FixedColumns(usize),
    /// Fixed number of rows, columns grow with the child count
    FixedRows(usize),
}

/// Grid arrangement parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Size of every cell
    pub cell_size: Vec2,
    /// Gap between cells (x between columns, y between rows)
    pub spacing: Vec2,
    /// Column/row count policy
    pub constraint: GridConstraint,
}

impl GridLayout {
    /// Column and row count for `count` children in a grid `inner_width` wide
    pub fn dimensions(&self, count: usize, inner_width: Option<f32>) -> (usize, usize) {
        if count == 0 {
            return (0, 0);
        }
        let columns = match self.constraint {
            GridConstraint::FixedColumns(columns) => columns.max(1),
            GridConstraint::FixedRows(rows) => count.div_ceil(rows.max(1)),
            GridConstraint::Flexible => match inner_width {
                Some(width) => {
                    let stride = self.cell_size.x + self.spacing.x;
                    if stride <= 0.0 {
                        count
                    } else {
                        (((width + self.spacing.x) / stride).floor() as usize).max(1)
                    }
                }
                None => (count as f32).sqrt().ceil() as usize,
            },
        };
        let columns = columns.min(count).max(1);
        (columns, count.div_ceil(columns))
    }

    /// Size of a block of `columns` x `rows` cells
    pub fn block_size(&self, columns: usize, rows: usize) -> Vec2 {
        let extent = |cells: usize, cell: f32, gap: f32| {
            if cells == 0 {
                0.0
            } else {
                cells as f32 * cell + (cells - 1) as f32 * gap
            }
        };
        Vec2::new(
            extent(columns, self.cell_size.x, self.spacing.x),
            extent(rows, self.cell_size.y, self.spacing.y),
        )
    }
}

/// Arrangement strategy
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutKind {
    /// Children side by side, left to right
    Horizontal,
    /// Children stacked, top to bottom
    Vertical,
    /// Children in equally sized cells, row by row
    Grid(GridLayout),
}

/// Arranges a node's children from their size contracts
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGroup {
    /// Arrangement strategy
    pub kind: LayoutKind,
    /// Inset from the group's edges
    pub padding: Padding,
    /// Gap between consecutive children of a sequential layout
    pub spacing: f32,
    /// Where children (or unused space) settle inside the group
    pub child_alignment: Anchor,
    /// Stretch children across the cross axis to the inner size
    pub stretch_cross_axis: bool,
    /// Split slack evenly when no child is flexible
    pub force_expand: bool,
}

impl LayoutGroup {
    fn with_kind(kind: LayoutKind) -> Self {
        Self {
            kind,
            padding: Padding::default(),
            spacing: 0.0,
            child_alignment: Anchor::TopLeft,
            stretch_cross_axis: true,
            force_expand: false,
        }
    }

    /// Left-to-right row
    pub fn horizontal() -> Self {
        Self::with_kind(LayoutKind::Horizontal)
    }

    /// Top-to-bottom column
    pub fn vertical() -> Self {
        Self::with_kind(LayoutKind::Vertical)
    }

    /// Grid of fixed-size cells
    pub fn grid(cell_size: Vec2) -> Self {
        Self::with_kind(LayoutKind::Grid(GridLayout {
            cell_size,
            spacing: Vec2::zeros(),
            constraint: GridConstraint::Flexible,
        }))
    }

    /// Builder pattern: padding
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Builder pattern: spacing (applies to both grid axes)
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        if let LayoutKind::Grid(grid) = &mut self.kind {
            grid.spacing = Vec2::new(spacing, spacing);
        }
        self
    }

    /// Builder pattern: child alignment
    pub fn with_child_alignment(mut self, alignment: Anchor) -> Self {
        self.child_alignment = alignment;
        self
    }

    /// Builder pattern: cross-axis stretching
    pub fn with_stretch_cross_axis(mut self, stretch: bool) -> Self {
        self.stretch_cross_axis = stretch;
        self
    }

    /// Builder pattern: even slack split for rigid children
    pub fn with_force_expand(mut self, expand: bool) -> Self {
        self.force_expand = expand;
        self
    }

    /// Builder pattern: grid column/row policy (no effect on sequential layouts)
    pub fn with_grid_constraint(mut self, constraint: GridConstraint) -> Self {
        if let LayoutKind::Grid(grid) = &mut self.kind {
            grid.constraint = constraint;
        }
        self
    }

    /// Primary axis of a sequential layout, `None` for grids
    pub fn primary_axis(&self) -> Option<Axis> {
        match self.kind {
            LayoutKind::Horizontal => Some(Axis::Horizontal),
            LayoutKind::Vertical => Some(Axis::Vertical),
            LayoutKind::Grid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_inner_rect() {
        let padding = Padding { left: 10.0, right: 5.0, top: 2.0, bottom: 8.0 };
        assert_eq!(padding.inner_rect(Vec2::new(100.0, 50.0)), Rect::new(10.0, 2.0, 85.0, 40.0));
        assert_eq!(padding.along(Axis::Vertical), 10.0);
    }

    #[test]
    fn test_grid_dimensions() {
        let grid = LayoutGroup::grid(Vec2::new(50.0, 50.0)).with_spacing(10.0);
        let LayoutKind::Grid(grid) = grid.kind else { panic!("expected grid") };

        // 170 px fits three 50 px cells with 10 px gaps
        assert_eq!(grid.dimensions(7, Some(170.0)), (3, 3));
        assert_eq!(grid.dimensions(2, Some(170.0)), (2, 1));
        assert_eq!(grid.dimensions(5, None), (3, 2));
        assert_eq!(grid.block_size(3, 2), Vec2::new(170.0, 110.0));

        let fixed_rows = GridLayout { constraint: GridConstraint::FixedRows(2), ..grid };
        assert_eq!(fixed_rows.dimensions(5, Some(1000.0)), (3, 2));
    }
}
