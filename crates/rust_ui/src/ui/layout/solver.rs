//! Size distribution and child arrangement
//!
//! Pure functions over size contracts; the tree walk lives in the parent
//! module.

use super::element::{AxisContract, SizeContract};
use super::group::{GridConstraint, LayoutGroup, LayoutKind};
use crate::foundation::math::{Axis, Rect, Vec2};

/// Result of arranging one group
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    /// Parent-local rectangle per child, in input order
    pub rects: Vec<Rect>,
    /// Children did not fit even at their minimum sizes
    pub overflowed: bool,
}

/// Split `available` along one axis
///
/// Children start at their preferred size. Missing space is taken from each
/// child in proportion to `preferred - min`; spare space goes to children in
/// proportion to their flexible weight (or evenly with `force_expand`). When
/// even the minimum sizes do not fit, every child gets exactly its min and
/// the second value is true.
pub fn distribute(available: f32, items: &[AxisContract], force_expand: bool) -> (Vec<f32>, bool) {
    let total_min: f32 = items.iter().map(|item| item.min).sum();
    let total_preferred: f32 = items.iter().map(|item| item.preferred).sum();

    if available >= total_preferred {
        let slack = available - total_preferred;
        let total_flexible: f32 = items.iter().map(|item| item.flexible).sum();
        let sizes = if total_flexible > 0.0 {
            items
                .iter()
                .map(|item| item.preferred + slack * item.flexible / total_flexible)
                .collect()
        } else if force_expand && !items.is_empty() {
            let share = slack / items.len() as f32;
            items.iter().map(|item| item.preferred + share).collect()
        } else {
            items.iter().map(|item| item.preferred).collect()
        };
        return (sizes, false);
    }

    if available >= total_min {
        let deficit = total_preferred - available;
        let shrinkable = total_preferred - total_min;
        let sizes = items
            .iter()
            .map(|item| item.preferred - deficit * (item.preferred - item.min) / shrinkable)
            .collect();
        return (sizes, false);
    }

    (items.iter().map(|item| item.min).collect(), true)
}

/// Aggregate children's contracts into the group's own contract
pub fn measure_group(group: &LayoutGroup, children: &[SizeContract]) -> SizeContract {
    let padding = group.padding.total();

    if let LayoutKind::Grid(grid) = &group.kind {
        let (columns, rows) = grid.dimensions(children.len(), None);
        let preferred = grid.block_size(columns, rows) + padding;
        let min = match grid.constraint {
            GridConstraint::Flexible => Vec2::new(grid.block_size(columns.min(1), 0).x + padding.x, preferred.y),
            GridConstraint::FixedColumns(_) | GridConstraint::FixedRows(_) => preferred,
        };
        return SizeContract {
            min,
            preferred,
            flexible: Vec2::zeros(),
        };
    }

    let Some(primary) = group.primary_axis() else {
        return SizeContract::default();
    };
    let cross = primary.cross();
    let gaps = group.spacing * children.len().saturating_sub(1) as f32;

    let mut contract = SizeContract::default();
    for child in children {
        let along = child.axis(primary);
        contract.min[primary.index()] += along.min;
        contract.preferred[primary.index()] += along.preferred;
        contract.flexible[primary.index()] += along.flexible;

        let across = child.axis(cross);
        contract.min[cross.index()] = contract.min[cross.index()].max(across.min);
        contract.preferred[cross.index()] = contract.preferred[cross.index()].max(across.preferred);
        contract.flexible[cross.index()] = contract.flexible[cross.index()].max(across.flexible);
    }
    contract.min[primary.index()] += gaps;
    contract.preferred[primary.index()] += gaps;
    contract.min += padding;
    contract.preferred += padding;
    contract
}

/// Place children inside a group allocated `size`
pub fn arrange_group(group: &LayoutGroup, size: Vec2, children: &[SizeContract]) -> Arrangement {
    match &group.kind {
        LayoutKind::Grid(_) => arrange_grid(group, size, children.len()),
        LayoutKind::Horizontal => arrange_sequential(group, Axis::Horizontal, size, children),
        LayoutKind::Vertical => arrange_sequential(group, Axis::Vertical, size, children),
    }
}

fn arrange_sequential(group: &LayoutGroup, primary: Axis, size: Vec2, children: &[SizeContract]) -> Arrangement {
    let cross = primary.cross();
    let (p, c) = (primary.index(), cross.index());
    let inner = group.padding.inner_rect(size);
    let alignment = group.child_alignment.to_normalized();

    let gaps = group.spacing * children.len().saturating_sub(1) as f32;
    let available = (inner.size[p] - gaps).max(0.0);
    let along: Vec<AxisContract> = children.iter().map(|child| child.axis(primary)).collect();
    let (sizes, overflowed) = distribute(available, &along, group.force_expand);

    let used: f32 = sizes.iter().sum::<f32>() + gaps;
    let mut cursor = inner.origin[p] + (inner.size[p] - used).max(0.0) * alignment[p];

    let mut rects = Vec::with_capacity(children.len());
    for (child, primary_size) in children.iter().zip(sizes) {
        let across = child.axis(cross);
        let cross_size = if group.stretch_cross_axis {
            inner.size[c].max(across.min)
        } else {
            across.preferred
        };
        let cross_offset = inner.origin[c] + (inner.size[c] - cross_size) * alignment[c];

        let mut origin = Vec2::zeros();
        let mut extent = Vec2::zeros();
        origin[p] = cursor;
        origin[c] = cross_offset;
        extent[p] = primary_size;
        extent[c] = cross_size;
        rects.push(Rect::from_origin_size(origin, extent));

        cursor += primary_size + group.spacing;
    }

    Arrangement { rects, overflowed }
}

fn arrange_grid(group: &LayoutGroup, size: Vec2, count: usize) -> Arrangement {
    let LayoutKind::Grid(grid) = &group.kind else {
        return Arrangement { rects: Vec::new(), overflowed: false };
    };
    let inner = group.padding.inner_rect(size);
    let (columns, rows) = grid.dimensions(count, Some(inner.width()));
    let block = grid.block_size(columns, rows);
    let alignment = group.child_alignment.to_normalized();

    let slack = inner.size - block;
    let start = inner.origin + Vec2::new(slack.x.max(0.0), slack.y.max(0.0)).component_mul(&alignment);
    let stride = grid.cell_size + grid.spacing;

    let rects = (0..count)
        .map(|i| {
            let cell = Vec2::new((i % columns) as f32, (i / columns) as f32);
            Rect::from_origin_size(start + cell.component_mul(&stride), grid.cell_size)
        })
        .collect();

    Arrangement {
        rects,
        overflowed: slack.x < 0.0 || slack.y < 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::Padding;
    use crate::ui::placement::Anchor;
    use approx::assert_relative_eq;

    fn axis(min: f32, preferred: f32, flexible: f32) -> AxisContract {
        AxisContract { min, preferred, flexible }
    }

    fn contract(min: f32, preferred: f32, flexible: f32) -> SizeContract {
        SizeContract {
            min: Vec2::new(min, 10.0),
            preferred: Vec2::new(preferred, 20.0),
            flexible: Vec2::new(flexible, 0.0),
        }
    }

    #[test]
    fn test_slack_goes_to_flexible_children() {
        let (sizes, overflow) = distribute(800.0, &[axis(0.0, 100.0, 1.0), axis(0.0, 300.0, 0.0)], false);
        assert!(!overflow);
        assert_relative_eq!(sizes[0], 500.0);
        assert_relative_eq!(sizes[1], 300.0);
    }

    #[test]
    fn test_slack_split_by_weight() {
        let (sizes, _) = distribute(400.0, &[axis(0.0, 100.0, 1.0), axis(0.0, 100.0, 3.0)], false);
        assert_relative_eq!(sizes[0], 150.0);
        assert_relative_eq!(sizes[1], 250.0);
    }

    #[test]
    fn test_rigid_children_keep_preferred_unless_forced() {
        let items = [axis(0.0, 100.0, 0.0), axis(0.0, 100.0, 0.0)];
        let (sizes, _) = distribute(300.0, &items, false);
        assert_eq!(sizes, vec![100.0, 100.0]);

        let (sizes, _) = distribute(300.0, &items, true);
        assert_eq!(sizes, vec![150.0, 150.0]);
    }

    #[test]
    fn test_shrink_proportional_to_shrinkable_range() {
        // total preferred 400, min 100, 300 available: 100 px deficit over a 300 px range
        let (sizes, overflow) = distribute(300.0, &[axis(50.0, 200.0, 0.0), axis(50.0, 200.0, 1.0)], false);
        assert!(!overflow);
        assert_relative_eq!(sizes[0], 150.0);
        assert_relative_eq!(sizes[1], 150.0);

        let (sizes, _) = distribute(250.0, &[axis(100.0, 100.0, 0.0), axis(0.0, 200.0, 0.0)], false);
        assert_relative_eq!(sizes[0], 100.0);
        assert_relative_eq!(sizes[1], 150.0);
        assert_relative_eq!(sizes.iter().sum::<f32>(), 250.0);
    }

    #[test]
    fn test_overflow_packs_at_min() {
        let (sizes, overflow) = distribute(50.0, &[axis(40.0, 60.0, 1.0), axis(30.0, 30.0, 0.0)], false);
        assert!(overflow);
        assert_eq!(sizes, vec![40.0, 30.0]);
    }

    #[test]
    fn test_measure_horizontal_group() {
        let group = LayoutGroup::horizontal()
            .with_spacing(10.0)
            .with_padding(Padding::uniform(5.0));
        let measured = measure_group(&group, &[contract(10.0, 100.0, 1.0), contract(20.0, 300.0, 0.0)]);

        assert_eq!(measured.min, Vec2::new(10.0 + 20.0 + 10.0 + 10.0, 20.0));
        assert_eq!(measured.preferred, Vec2::new(100.0 + 300.0 + 10.0 + 10.0, 30.0));
        assert_eq!(measured.flexible, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_arrange_vertical_with_padding_and_alignment() {
        let group = LayoutGroup::vertical()
            .with_padding(Padding::uniform(10.0))
            .with_spacing(5.0)
            .with_stretch_cross_axis(false)
            .with_child_alignment(Anchor::BottomCenter);
        let child = SizeContract {
            min: Vec2::zeros(),
            preferred: Vec2::new(40.0, 20.0),
            flexible: Vec2::zeros(),
        };

        let arrangement = arrange_group(&group, Vec2::new(100.0, 100.0), &[child, child]);

        // inner 80x80, used 45, slack 35 pushed to the bottom
        assert_eq!(arrangement.rects[0], Rect::new(30.0, 45.0, 40.0, 20.0));
        assert_eq!(arrangement.rects[1], Rect::new(30.0, 70.0, 40.0, 20.0));
        assert!(!arrangement.overflowed);
    }

    #[test]
    fn test_arrange_stretches_cross_axis() {
        let group = LayoutGroup::horizontal();
        let arrangement = arrange_group(&group, Vec2::new(800.0, 600.0), &[contract(0.0, 100.0, 1.0)]);
        assert_eq!(arrangement.rects[0], Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_arrange_grid_fixed_columns() {
        let group = LayoutGroup::grid(Vec2::new(20.0, 10.0))
            .with_spacing(2.0)
            .with_grid_constraint(GridConstraint::FixedColumns(2));
        let arrangement = arrange_group(&group, Vec2::new(100.0, 100.0), &[SizeContract::default(); 3]);

        assert_eq!(arrangement.rects[1], Rect::new(22.0, 0.0, 20.0, 10.0));
        assert_eq!(arrangement.rects[2], Rect::new(0.0, 12.0, 20.0, 10.0));

        let cramped = arrange_group(&group, Vec2::new(30.0, 100.0), &[SizeContract::default(); 3]);
        assert!(cramped.overflowed);
    }
}
