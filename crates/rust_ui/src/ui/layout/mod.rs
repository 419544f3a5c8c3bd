//! Layout pass
//!
//! Two-phase negotiation over the dirty part of the tree:
//! - measure (bottom-up): leaves report their size contract, groups
//!   aggregate their children's contracts
//! - arrange (top-down): every node receives its allocated size and groups
//!   distribute it among their children
//!
//! Only subtrees that are layout-dirty or whose allocated size changed are
//! visited. Measured contracts are cached on each node until it is marked
//! dirty again.

mod element;
mod group;
pub mod solver;

pub use element::{AxisContract, LayoutElement, SizeContract};
pub use group::{GridConstraint, GridLayout, LayoutGroup, LayoutKind, Padding};

use log::debug;

use super::backend::ContentProvider;
use super::node::NodeFlags;
use super::tree::ElementTree;
use super::NodeId;
use crate::foundation::math::Vec2;

/// Counters for one layout pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Nodes whose children were (re)arranged
    pub arranged: usize,
    /// Groups whose children did not fit at minimum size
    pub overflowed: usize,
}

/// Inputs shared by every node of a pass
pub struct LayoutContext<'a> {
    /// Native content sizes for payloads without a layout element
    pub content: Option<&'a dyn ContentProvider>,
    /// Log groups that overflow
    pub overflow_diagnostics: bool,
}

/// Bring the tree's placements up to date
pub fn run(tree: &mut ElementTree, ctx: &LayoutContext<'_>) -> LayoutStats {
    let mut stats = LayoutStats::default();
    let root = tree.root();
    let Some(root_node) = tree.get(root) else { return stats };

    let allocated = root_node.placement().local_rect(tree.viewport()).size;
    if root_node.is_layout_dirty() || root_node.allocated_size() != Some(allocated) {
        arrange(tree, root, allocated, ctx, &mut stats);
    }
    stats
}

/// Measured size contract of `id`, cached until the node is marked dirty
pub fn measure(tree: &mut ElementTree, id: NodeId, ctx: &LayoutContext<'_>) -> SizeContract {
    let Some(node) = tree.get(id) else { return SizeContract::default() };
    if let Some(contract) = node.measured {
        return contract;
    }

    let element = node.layout_element().cloned();
    let contract = if let Some(group) = node.layout_group().cloned() {
        let children = layout_children(tree, id);
        let measured: Vec<SizeContract> = children
            .iter()
            .map(|child| measure(tree, *child, ctx))
            .collect();
        let aggregate = solver::measure_group(&group, &measured);
        match &element {
            Some(element) => aggregate.floored_by(element),
            None => aggregate,
        }
    } else if let Some(element) = &element {
        element.contract()
    } else {
        node.payload()
            .content()
            .zip(ctx.content)
            .and_then(|(handle, provider)| provider.content_size(handle))
            .map(SizeContract::preferred_only)
            .unwrap_or_default()
    };

    if let Some(node) = tree.get_mut(id) {
        node.measured = Some(contract);
    }
    contract
}

fn layout_children(tree: &ElementTree, id: NodeId) -> Vec<NodeId> {
    tree.children(id)
        .iter()
        .copied()
        .filter(|child| {
            tree.get(*child)
                .is_some_and(|node| !node.flags().contains(NodeFlags::IGNORE_LAYOUT))
        })
        .collect()
}

fn arrange(tree: &mut ElementTree, id: NodeId, size: Vec2, ctx: &LayoutContext<'_>, stats: &mut LayoutStats) {
    let Some(node) = tree.get(id) else { return };
    let group = node.layout_group().cloned();
    stats.arranged += 1;

    if let Some(group) = group {
        let children = layout_children(tree, id);
        let contracts: Vec<SizeContract> = children
            .iter()
            .map(|child| measure(tree, *child, ctx))
            .collect();
        let arrangement = solver::arrange_group(&group, size, &contracts);

        if arrangement.overflowed {
            stats.overflowed += 1;
            if ctx.overflow_diagnostics {
                let name = tree.get(id).and_then(|node| node.name()).unwrap_or("<unnamed>");
                debug!("Layout group '{}' ({:?}) overflows its {}x{} allocation", name, id, size.x, size.y);
            }
        }
        for (child, rect) in children.iter().zip(arrangement.rects) {
            tree.set_layout_rect(*child, rect);
        }
    }

    let children = match tree.get_mut(id) {
        Some(node) => {
            node.allocated = Some(size);
            node.layout_dirty = false;
            node.children.clone()
        }
        None => return,
    };

    for child in children {
        let Some(child_node) = tree.get(child) else { continue };
        let child_size = child_node.placement().local_rect(size).size;
        if child_node.is_layout_dirty() || child_node.allocated_size() != Some(child_size) {
            arrange(tree, child, child_size, ctx, stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rect;
    use crate::ui::node::{ContentHandle, ElementNode, RenderPayload};
    use crate::ui::placement::Placement;
    use approx::assert_relative_eq;

    const NO_CONTENT: LayoutContext<'static> = LayoutContext {
        content: None,
        overflow_diagnostics: false,
    };

    fn leaf(preferred: f32, flexible: f32) -> ElementNode {
        ElementNode::container().with_layout_element(
            LayoutElement::default()
                .with_preferred(preferred, 20.0)
                .with_flexible(flexible, 0.0),
        )
    }

    #[test]
    fn test_group_fills_viewport() {
        let mut tree = ElementTree::new(Vec2::new(800.0, 600.0));
        let row = tree
            .insert(ElementNode::container().with_layout_group(LayoutGroup::horizontal()), None)
            .unwrap();
        let a = tree.insert(leaf(100.0, 1.0), Some(row)).unwrap();
        let b = tree.insert(leaf(300.0, 0.0), Some(row)).unwrap();

        let stats = run(&mut tree, &NO_CONTENT);

        assert_eq!(stats.overflowed, 0);
        assert_relative_eq!(tree.world_rect(a).unwrap().width(), 500.0);
        assert_eq!(tree.world_rect(b), Some(Rect::new(500.0, 0.0, 300.0, 600.0)));
    }

    #[test]
    fn test_clean_tree_is_not_rearranged() {
        let mut tree = ElementTree::new(Vec2::new(800.0, 600.0));
        let row = tree
            .insert(ElementNode::container().with_layout_group(LayoutGroup::horizontal()), None)
            .unwrap();
        tree.insert(leaf(100.0, 1.0), Some(row)).unwrap();

        assert!(run(&mut tree, &NO_CONTENT).arranged > 0);
        assert_eq!(run(&mut tree, &NO_CONTENT).arranged, 0);

        tree.set_viewport(Vec2::new(400.0, 300.0));
        assert!(run(&mut tree, &NO_CONTENT).arranged > 0);
    }

    #[test]
    fn test_ignored_child_keeps_its_placement() {
        let mut tree = ElementTree::new(Vec2::new(800.0, 600.0));
        let row = tree
            .insert(ElementNode::container().with_layout_group(LayoutGroup::horizontal()), None)
            .unwrap();
        let free = tree
            .insert(
                ElementNode::container()
                    .with_placement(Placement::absolute(5.0, 5.0, 10.0, 10.0))
                    .ignore_layout(),
                Some(row),
            )
            .unwrap();
        let managed = tree.insert(leaf(100.0, 0.0), Some(row)).unwrap();

        run(&mut tree, &NO_CONTENT);

        assert_eq!(tree.world_rect(free), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert_eq!(tree.world_rect(managed), Some(Rect::new(0.0, 0.0, 100.0, 600.0)));
    }

    #[test]
    fn test_nested_group_measures_children() {
        let mut tree = ElementTree::new(Vec2::new(800.0, 600.0));
        let column = tree
            .insert(
                ElementNode::container()
                    .with_layout_group(LayoutGroup::vertical().with_stretch_cross_axis(false)),
                None,
            )
            .unwrap();
        let row = tree
            .insert(
                ElementNode::container()
                    .with_layout_group(LayoutGroup::horizontal().with_spacing(10.0)),
                Some(column),
            )
            .unwrap();
        tree.insert(leaf(100.0, 0.0), Some(row)).unwrap();
        tree.insert(leaf(50.0, 0.0), Some(row)).unwrap();

        run(&mut tree, &NO_CONTENT);

        assert_eq!(tree.world_rect(row), Some(Rect::new(0.0, 0.0, 160.0, 20.0)));
    }

    struct FixedContent;

    impl ContentProvider for FixedContent {
        fn content_size(&self, _handle: ContentHandle) -> Option<Vec2> {
            Some(Vec2::new(64.0, 32.0))
        }
    }

    #[test]
    fn test_content_size_is_preferred_size() {
        let mut tree = ElementTree::new(Vec2::new(800.0, 600.0));
        let column = tree
            .insert(
                ElementNode::container()
                    .with_layout_group(LayoutGroup::vertical().with_stretch_cross_axis(false)),
                None,
            )
            .unwrap();
        let image = tree
            .insert(ElementNode::new(RenderPayload::image(ContentHandle(1))), Some(column))
            .unwrap();

        let provider = FixedContent;
        let ctx = LayoutContext { content: Some(&provider), overflow_diagnostics: true };
        run(&mut tree, &ctx);

        assert_eq!(tree.world_rect(image), Some(Rect::new(0.0, 0.0, 64.0, 32.0)));
    }
}
