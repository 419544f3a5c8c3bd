//! Element tree storage
//!
//! Nodes live in a slot map keyed by [`NodeId`]; the tree owns every node and
//! parents refer to children by id. World rectangles are cached per node and
//! recomputed lazily after a placement in the ancestor chain changes.

use slotmap::SlotMap;

use super::error::{UiError, UiResult};
use super::node::{ElementNode, NodeFlags, RenderPayload};
use super::placement::Placement;
use super::NodeId;
use crate::foundation::math::{Rect, Vec2};

/// Entry of the render order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawEntry {
    /// Node to draw
    pub id: NodeId,
    /// Effective z-order
    pub depth: i32,
    /// Node is a hit-test candidate
    pub accepts_input: bool,
}

/// Retained element hierarchy with a single root
pub struct ElementTree {
    nodes: SlotMap<NodeId, ElementNode>,
    root: NodeId,
    viewport: Vec2,
}

impl ElementTree {
    /// Create a tree whose root fills a viewport of the given size
    pub fn new(viewport: Vec2) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert_with_key(|id| {
            let mut node = ElementNode::container().with_name("root");
            node.id = id;
            node
        });
        Self { nodes, root, viewport }
    }

    /// Root node id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Size the root is allocated
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Change the viewport; returns true if it differs from the previous one
    pub fn set_viewport(&mut self, viewport: Vec2) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        self.invalidate_world(self.root);
        true
    }

    /// Whether `id` refers to a registered node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of registered nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is never removed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id
    pub fn get(&self, id: NodeId) -> Option<&ElementNode> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        self.nodes.get_mut(id)
    }

    /// Children of `id`, empty for unknown nodes
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// First node with the given debug name, in pre-order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.preorder(self.root)
            .into_iter()
            .find(|id| self.nodes.get(*id).and_then(ElementNode::name) == Some(name))
    }

    /// Insert `node` as the last child of `parent` (the root when `None`)
    pub fn insert(&mut self, mut node: ElementNode, parent: Option<NodeId>) -> UiResult<NodeId> {
        let parent = parent.unwrap_or(self.root);
        if !self.nodes.contains_key(parent) {
            return Err(UiError::InvalidParent(parent));
        }

        node.parent = Some(parent);
        node.children.clear();
        node.world.set(None);
        node.layout_dirty = true;
        node.render_dirty = true;
        node.measured = None;
        node.allocated = None;

        let id = self.nodes.insert_with_key(|id| {
            node.id = id;
            node
        });
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        self.mark_layout_dirty(parent);
        Ok(id)
    }

    /// Remove `id` and its subtree, returning the removed ids in pre-order
    ///
    /// Removing the root removes its children and keeps the root itself.
    /// Unknown ids remove nothing.
    pub fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }

        if id == self.root {
            let children = std::mem::take(&mut self.nodes[id].children);
            let mut removed = Vec::new();
            for child in children {
                let subtree = self.preorder(child);
                for node in &subtree {
                    self.nodes.remove(*node);
                }
                removed.extend(subtree);
            }
            self.mark_layout_dirty(id);
            return removed;
        }

        let removed = self.preorder(id);
        if let Some(parent) = self.nodes[id].parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|child| *child != id);
            }
            self.mark_layout_dirty(parent);
        }
        for node in &removed {
            self.nodes.remove(*node);
        }
        removed
    }

    /// Pre-order ids of the subtree rooted at `start`
    pub fn preorder(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.nodes.contains_key(start) {
            return order;
        }

        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    /// Visible nodes in draw order: pre-order, then stable-sorted by depth
    ///
    /// Invisible nodes drop out together with their subtree. A node without
    /// a depth override inherits its parent's depth.
    pub fn render_order(&self) -> Vec<DrawEntry> {
        let mut entries = Vec::new();
        self.walk_visible(|entry| entries.push(entry));
        entries.sort_by_key(|entry| entry.depth);
        entries
    }

    /// Topmost hit-test candidate containing `point`
    ///
    /// Same answer as scanning [`Self::render_order`] back to front, found in
    /// one pre-order walk: the deepest candidate wins and later siblings win
    /// ties.
    pub fn hit_test(&self, point: Vec2) -> Option<NodeId> {
        let mut best: Option<DrawEntry> = None;
        self.walk_visible(|entry| {
            if !entry.accepts_input || best.is_some_and(|best| best.depth > entry.depth) {
                return;
            }
            if self.world_rect(entry.id).is_some_and(|rect| rect.contains_point(point)) {
                best = Some(entry);
            }
        });
        best.map(|entry| entry.id)
    }

    fn walk_visible(&self, mut visit: impl FnMut(DrawEntry)) {
        let mut stack = vec![(self.root, 0, false)];

        while let Some((id, parent_depth, parent_ignores_input)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else { continue };
            if !node.is_visible() {
                continue;
            }

            let depth = node.placement.depth_override.unwrap_or(parent_depth);
            let ignores_input = parent_ignores_input || node.flags.contains(NodeFlags::IGNORE_INPUT);
            visit(DrawEntry {
                id,
                depth,
                accepts_input: node.is_interactive() && !ignores_input,
            });

            for child in node.children.iter().rev() {
                stack.push((*child, depth, ignores_input));
            }
        }
    }

    /// World-space rectangle of `id`, recomputed if the cache is stale
    pub fn world_rect(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        if let Some(rect) = node.world.get() {
            return Some(rect);
        }

        let rect = match node.parent {
            Some(parent) => {
                let parent_rect = self.world_rect(parent)?;
                node.placement
                    .local_rect(parent_rect.size)
                    .translated(parent_rect.origin)
            }
            None => node.placement.local_rect(self.viewport),
        };
        node.world.set(Some(rect));
        Some(rect)
    }

    /// Drop cached world rectangles of the subtree and mark it for redraw
    pub fn invalidate_world(&mut self, id: NodeId) {
        for node_id in self.preorder(id) {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.world.set(None);
                node.render_dirty = true;
            }
        }
    }

    /// Mark `id` and its ancestors for re-layout
    ///
    /// Stops at the first ancestor that is already dirty, which keeps the
    /// invariant that every dirty node has dirty ancestors.
    pub fn mark_layout_dirty(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get_mut(node_id) else { break };
            node.measured = None;
            if node.layout_dirty && node_id != id {
                break;
            }
            node.layout_dirty = true;
            current = node.parent;
        }
    }

    /// Replace the placement of `id`
    pub fn set_placement(&mut self, id: NodeId, placement: Placement) -> UiResult<()> {
        let node = self.nodes.get_mut(id).ok_or(UiError::UnknownNode(id))?;
        if node.placement == placement {
            return Ok(());
        }
        node.placement = placement;
        self.invalidate_world(id);
        self.mark_layout_dirty(id);
        Ok(())
    }

    /// Mutate the placement of `id` in place
    pub fn update_placement<F>(&mut self, id: NodeId, update: F) -> UiResult<()>
    where
        F: FnOnce(&mut Placement),
    {
        let node = self.nodes.get_mut(id).ok_or(UiError::UnknownNode(id))?;
        let mut placement = node.placement.clone();
        update(&mut placement);
        self.set_placement(id, placement)
    }

    /// Pin a layout-managed child to `rect` without dirtying the layout chain
    pub(crate) fn set_layout_rect(&mut self, id: NodeId, rect: Rect) {
        let Some(node) = self.nodes.get_mut(id) else { return };
        let mut placement = node.placement.clone();
        placement.set_layout_rect(rect);
        if node.placement != placement {
            node.placement = placement;
            self.invalidate_world(id);
        }
    }

    /// Mutate the render payload of `id` and mark it for redraw
    ///
    /// A content change on a node without a size contract also re-measures
    /// it, since its preferred size is the content's native size.
    pub fn update_payload<F, R>(&mut self, id: NodeId, update: F) -> UiResult<R>
    where
        F: FnOnce(&mut RenderPayload) -> R,
    {
        let node = self.nodes.get_mut(id).ok_or(UiError::UnknownNode(id))?;
        let content = node.payload.content();
        let result = update(&mut node.payload);
        node.render_dirty = true;
        if node.layout_element.is_none() && node.payload.content() != content {
            self.mark_layout_dirty(id);
        }
        Ok(result)
    }

    /// Set or clear node flags
    pub fn set_flag(&mut self, id: NodeId, flag: NodeFlags, enabled: bool) -> UiResult<()> {
        let node = self.nodes.get_mut(id).ok_or(UiError::UnknownNode(id))?;
        if node.flags.contains(flag) == enabled {
            return Ok(());
        }
        node.flags.set(flag, enabled);
        if flag.contains(NodeFlags::VISIBLE) {
            self.invalidate_world(id);
        } else {
            node.render_dirty = true;
        }
        if flag.contains(NodeFlags::IGNORE_LAYOUT) {
            self.mark_layout_dirty(id);
        }
        Ok(())
    }

    /// Whether `id` and every ancestor are visible
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.nodes.get(node_id) {
                Some(node) if node.is_visible() => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(node_id).and_then(|node| node.parent);
        }
        false
    }

    pub(crate) fn clear_render_dirty(&mut self) {
        for node in self.nodes.values_mut() {
            node.render_dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::colors;
    use crate::ui::node::Interactive;

    fn tree() -> ElementTree {
        ElementTree::new(Vec2::new(800.0, 600.0))
    }

    fn panel(x: f32, y: f32, w: f32, h: f32) -> ElementNode {
        ElementNode::new(RenderPayload::panel(colors::white()))
            .with_placement(Placement::absolute(x, y, w, h))
    }

    #[test]
    fn test_insert_under_unknown_parent_fails() {
        let mut tree = tree();
        let child = tree.insert(panel(0.0, 0.0, 10.0, 10.0), None).unwrap();
        tree.remove_subtree(child);

        let result = tree.insert(panel(0.0, 0.0, 10.0, 10.0), Some(child));
        assert_eq!(result, Err(UiError::InvalidParent(child)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_world_rect_composes_with_parent() {
        let mut tree = tree();
        let parent = tree.insert(panel(100.0, 50.0, 200.0, 200.0), None).unwrap();
        let child = tree.insert(panel(10.0, 20.0, 30.0, 40.0), Some(parent)).unwrap();

        assert_eq!(tree.world_rect(child), Some(Rect::new(110.0, 70.0, 30.0, 40.0)));

        tree.update_placement(parent, |p| p.anchored_position = Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(tree.world_rect(child), Some(Rect::new(10.0, 20.0, 30.0, 40.0)));
    }

    #[test]
    fn test_remove_subtree_is_idempotent() {
        let mut tree = tree();
        let parent = tree.insert(panel(0.0, 0.0, 100.0, 100.0), None).unwrap();
        let child = tree.insert(panel(0.0, 0.0, 10.0, 10.0), Some(parent)).unwrap();

        assert_eq!(tree.remove_subtree(parent), vec![parent, child]);
        assert!(tree.remove_subtree(parent).is_empty());
        assert_eq!(tree.len(), 1);
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn test_removing_root_keeps_root() {
        let mut tree = tree();
        tree.insert(panel(0.0, 0.0, 10.0, 10.0), None).unwrap();
        tree.insert(panel(0.0, 0.0, 10.0, 10.0), None).unwrap();

        let root = tree.root();
        assert_eq!(tree.remove_subtree(root).len(), 2);
        assert!(tree.contains(root));
    }

    #[test]
    fn test_render_order_respects_depth_override() {
        let mut tree = tree();
        let front = tree
            .insert(panel(0.0, 0.0, 10.0, 10.0).with_placement(Placement::absolute(0.0, 0.0, 10.0, 10.0).with_depth(5)), None)
            .unwrap();
        let front_child = tree.insert(panel(0.0, 0.0, 5.0, 5.0), Some(front)).unwrap();
        let back = tree.insert(panel(0.0, 0.0, 10.0, 10.0), None).unwrap();

        let order: Vec<NodeId> = tree.render_order().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![tree.root(), back, front, front_child]);
    }

    #[test]
    fn test_hit_test_matches_render_order() {
        let mut tree = tree();
        let button = || panel(0.0, 0.0, 100.0, 100.0).with_interactive(Interactive::default());
        let raised = Placement::absolute(0.0, 0.0, 100.0, 100.0).with_depth(3);
        let front = tree.insert(button().with_placement(raised), None).unwrap();
        let overlay = tree.insert(button(), None).unwrap();
        let later = tree.insert(button(), None).unwrap();
        tree.insert(button().ignore_input(), None).unwrap();

        let point = Vec2::new(50.0, 50.0);
        let expected = tree
            .render_order()
            .iter()
            .rev()
            .filter(|entry| entry.accepts_input)
            .find(|entry| tree.world_rect(entry.id).is_some_and(|rect| rect.contains_point(point)))
            .map(|entry| entry.id);

        assert_eq!(tree.hit_test(point), Some(front));
        assert_eq!(tree.hit_test(point), expected);

        tree.set_flag(front, NodeFlags::VISIBLE, false).unwrap();
        assert_eq!(tree.hit_test(point), Some(later));
        tree.set_flag(later, NodeFlags::INTERACTIVE, false).unwrap();
        assert_eq!(tree.hit_test(point), Some(overlay));
    }

    #[test]
    fn test_hidden_subtree_is_skipped() {
        let mut tree = tree();
        let parent = tree.insert(panel(0.0, 0.0, 100.0, 100.0).hidden(), None).unwrap();
        tree.insert(panel(0.0, 0.0, 10.0, 10.0), Some(parent)).unwrap();

        assert_eq!(tree.render_order().len(), 1);
    }

    #[test]
    fn test_layout_dirty_stops_at_dirty_ancestor() {
        let mut tree = tree();
        let a = tree.insert(ElementNode::container(), None).unwrap();
        let b = tree.insert(ElementNode::container(), Some(a)).unwrap();
        for id in tree.preorder(tree.root()) {
            tree.get_mut(id).unwrap().layout_dirty = false;
        }

        tree.mark_layout_dirty(b);
        assert!(tree.get(b).unwrap().is_layout_dirty());
        assert!(tree.get(a).unwrap().is_layout_dirty());
        assert!(tree.get(tree.root()).unwrap().is_layout_dirty());
    }
}
