//! Immediate-mode declaration frames
//!
//! The host re-declares its UI every frame under stable string keys. Nodes
//! declared again keep their identity, interaction state and cached layout;
//! nodes not declared by the end of the frame are unregistered.

use std::collections::HashSet;

use log::debug;

use super::backend::RenderBackend;
use super::dispatcher::Dispatcher;
use super::error::{UiError, UiResult};
use super::node::{ElementNode, NodeFlags};
use super::NodeId;

impl<B: RenderBackend> Dispatcher<B> {
    /// Start declaring this frame's immediate-mode nodes
    ///
    /// Call `finish` (or drop the frame) before `tick`.
    pub fn begin_frame(&mut self) -> ImmediateFrame<'_, B> {
        ImmediateFrame {
            dispatcher: self,
            seen: HashSet::new(),
            finished: false,
        }
    }
}

/// One frame of immediate-mode declarations
pub struct ImmediateFrame<'d, B: RenderBackend> {
    dispatcher: &'d mut Dispatcher<B>,
    seen: HashSet<String>,
    finished: bool,
}

impl<B: RenderBackend> ImmediateFrame<'_, B> {
    /// Declare the node keyed `key` under `parent` (the root when `None`)
    ///
    /// Declaring a key again in the same frame updates the same node.
    pub fn declare(&mut self, key: &str, parent: Option<NodeId>, node: ElementNode) -> UiResult<NodeId> {
        let parent = parent.unwrap_or_else(|| self.dispatcher.root());
        if !self.dispatcher.contains(parent) {
            return Err(UiError::InvalidParent(parent));
        }
        if let Some(element) = node.layout_element() {
            element.validate()?;
        }

        let existing = self
            .dispatcher
            .immediate_keys
            .get(key)
            .copied()
            .filter(|id| self.dispatcher.contains(*id));

        let id = match existing {
            Some(id) if self.dispatcher.parent(id) == Some(parent) => {
                self.refresh(id, node)?;
                id
            }
            previous => {
                if let Some(previous) = previous {
                    self.dispatcher.unregister(previous);
                }
                let id = self.dispatcher.register(node, Some(parent))?;
                self.dispatcher.immediate_keys.insert(key.to_owned(), id);
                id
            }
        };

        self.seen.insert(key.to_owned());
        Ok(id)
    }

    /// Node previously declared under `key`
    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.dispatcher.immediate_keys.get(key).copied()
    }

    /// Read access to the dispatcher
    pub fn dispatcher(&self) -> &Dispatcher<B> {
        self.dispatcher
    }

    /// End the frame, unregistering every key not declared; returns the number of keys swept
    pub fn finish(mut self) -> usize {
        self.finished = true;
        self.sweep()
    }

    fn refresh(&mut self, id: NodeId, declared: ElementNode) -> UiResult<()> {
        let visible = declared.is_visible();
        let enabled = declared.interactive().map(|interactive| interactive.enabled);

        let tree = self.dispatcher.tree_mut();
        let node = tree.get_mut(id).ok_or(UiError::UnknownNode(id))?;
        let was_visible = node.is_visible();
        let was_enabled = node.interactive().map(|interactive| interactive.enabled);

        let outcome = node.refresh_from(declared);

        // Visibility and enablement go through the dispatcher so hover, press
        // and focus are withdrawn consistently.
        node.flags.set(NodeFlags::VISIBLE, was_visible);
        if let (Some(interactive), Some(was_enabled)) = (node.interactive.as_mut(), was_enabled) {
            interactive.enabled = was_enabled;
        }
        if outcome.layout_changed {
            tree.mark_layout_dirty(id);
            tree.invalidate_world(id);
        } else if outcome.render_changed {
            tree.invalidate_world(id);
        }

        self.dispatcher.set_visible(id, visible)?;
        if let Some(enabled) = enabled {
            self.dispatcher.set_enabled(id, enabled)?;
        }
        Ok(())
    }

    fn sweep(&mut self) -> usize {
        let stale: Vec<(String, NodeId)> = self
            .dispatcher
            .immediate_keys
            .iter()
            .filter(|(key, _)| !self.seen.contains(*key))
            .map(|(key, id)| (key.clone(), *id))
            .collect();

        for (key, id) in &stale {
            self.dispatcher.immediate_keys.remove(key);
            self.dispatcher.unregister(*id);
        }
        if !stale.is_empty() {
            debug!("Swept {} undeclared immediate nodes", stale.len());
        }
        self.seen.clear();
        stale.len()
    }
}

impl<B: RenderBackend> Drop for ImmediateFrame<'_, B> {
    fn drop(&mut self) {
        if !self.finished {
            self.sweep();
        }
    }
}
