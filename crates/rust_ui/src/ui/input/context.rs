//! Handler context
//!
//! Node handlers receive an [`EventContext`] that lends them the dispatcher's
//! services for the duration of the call. Everything they change is visible
//! to the remaining phases of the same tick.

use crate::events::{Event, EventSystem};
use crate::ui::effect::{EffectKind, EffectParams, EffectSet};
use crate::ui::error::{UiError, UiResult};
use crate::ui::node::{NodeFlags, RenderPayload};
use crate::ui::placement::Placement;
use crate::ui::style::{InteractionState, StyleRegistry};
use crate::ui::tree::ElementTree;
use crate::ui::{EffectHandle, NodeId};

use super::router::InputRouter;

/// Services available to a node handler
pub struct EventContext<'a> {
    pub(crate) node: NodeId,
    pub(crate) tree: &'a mut ElementTree,
    pub(crate) router: &'a mut InputRouter,
    pub(crate) effects: &'a mut EffectSet,
    pub(crate) styles: &'a StyleRegistry,
    pub(crate) events: &'a mut EventSystem,
    pub(crate) restyled: &'a mut Vec<NodeId>,
}

impl EventContext<'_> {
    /// Node whose handler is running
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Read access to the tree
    pub fn tree(&self) -> &ElementTree {
        self.tree
    }

    /// Interaction state of the handled node
    pub fn state(&self) -> InteractionState {
        self.tree
            .get(self.node)
            .map_or(InteractionState::Normal, |node| node.interaction_state())
    }

    /// Take input capture for the handled node
    pub fn request_capture(&mut self) -> bool {
        self.router.request_capture(self.node, self.events)
    }

    /// Release input capture held by the handled node
    pub fn release_capture(&mut self) -> bool {
        self.router.release_capture(self.node, self.events)
    }

    /// Start a visual effect; it advances in this tick's effect phase
    pub fn trigger_effect(&mut self, target: NodeId, kind: EffectKind, params: EffectParams) -> UiResult<EffectHandle> {
        self.effects.trigger(self.tree, target, kind, params)
    }

    /// Stop a visual effect
    pub fn cancel_effect(&mut self, handle: EffectHandle) -> bool {
        self.effects.cancel(handle)
    }

    /// Apply a registered style to a node
    pub fn apply_style(&mut self, target: NodeId, name: &str, state: InteractionState) -> UiResult<()> {
        self.styles.apply(self.tree, target, name, state)
    }

    /// Mutate a node's render payload
    pub fn update_payload<F, R>(&mut self, target: NodeId, update: F) -> UiResult<R>
    where
        F: FnOnce(&mut RenderPayload) -> R,
    {
        self.tree.update_payload(target, update)
    }

    /// Replace a node's placement
    pub fn set_placement(&mut self, target: NodeId, placement: Placement) -> UiResult<()> {
        self.tree.set_placement(target, placement)
    }

    /// Show or hide a node
    pub fn set_visible(&mut self, target: NodeId, visible: bool) -> UiResult<()> {
        let changed = set_visible(self.tree, self.router, self.events, target, visible)?;
        self.restyled.extend(changed);
        Ok(())
    }

    /// Enable or disable a node's interactive capability
    pub fn set_enabled(&mut self, target: NodeId, enabled: bool) -> UiResult<()> {
        let changed = set_enabled(self.tree, self.router, self.events, target, enabled)?;
        self.restyled.extend(changed);
        Ok(())
    }

    /// Queue a host notification
    pub fn notify(&mut self, event: Event) {
        self.events.send(event);
    }

    /// Current UI time in seconds
    pub fn time(&self) -> f64 {
        self.events.current_time()
    }
}

/// Toggle visibility; hiding withdraws hover, press and focus from the subtree
///
/// Returns the interactive nodes whose state changed.
pub(crate) fn set_visible(
    tree: &mut ElementTree,
    router: &mut InputRouter,
    events: &mut EventSystem,
    target: NodeId,
    visible: bool,
) -> UiResult<Vec<NodeId>> {
    tree.set_flag(target, NodeFlags::VISIBLE, visible)?;
    if visible {
        Ok(Vec::new())
    } else {
        Ok(router.withdraw(tree, events, target))
    }
}

/// Toggle input-related flags; leaving hit-testing withdraws hover, press and focus
///
/// Returns the interactive nodes whose state changed.
pub(crate) fn set_flag(
    tree: &mut ElementTree,
    router: &mut InputRouter,
    events: &mut EventSystem,
    target: NodeId,
    flag: NodeFlags,
    enabled: bool,
) -> UiResult<Vec<NodeId>> {
    tree.set_flag(target, flag, enabled)?;
    let leaves_hit_test = (flag.contains(NodeFlags::INTERACTIVE) && !enabled)
        || (flag.contains(NodeFlags::IGNORE_INPUT) && enabled);
    if leaves_hit_test {
        Ok(router.withdraw(tree, events, target))
    } else {
        Ok(Vec::new())
    }
}

/// Toggle the interactive capability; disabling withdraws hover, press and focus
///
/// Returns the interactive nodes whose state changed.
pub(crate) fn set_enabled(
    tree: &mut ElementTree,
    router: &mut InputRouter,
    events: &mut EventSystem,
    target: NodeId,
    enabled: bool,
) -> UiResult<Vec<NodeId>> {
    let node = tree.get_mut(target).ok_or(UiError::UnknownNode(target))?;
    let Some(interactive) = node.interactive.as_mut() else {
        return Ok(Vec::new());
    };
    if interactive.enabled == enabled {
        return Ok(Vec::new());
    }
    interactive.enabled = enabled;

    if enabled {
        Ok(router.refresh(tree, target).into_iter().collect())
    } else {
        Ok(router.withdraw(tree, events, target))
    }
}
