//! Dispatcher
//!
//! Central UI system: owns the element tree, the style registry, the active
//! effects and the input router, and runs the per-frame pipeline. One
//! generic dispatcher serves every presentation backend; the backend only
//! supplies the render phase.
//!
//! `tick` runs four phases in strict order and never interleaves them:
//! 1. route every input event (arrival order) and run node handlers
//! 2. advance active effects
//! 3. lay out dirty subtrees
//! 4. render the tree through the backend

use std::collections::HashMap;

use log::{debug, error, trace, warn};

use super::backend::{BackendError, ContentProvider, FrameInfo, RenderBackend, RenderItem};
use super::backends::{ElementBackend, ImmediateBackend, SpriteBackend};
use super::effect::{EffectKind, EffectParams, EffectSet};
use super::error::{UiError, UiResult};
use super::input::{self, EventContext, InputEvent, InputRouter};
use super::layout::{self, LayoutContext, LayoutElement, LayoutGroup};
use super::node::{ElementNode, NodeFlags, RenderPayload};
use super::placement::Placement;
use super::style::{InteractionState, StyleRegistry, StyleValues};
use super::tree::ElementTree;
use super::{EffectHandle, ElementCategory, NodeId};
use crate::config::{ConfigError, UiConfig};
use crate::events::{Event, EventArg, EventSystem, EventType};
use crate::foundation::math::{Rect, Vec2};

/// Dispatcher driving the retained-mode widget renderer
pub type ElementDispatcher = Dispatcher<ElementBackend>;

/// Dispatcher driving the immediate-mode renderer
pub type ImmediateDispatcher = Dispatcher<ImmediateBackend>;

/// Dispatcher driving the sprite renderer
pub type SpriteDispatcher = Dispatcher<SpriteBackend>;

/// Per-tick counters returned by [`Dispatcher::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Input events routed
    pub routed: usize,
    /// Input events dropped by the per-tick cap
    pub dropped_input: usize,
    /// Input events that reached a node
    pub delivered: usize,
    /// Effects that applied a value
    pub effects_advanced: usize,
    /// One-shot effects that finished
    pub effects_completed: usize,
    /// Effects dropped because their target was gone
    pub effects_invalidated: usize,
    /// Nodes (re)arranged by the layout pass
    pub layout_passes: usize,
    /// Layout groups that overflowed
    pub overflowed_groups: usize,
    /// Items handed to the backend
    pub drawn: usize,
    /// Host notifications delivered at the end of the tick
    pub notifications: usize,
}

/// Owner of one UI tree and its per-frame pipeline
pub struct Dispatcher<B: RenderBackend> {
    config: UiConfig,
    tree: ElementTree,
    router: InputRouter,
    effects: EffectSet,
    styles: StyleRegistry,
    events: EventSystem,
    backend: B,
    content: Option<Box<dyn ContentProvider>>,
    clock: f64,
    frame: u64,
    last_viewport: Option<Vec2>,
    pub(crate) immediate_keys: HashMap<String, NodeId>,
}

impl<B: RenderBackend> Dispatcher<B> {
    /// Create a dispatcher with the default configuration
    pub fn new(backend: B) -> Self {
        Self::build(backend, UiConfig::default())
    }

    /// Create a dispatcher with a validated configuration
    pub fn with_config(backend: B, config: UiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(backend, config))
    }

    fn build(backend: B, config: UiConfig) -> Self {
        let viewport = backend
            .viewport_size()
            .unwrap_or_else(|| config.default_viewport_size());
        Self {
            tree: ElementTree::new(viewport),
            router: InputRouter::new(),
            effects: EffectSet::new(),
            styles: StyleRegistry::new(),
            events: EventSystem::new(),
            backend,
            content: None,
            clock: 0.0,
            frame: 0,
            last_viewport: None,
            immediate_keys: HashMap::new(),
            config,
        }
    }

    /// Builder pattern: use a prepared style registry
    pub fn with_styles(mut self, styles: StyleRegistry) -> Self {
        self.styles = styles;
        self
    }

    /// Builder pattern: resolve native content sizes through `provider`
    pub fn with_content_provider(mut self, provider: Box<dyn ContentProvider>) -> Self {
        self.content = Some(provider);
        self
    }

    // ----- Registration -----

    /// Insert `node` as the last child of `parent` (the root when `None`)
    pub fn register(&mut self, node: ElementNode, parent: Option<NodeId>) -> UiResult<NodeId> {
        if let Some(element) = node.layout_element() {
            element.validate()?;
        }
        let id = self.tree.insert(node, parent)?;
        debug!("Registered node {:?} under {:?}", id, parent.unwrap_or(self.tree.root()));
        Ok(id)
    }

    /// Remove a node and its subtree; unknown ids are ignored
    ///
    /// Unregistering the root clears the tree but keeps the root.
    pub fn unregister(&mut self, id: NodeId) {
        let removed = self.tree.remove_subtree(id);
        if removed.is_empty() {
            return;
        }
        debug!("Unregistered {:?} ({} nodes)", id, removed.len());

        self.effects.invalidate_targets(&removed);
        self.router.forget(&removed, &mut self.events);
        for node in &removed {
            self.backend.node_removed(*node);
        }
        self.immediate_keys.retain(|_, node| !removed.contains(node));
    }

    // ----- Lookup -----

    /// Root node id
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&ElementNode> {
        self.tree.get(id)
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: NodeId) -> bool {
        self.tree.contains(id)
    }

    /// Registered nodes, root included
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Always false: the root is always registered
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Children of `id` in sibling order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree.children(id)
    }

    /// Parent of `id`
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id).and_then(ElementNode::parent)
    }

    /// First node with the given debug name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.tree.find_by_name(name)
    }

    /// World-space rectangle, recomputed lazily after placement changes
    pub fn world_rect(&self, id: NodeId) -> Option<Rect> {
        self.tree.world_rect(id)
    }

    /// Topmost interactive node under `point`
    pub fn hit_test(&self, point: Vec2) -> Option<NodeId> {
        self.tree.hit_test(point)
    }

    /// Node an event would be delivered to right now
    pub fn route(&self, event: &InputEvent) -> Option<NodeId> {
        self.router.route(&self.tree, event)
    }

    /// Read access to the tree
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    // ----- Mutation -----

    /// Replace a node's placement
    pub fn set_placement(&mut self, id: NodeId, placement: Placement) -> UiResult<()> {
        self.tree.set_placement(id, placement)
    }

    /// Replace or clear a node's size contract
    pub fn set_layout_element(&mut self, id: NodeId, element: Option<LayoutElement>) -> UiResult<()> {
        if let Some(element) = &element {
            element.validate()?;
        }
        let node = self.tree.get_mut(id).ok_or(UiError::UnknownNode(id))?;
        if node.layout_element == element {
            return Ok(());
        }
        node.layout_element = element;
        self.tree.mark_layout_dirty(id);
        Ok(())
    }

    /// Replace or clear a node's layout group
    pub fn set_layout_group(&mut self, id: NodeId, group: Option<LayoutGroup>) -> UiResult<()> {
        let node = self.tree.get_mut(id).ok_or(UiError::UnknownNode(id))?;
        if node.layout_group == group {
            return Ok(());
        }
        node.layout_group = group;
        self.tree.mark_layout_dirty(id);
        Ok(())
    }

    /// Mutate a node's render payload
    pub fn update_payload<F, R>(&mut self, id: NodeId, update: F) -> UiResult<R>
    where
        F: FnOnce(&mut RenderPayload) -> R,
    {
        self.tree.update_payload(id, update)
    }

    /// Show or hide a node and its subtree
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> UiResult<()> {
        let changed = input::set_visible(&mut self.tree, &mut self.router, &mut self.events, id, visible)?;
        self.restyle(&changed);
        Ok(())
    }

    /// Enable or disable a node's interactive capability
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> UiResult<()> {
        let changed = input::set_enabled(&mut self.tree, &mut self.router, &mut self.events, id, enabled)?;
        self.restyle(&changed);
        Ok(())
    }

    /// Set or clear node flags
    ///
    /// `VISIBLE` goes through [`Self::set_visible`]. A node that stops being a
    /// hit-test candidate (`INTERACTIVE` cleared or `IGNORE_INPUT` set) loses
    /// hover, press and focus held inside its subtree.
    pub fn set_flag(&mut self, id: NodeId, flag: NodeFlags, enabled: bool) -> UiResult<()> {
        if flag.contains(NodeFlags::VISIBLE) {
            self.set_visible(id, enabled)?;
        }
        let rest = flag - NodeFlags::VISIBLE;
        if rest.is_empty() {
            return Ok(());
        }
        let changed = input::set_flag(&mut self.tree, &mut self.router, &mut self.events, id, rest, enabled)?;
        self.restyle(&changed);
        Ok(())
    }

    // ----- Input capture -----

    /// Take input capture for `id`; false if another node holds it
    pub fn request_capture(&mut self, id: NodeId) -> UiResult<bool> {
        if !self.tree.contains(id) {
            return Err(UiError::UnknownNode(id));
        }
        Ok(self.router.request_capture(id, &mut self.events))
    }

    /// Release capture held by `id`
    pub fn release_capture(&mut self, id: NodeId) -> bool {
        self.router.release_capture(id, &mut self.events)
    }

    /// Node holding input capture
    pub fn capture_target(&self) -> Option<NodeId> {
        self.router.capture_target()
    }

    /// Interactive node under the pointer
    pub fn hovered(&self) -> Option<NodeId> {
        self.router.hovered()
    }

    /// Node holding keyboard focus
    pub fn focused(&self) -> Option<NodeId> {
        self.router.focused()
    }

    // ----- Effects -----

    /// Start a visual effect on `id`
    pub fn trigger_effect(&mut self, id: NodeId, kind: EffectKind, params: EffectParams) -> UiResult<EffectHandle> {
        self.effects.trigger(&self.tree, id, kind, params)
    }

    /// Stop an effect; redundant calls are no-ops
    pub fn cancel_effect(&mut self, handle: EffectHandle) -> bool {
        self.effects.cancel(handle)
    }

    /// Stop every effect running on `id`; returns how many were stopped
    pub fn cancel_effects_on(&mut self, id: NodeId) -> usize {
        self.effects.cancel_target(id)
    }

    /// Handles of the effects running on `id`, in registration order
    pub fn effects_on(&self, id: NodeId) -> Vec<EffectHandle> {
        self.effects.effects_on(id)
    }

    /// Whether an effect is still running
    pub fn is_effect_active(&self, handle: EffectHandle) -> bool {
        self.effects.is_active(handle)
    }

    /// Number of running effects
    pub fn active_effects(&self) -> usize {
        self.effects.active_count()
    }

    // ----- Styles -----

    /// Insert or replace a style entry
    pub fn register_style(
        &mut self,
        name: impl Into<String>,
        category: ElementCategory,
        state: InteractionState,
        values: StyleValues,
    ) {
        self.styles.register(name, category, state, values);
    }

    /// Copy a style entry into a node's payload
    pub fn apply_style(&mut self, id: NodeId, name: &str, state: InteractionState) -> UiResult<()> {
        self.styles.apply(&mut self.tree, id, name, state)
    }

    /// Style registry
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Mutable style registry
    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    // ----- Services -----

    /// Host notification channel
    pub fn events(&self) -> &EventSystem {
        &self.events
    }

    /// Mutable host notification channel (register handlers here)
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Render backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable render backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Active configuration
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Accumulated UI time in seconds
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Number of completed ticks
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    // ----- Frame -----

    /// Run one frame: route input, advance effects, lay out, render
    ///
    /// A render backend failure is returned after the frame's notifications
    /// have been delivered; the tree stays consistent and the next tick
    /// renders normally.
    pub fn tick<I>(&mut self, delta_time: f32, input: I) -> UiResult<FrameReport>
    where
        I: IntoIterator<Item = InputEvent>,
    {
        let mut report = FrameReport::default();

        let viewport = self
            .backend
            .viewport_size()
            .unwrap_or_else(|| self.config.default_viewport_size());
        let viewport_changed = self.last_viewport != Some(viewport);
        self.tree.set_viewport(viewport);

        // Phase 1: input
        let cap = self.config.max_input_events_per_tick;
        for (index, event) in input.into_iter().enumerate() {
            if cap.is_some_and(|cap| index >= cap) {
                report.dropped_input += 1;
                continue;
            }
            report.routed += 1;
            if self.route_event(&event) {
                report.delivered += 1;
            }
        }
        if report.dropped_input > 0 {
            warn!("Dropped {} input events over the per-tick cap", report.dropped_input);
        }

        // Phase 2: effects
        self.clock += f64::from(delta_time.max(0.0));
        self.events.update_time(self.clock);
        let advance = self.effects.advance(delta_time, &mut self.tree);
        report.effects_advanced = advance.advanced;
        report.effects_completed = advance.completed.len();
        report.effects_invalidated = advance.invalidated;
        for (handle, node) in advance.completed {
            self.events.send(
                Event::new(EventType::EffectCompleted, self.clock)
                    .with_node(node)
                    .with_arg("effect", EventArg::Effect(handle)),
            );
        }

        // Phase 3: layout
        let ctx = LayoutContext {
            content: self.content.as_deref(),
            overflow_diagnostics: self.config.overflow_diagnostics,
        };
        let stats = layout::run(&mut self.tree, &ctx);
        report.layout_passes = stats.arranged;
        report.overflowed_groups = stats.overflowed;

        // Phase 4: render
        let rendered = self.render(viewport, viewport_changed);
        self.last_viewport = Some(viewport);
        self.frame += 1;

        report.notifications = self.events.dispatch();

        report.drawn = rendered.map_err(|err| {
            error!("Render backend failed: {}", err);
            UiError::Backend(err.to_string())
        })?;
        Ok(report)
    }

    fn render(&mut self, viewport: Vec2, viewport_changed: bool) -> Result<usize, BackendError> {
        let info = FrameInfo {
            frame: self.frame,
            viewport,
            viewport_changed,
        };
        self.backend.begin_frame(&info)?;

        let mut drawn = 0;
        for entry in self.tree.render_order() {
            let Some(node) = self.tree.get(entry.id) else { continue };
            if matches!(node.payload(), RenderPayload::Empty) {
                continue;
            }
            let Some(world) = self.tree.world_rect(entry.id) else { continue };

            let item = RenderItem {
                id: entry.id,
                world,
                depth: entry.depth,
                payload: node.payload(),
                state: node.interaction_state(),
                changed: node.render_dirty,
            };
            self.backend.draw(&item)?;
            drawn += 1;
        }

        self.backend.end_frame()?;
        self.tree.clear_render_dirty();
        Ok(drawn)
    }

    /// Route one event; returns true if it reached a node
    fn route_event(&mut self, event: &InputEvent) -> bool {
        let target = self.router.route(&self.tree, event);
        let changed = self.router.process(&mut self.tree, &mut self.events, event, target);
        self.restyle(&changed);

        let Some(target) = target else { return false };
        let Some(node) = self.tree.get_mut(target) else { return false };
        let mut handlers = std::mem::take(&mut node.handlers);

        let mut restyled = Vec::new();
        {
            let mut ctx = EventContext {
                node: target,
                tree: &mut self.tree,
                router: &mut self.router,
                effects: &mut self.effects,
                styles: &self.styles,
                events: &mut self.events,
                restyled: &mut restyled,
            };
            for handler in handlers.iter_mut() {
                handler(event, &mut ctx);
            }
        }

        if let Some(node) = self.tree.get_mut(target) {
            handlers.append(&mut node.handlers);
            node.handlers = handlers;
        }
        self.restyle(&restyled);
        true
    }

    /// Re-apply the interactive style of nodes whose state changed
    fn restyle(&mut self, changed: &[NodeId]) {
        for id in changed {
            let Some(node) = self.tree.get(*id) else { continue };
            let Some(style) = node.interactive().and_then(|i| i.style.clone()) else { continue };
            let state = node.interaction_state();
            if let Err(err) = self.styles.apply(&mut self.tree, *id, &style, state) {
                trace!("No restyle for {:?}: {}", id, err);
            }
        }
    }
}
