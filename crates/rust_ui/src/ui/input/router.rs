//! Interactive router
//!
//! Resolves which node an input event goes to and drives the interaction
//! state machine of interactive nodes:
//! `Normal -> Hovered -> Pressed -> (Hovered | Normal)`, `Selected` while
//! focused, `Disabled` whenever the node is not enabled.

use log::debug;

use super::event::{InputEvent, InputKind, Key, MouseButton};
use crate::events::{Event, EventArg, EventSystem, EventType};
use crate::ui::style::InteractionState;
use crate::ui::tree::ElementTree;
use crate::ui::NodeId;
use crate::foundation::math::Vec2;

/// Capture, hover, press and focus bookkeeping
#[derive(Debug, Default)]
pub struct InputRouter {
    capture: Option<NodeId>,
    hovered: Option<NodeId>,
    pressed: Option<NodeId>,
    focused: Option<NodeId>,
}

impl InputRouter {
    /// Create a router with no capture, hover or focus
    pub fn new() -> Self {
        Self::default()
    }

    /// Node holding input capture
    pub fn capture_target(&self) -> Option<NodeId> {
        self.capture
    }

    /// Interactive node under the pointer
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Node currently pressed
    pub fn pressed(&self) -> Option<NodeId> {
        self.pressed
    }

    /// Node holding keyboard focus
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Node the event is delivered to
    ///
    /// The capture target gets every event. Otherwise pointer events go to
    /// the topmost hit-test candidate under the pointer and key events go to
    /// the focused node.
    pub fn route(&self, tree: &ElementTree, event: &InputEvent) -> Option<NodeId> {
        if let Some(capture) = self.capture {
            return Some(capture);
        }
        if event.is_pointer() {
            tree.hit_test(event.position)
        } else {
            self.focused
        }
    }

    /// Take input capture for `id`
    ///
    /// Only one node holds capture at a time; the first requester keeps it
    /// until it releases or is unregistered.
    pub fn request_capture(&mut self, id: NodeId, events: &mut EventSystem) -> bool {
        match self.capture {
            Some(holder) => holder == id,
            None => {
                debug!("Input capture taken by {:?}", id);
                self.capture = Some(id);
                notify(events, EventType::CaptureChanged, id, Some(true), None);
                true
            }
        }
    }

    /// Give up capture held by `id`; false if `id` does not hold it
    pub fn release_capture(&mut self, id: NodeId, events: &mut EventSystem) -> bool {
        if self.capture != Some(id) {
            return false;
        }
        debug!("Input capture released by {:?}", id);
        self.capture = None;
        notify(events, EventType::CaptureChanged, id, Some(false), None);
        true
    }

    /// Update interaction state for an event delivered to `target`
    ///
    /// `target` is what [`Self::route`] returned for `event`. Returns the interactive nodes whose state changed.
    pub fn process(
        &mut self,
        tree: &mut ElementTree,
        events: &mut EventSystem,
        event: &InputEvent,
        target: Option<NodeId>,
    ) -> Vec<NodeId> {
        let before = self.tracked();
        // Without capture, `target` already is the hit-test result for pointer events
        let hit = (self.capture.is_none() && event.is_pointer()).then_some(target);

        match event.kind {
            InputKind::PointerMove | InputKind::Scroll(_) => {
                self.update_hover(tree, events, event.position, hit);
            }
            InputKind::PointerDown(MouseButton::Left) => {
                self.update_hover(tree, events, event.position, hit);
                self.press(tree, events, event, target);
            }
            InputKind::PointerUp(MouseButton::Left) => {
                self.release(tree, events, event);
                self.update_hover(tree, events, event.position, hit);
            }
            InputKind::KeyDown(Key::Enter | Key::Space) => {
                if let Some(id) = target.filter(|id| self.focused == Some(*id) && is_enabled(tree, *id)) {
                    notify(events, EventType::Clicked, id, None, None);
                }
            }
            _ => {}
        }

        self.refresh_states(tree, before)
    }

    /// Forget removed nodes
    pub fn forget(&mut self, removed: &[NodeId], events: &mut EventSystem) {
        if let Some(capture) = self.capture.filter(|id| removed.contains(id)) {
            self.capture = None;
            notify(events, EventType::CaptureChanged, capture, Some(false), None);
        }
        if let Some(focused) = self.focused.filter(|id| removed.contains(id)) {
            self.focused = None;
            notify(events, EventType::FocusChanged, focused, Some(false), None);
        }
        if self.hovered.is_some_and(|id| removed.contains(&id)) {
            self.hovered = None;
        }
        if self.pressed.is_some_and(|id| removed.contains(&id)) {
            self.pressed = None;
        }
    }

    /// Drop hover, press and focus held inside a subtree that was hidden or disabled
    pub fn withdraw(&mut self, tree: &mut ElementTree, events: &mut EventSystem, id: NodeId) -> Vec<NodeId> {
        let before = self.tracked();
        let inside = |node: Option<NodeId>| node.is_some_and(|node| tree.is_ancestor_or_self(id, node));

        if inside(self.focused) {
            self.set_focus(None, events);
        }
        if inside(self.hovered) {
            if let Some(hovered) = self.hovered.take() {
                notify(events, EventType::HoverChanged, hovered, Some(false), None);
            }
        }
        if inside(self.pressed) {
            self.pressed = None;
        }

        let mut changed = self.refresh_states(tree, before);
        if let Some(state) = derived_state(self, tree, id) {
            if set_state(tree, id, state) && !changed.contains(&id) {
                changed.push(id);
            }
        }
        changed
    }

    /// Recompute the interaction state of one node
    pub fn refresh(&self, tree: &mut ElementTree, id: NodeId) -> Option<NodeId> {
        let state = derived_state(self, tree, id)?;
        set_state(tree, id, state).then_some(id)
    }

    fn tracked(&self) -> [Option<NodeId>; 3] {
        [self.hovered, self.pressed, self.focused]
    }

    fn update_hover(
        &mut self,
        tree: &ElementTree,
        events: &mut EventSystem,
        position: Vec2,
        hit: Option<Option<NodeId>>,
    ) {
        let hit = match (self.capture, hit) {
            (Some(capture), _) => Some(capture).filter(|id| {
                tree.world_rect(*id).is_some_and(|rect| rect.contains_point(position))
            }),
            (None, Some(hit)) => hit,
            (None, None) => tree.hit_test(position),
        };

        if hit != self.hovered {
            if let Some(old) = self.hovered {
                notify(events, EventType::HoverChanged, old, Some(false), Some(position));
            }
            if let Some(new) = hit {
                notify(events, EventType::HoverChanged, new, Some(true), Some(position));
            }
            self.hovered = hit;
        }
    }

    fn press(&mut self, tree: &ElementTree, events: &mut EventSystem, event: &InputEvent, target: Option<NodeId>) {
        let Some(id) = target else {
            self.set_focus(None, events);
            return;
        };
        let Some(interactive) = tree.get(id).and_then(|node| node.interactive()) else {
            return;
        };
        if !interactive.enabled {
            return;
        }

        let (capture_on_press, focusable) = (interactive.capture_on_press, interactive.focusable);
        self.pressed = Some(id);
        notify(events, EventType::Pressed, id, None, Some(event.position));

        if capture_on_press {
            self.request_capture(id, events);
        }
        self.set_focus(if focusable { Some(id) } else { None }, events);
    }

    fn release(&mut self, tree: &ElementTree, events: &mut EventSystem, event: &InputEvent) {
        let Some(id) = self.pressed.take() else { return };
        notify(events, EventType::Released, id, None, Some(event.position));

        if tree.world_rect(id).is_some_and(|rect| rect.contains_point(event.position)) {
            notify(events, EventType::Clicked, id, None, Some(event.position));
        }

        let auto_capture = tree
            .get(id)
            .and_then(|node| node.interactive())
            .is_some_and(|interactive| interactive.capture_on_press);
        if auto_capture {
            self.release_capture(id, events);
        }
    }

    fn set_focus(&mut self, focus: Option<NodeId>, events: &mut EventSystem) {
        if focus == self.focused {
            return;
        }
        if let Some(old) = self.focused {
            notify(events, EventType::FocusChanged, old, Some(false), None);
        }
        if let Some(new) = focus {
            notify(events, EventType::FocusChanged, new, Some(true), None);
        }
        self.focused = focus;
    }

    fn refresh_states(&self, tree: &mut ElementTree, before: [Option<NodeId>; 3]) -> Vec<NodeId> {
        let mut changed = Vec::new();
        for id in before.into_iter().chain(self.tracked()).flatten() {
            if changed.contains(&id) {
                continue;
            }
            if let Some(state) = derived_state(self, tree, id) {
                if set_state(tree, id, state) {
                    changed.push(id);
                }
            }
        }
        changed
    }
}

fn derived_state(router: &InputRouter, tree: &ElementTree, id: NodeId) -> Option<InteractionState> {
    let interactive = tree.get(id)?.interactive()?;
    let state = if !interactive.enabled {
        InteractionState::Disabled
    } else if router.pressed == Some(id) && router.hovered == Some(id) {
        InteractionState::Pressed
    } else if router.hovered == Some(id) {
        InteractionState::Hovered
    } else if router.focused == Some(id) {
        InteractionState::Selected
    } else {
        InteractionState::Normal
    };
    Some(state)
}

fn set_state(tree: &mut ElementTree, id: NodeId, state: InteractionState) -> bool {
    let Some(node) = tree.get_mut(id) else { return false };
    let Some(interactive) = node.interactive.as_mut() else { return false };
    if interactive.state == state {
        return false;
    }
    interactive.state = state;
    node.render_dirty = true;
    true
}

fn is_enabled(tree: &ElementTree, id: NodeId) -> bool {
    tree.get(id)
        .and_then(|node| node.interactive())
        .is_some_and(|interactive| interactive.enabled)
}

fn notify(events: &mut EventSystem, event_type: EventType, node: NodeId, flag: Option<bool>, position: Option<Vec2>) {
    let mut event = Event::new(event_type, events.current_time()).with_node(node);
    if let Some(flag) = flag {
        let key = match event_type {
            EventType::HoverChanged => "hovered",
            EventType::CaptureChanged => "captured",
            EventType::FocusChanged => "focused",
            _ => "flag",
        };
        event = event.with_arg(key, EventArg::Flag(flag));
    }
    if let Some(position) = position {
        event = event.with_arg("position", EventArg::Position(position.x, position.y));
    }
    events.send(event);
}
