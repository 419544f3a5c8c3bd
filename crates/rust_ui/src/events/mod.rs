//! Host notification channel
//!
//! The input router reports interaction outcomes (presses, clicks, hover and
//! capture changes, finished effects) here so the host can react without
//! walking the tree. Key principles:
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Queuing support (immediate + deferred delivery)

use std::collections::HashMap;

use crate::ui::{EffectHandle, NodeId};

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Pointer went down on an interactive node
    Pressed,
    /// Pointer went up on the node that was pressed
    Released,
    /// Press and release happened over the same node
    Clicked,
    /// Node gained or lost hover
    HoverChanged,
    /// Node gained or lost input capture
    CaptureChanged,
    /// Node gained or lost keyboard focus
    FocusChanged,
    /// A one-shot visual effect applied its final frame
    EffectCompleted,
}

/// Variant for type-safe event arguments
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Node identifier
    Node(NodeId),
    /// Boolean state (hovered, captured, focused)
    Flag(bool),
    /// Position coordinates in UI space
    Position(f32, f32),
    /// Effect handle
    Effect(EffectHandle),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Timestamp when event was created (seconds of UI time)
    pub timestamp: f64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and timestamp
    pub fn new(event_type: EventType, timestamp: f64) -> Self {
        Self {
            event_type,
            timestamp,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Shorthand for the `node` argument
    pub fn with_node(self, node: NodeId) -> Self {
        self.with_arg("node", EventArg::Node(node))
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get node argument if present
    pub fn get_node(&self) -> Option<NodeId> {
        if let Some(EventArg::Node(id)) = self.get_arg("node") {
            Some(*id)
        } else {
            None
        }
    }

    /// Get a boolean argument if present
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        if let Some(EventArg::Flag(flag)) = self.get_arg(key) {
            Some(*flag)
        } else {
            None
        }
    }

    /// Get position argument if present
    pub fn get_position(&self) -> Option<(f32, f32)> {
        if let Some(EventArg::Position(x, y)) = self.get_arg("position") {
            Some((*x, *y))
        } else {
            None
        }
    }

    /// Get effect argument if present
    pub fn get_effect(&self) -> Option<EffectHandle> {
        if let Some(EventArg::Effect(handle)) = self.get_arg("effect") {
            Some(*handle)
        } else {
            None
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

impl<F: FnMut(&Event) -> bool> EventHandler for F {
    fn on_event(&mut self, event: &Event) -> bool {
        self(event)
    }
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
pub struct EventSystem {
    immediate_queue: Vec<Event>,
    deferred_queue: Vec<(f64, Event)>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
    current_time: f64,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            deferred_queue: Vec::new(),
            handlers: HashMap::new(),
            current_time: 0.0,
        }
    }

    /// Update current time (seconds since start)
    pub fn update_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Current time as last set by the dispatcher
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers
            .entry(event_type)
            .or_default()
            .push(handler);
    }

    /// Send event for handling at the next dispatch
    pub fn send(&mut self, event: Event) {
        self.immediate_queue.push(event);
    }

    /// Post event for deferred delivery at specified time
    pub fn post(&mut self, delivery_time: f64, event: Event) {
        self.deferred_queue.push((delivery_time, event));
    }

    /// Number of events waiting in both queues
    pub fn pending(&self) -> usize {
        self.immediate_queue.len() + self.deferred_queue.len()
    }

    /// Deliver queued events, returning how many reached the handler table
    ///
    /// Sent events go first in send order, then deferred events that are due
    /// in delivery-time order.
    pub fn dispatch(&mut self) -> usize {
        let mut due = std::mem::take(&mut self.immediate_queue);

        let now = self.current_time;
        let (mut ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred_queue)
            .into_iter()
            .partition(|(delivery_time, _)| *delivery_time <= now);
        self.deferred_queue = waiting;
        ready.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.extend(ready.into_iter().map(|(_, event)| event));

        for event in &due {
            self.dispatch_event(event);
        }
        due.len()
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &Event) {
        log::trace!("Dispatching {:?}", event.event_type);
        if let Some(handlers) = self.handlers.get_mut(&event.event_type) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    break;
                }
            }
        }
    }

    /// Clear all queued events
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
        self.deferred_queue.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}
