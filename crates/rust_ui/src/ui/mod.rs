//! UI core
//!
//! Architecture:
//! - `Dispatcher`: owns the element tree and runs the per-frame pipeline
//!   (route input, advance effects, layout, render)
//! - `tree`/`node`/`placement`: the retained element hierarchy
//! - `layout`: size contracts and constraint-based arrangement of children
//! - `style`/`effect`: visual services applied to render payloads
//! - `input`: hit-testing, capture and interaction state machine
//! - `backend`/`backends`/`rendering`: render backends and their draw data

pub mod backend;
pub mod backends;
pub mod dispatcher;
pub mod effect;
pub mod error;
pub mod immediate;
pub mod input;
pub mod layout;
pub mod node;
pub mod placement;
pub mod rendering;
pub mod style;
pub mod tree;

#[cfg(test)]
mod tests;

pub use backend::{BackendError, ContentProvider, FrameInfo, RenderBackend, RenderItem};
pub use backends::{ElementBackend, ImmediateBackend, RecordingBackend, SpriteBackend};
pub use dispatcher::{Dispatcher, ElementDispatcher, FrameReport, ImmediateDispatcher, SpriteDispatcher};
pub use effect::{Completion, Curve, EffectKind, EffectParams};
pub use error::{UiError, UiResult};
pub use immediate::ImmediateFrame;
pub use input::{EventContext, InputEvent, InputKind, Key, MouseButton};
pub use layout::{GridConstraint, GridLayout, LayoutElement, LayoutGroup, LayoutKind, Padding, SizeContract};
pub use node::{ContentHandle, ElementCategory, ElementNode, Interactive, NodeFlags, RenderPayload};
pub use placement::{Anchor, HorizontalAlign, Placement, VerticalAlign};
pub use style::{InteractionState, StyleRegistry, StyleValues};
pub use tree::ElementTree;

slotmap::new_key_type! {
    /// Stable identifier of a registered element node
    pub struct NodeId;
}

/// Handle to an active visual effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectHandle(pub u64);
