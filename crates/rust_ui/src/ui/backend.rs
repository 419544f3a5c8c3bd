//! Render backend interface
//!
//! Defines the interface between the dispatcher and presentation backends.
//! The dispatcher walks the finalized tree once per frame and hands every
//! visible node to the backend; what the backend turns it into (retained
//! draw lists, per-frame geometry, sprite renderers) is its own business.

use thiserror::Error;

use super::node::{ContentHandle, RenderPayload};
use super::style::InteractionState;
use super::NodeId;
use crate::foundation::math::{Rect, Vec2};

/// Errors raised by a render backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// `draw` or `end_frame` called outside a frame
    #[error("no frame in progress")]
    NotInFrame,

    /// The backend cannot express this payload
    #[error("unsupported payload: {0}")]
    Unsupported(String),

    /// Failure reported by the host graphics layer
    #[error("device error: {0}")]
    Device(String),
}

/// Per-frame information passed to `begin_frame`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Frame number, starting at 0
    pub frame: u64,
    /// Size of the root allocation in pixels
    pub viewport: Vec2,
    /// The viewport differs from the previous frame
    pub viewport_changed: bool,
}

/// A finalized node handed to the backend
#[derive(Debug, Clone, Copy)]
pub struct RenderItem<'a> {
    /// Node being drawn
    pub id: NodeId,
    /// World-space rectangle (top-left origin, pixels)
    pub world: Rect,
    /// Effective z-order
    pub depth: i32,
    /// Render payload after styles and effects
    pub payload: &'a RenderPayload,
    /// Interaction state of the node
    pub state: InteractionState,
    /// Payload, placement or state changed since the node was last drawn
    pub changed: bool,
}

/// Backend-agnostic rendering interface
pub trait RenderBackend {
    /// Size of the presentation surface, `None` to use the configured default
    fn viewport_size(&self) -> Option<Vec2> {
        None
    }

    /// Begin a frame
    fn begin_frame(&mut self, frame: &FrameInfo) -> Result<(), BackendError>;

    /// Emit output for one node; called in draw order
    fn draw(&mut self, item: &RenderItem<'_>) -> Result<(), BackendError>;

    /// Finish the frame
    fn end_frame(&mut self) -> Result<(), BackendError>;

    /// A node was unregistered; drop anything cached for it
    fn node_removed(&mut self, _id: NodeId) {}
}

/// Host asset service resolving opaque content handles
pub trait ContentProvider {
    /// Native size of the content in pixels
    fn content_size(&self, handle: ContentHandle) -> Option<Vec2>;
}

impl<F> ContentProvider for F
where
    F: Fn(ContentHandle) -> Option<Vec2>,
{
    fn content_size(&self, handle: ContentHandle) -> Option<Vec2> {
        self(handle)
    }
}
