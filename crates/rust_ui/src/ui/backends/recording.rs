//! Recording backend
//!
//! Stores every item it is handed. Used by tests and headless hosts to
//! observe what the dispatcher renders.

use crate::foundation::math::{Rect, Vec2};
use crate::ui::backend::{BackendError, FrameInfo, RenderBackend, RenderItem};
use crate::ui::node::RenderPayload;
use crate::ui::style::InteractionState;
use crate::ui::NodeId;

/// Owned copy of a [`RenderItem`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedItem {
    /// Node drawn
    pub id: NodeId,
    /// World rectangle
    pub world: Rect,
    /// Effective depth
    pub depth: i32,
    /// Payload at draw time
    pub payload: RenderPayload,
    /// Interaction state at draw time
    pub state: InteractionState,
    /// Whether the node was flagged as changed
    pub changed: bool,
}

/// Backend that records frames instead of drawing them
#[derive(Debug, Default)]
pub struct RecordingBackend {
    viewport: Option<Vec2>,
    frames: Vec<(FrameInfo, Vec<RecordedItem>)>,
    current: Option<(FrameInfo, Vec<RecordedItem>)>,
    removed: Vec<NodeId>,
    fail_next: Option<BackendError>,
}

impl RecordingBackend {
    /// Create a recorder that reports no viewport
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that reports a viewport
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport: Some(Vec2::new(width, height)),
            ..Self::default()
        }
    }

    /// Change the reported viewport
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Some(Vec2::new(width, height));
    }

    /// Make the next `begin_frame` fail with `error`
    pub fn fail_next_frame(&mut self, error: BackendError) {
        self.fail_next = Some(error);
    }

    /// Number of completed frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Items of the last completed frame
    pub fn last_frame(&self) -> Option<&[RecordedItem]> {
        self.frames.last().map(|(_, items)| items.as_slice())
    }

    /// Frame info of the last completed frame
    pub fn last_frame_info(&self) -> Option<&FrameInfo> {
        self.frames.last().map(|(info, _)| info)
    }

    /// Ids drawn in the last completed frame
    pub fn last_order(&self) -> Vec<NodeId> {
        self.last_frame()
            .map(|items| items.iter().map(|item| item.id).collect())
            .unwrap_or_default()
    }

    /// Recorded item for `id` in the last completed frame
    pub fn last_item(&self, id: NodeId) -> Option<&RecordedItem> {
        self.last_frame()?.iter().find(|item| item.id == id)
    }

    /// Nodes reported as removed
    pub fn removed(&self) -> &[NodeId] {
        &self.removed
    }
}

impl RenderBackend for RecordingBackend {
    fn viewport_size(&self) -> Option<Vec2> {
        self.viewport
    }

    fn begin_frame(&mut self, frame: &FrameInfo) -> Result<(), BackendError> {
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        self.current = Some((*frame, Vec::new()));
        Ok(())
    }

    fn draw(&mut self, item: &RenderItem<'_>) -> Result<(), BackendError> {
        let (_, items) = self.current.as_mut().ok_or(BackendError::NotInFrame)?;
        items.push(RecordedItem {
            id: item.id,
            world: item.world,
            depth: item.depth,
            payload: item.payload.clone(),
            state: item.state,
            changed: item.changed,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        let frame = self.current.take().ok_or(BackendError::NotInFrame)?;
        self.frames.push(frame);
        Ok(())
    }

    fn node_removed(&mut self, id: NodeId) {
        self.removed.push(id);
    }
}
