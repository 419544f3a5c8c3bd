//! Immediate-mode (IMGUI) backend
//!
//! Regenerates the whole frame's geometry on every frame; nothing is cached
//! between frames.

use log::trace;

use crate::foundation::math::Vec2;
use crate::ui::backend::{BackendError, FrameInfo, RenderBackend, RenderItem};
use crate::ui::rendering::{commands_for, RenderBatch};

/// Per-frame renderer
#[derive(Debug, Default)]
pub struct ImmediateBackend {
    surface_size: Option<Vec2>,
    batch: RenderBatch,
    frame: Option<FrameInfo>,
    nodes: usize,
}

impl ImmediateBackend {
    /// Create a backend that uses the configured default viewport
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend presenting to a surface of the given size
    pub fn with_surface_size(width: f32, height: f32) -> Self {
        Self {
            surface_size: Some(Vec2::new(width, height)),
            ..Self::default()
        }
    }

    /// Update screen size (call when the window resizes)
    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        self.surface_size = Some(Vec2::new(width, height));
    }

    /// Batched output of the last frame
    pub fn batch(&self) -> &RenderBatch {
        &self.batch
    }

    /// Nodes drawn in the last frame
    pub fn nodes_last_frame(&self) -> usize {
        self.nodes
    }
}

impl RenderBackend for ImmediateBackend {
    fn viewport_size(&self) -> Option<Vec2> {
        self.surface_size
    }

    fn begin_frame(&mut self, frame: &FrameInfo) -> Result<(), BackendError> {
        self.batch.clear();
        self.nodes = 0;
        self.frame = Some(*frame);
        Ok(())
    }

    fn draw(&mut self, item: &RenderItem<'_>) -> Result<(), BackendError> {
        let frame = self.frame.ok_or(BackendError::NotInFrame)?;
        for command in commands_for(item, frame.viewport) {
            self.batch.push(&command);
        }
        self.nodes += 1;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        let frame = self.frame.take().ok_or(BackendError::NotInFrame)?;
        trace!("IMGUI frame {}: {} nodes, {} draws", frame.frame, self.nodes, self.batch.draw_count());
        Ok(())
    }
}
