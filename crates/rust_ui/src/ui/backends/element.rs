//! Retained-mode (Element UI) backend
//!
//! Keeps the generated draw commands of every node between frames and only
//! regenerates nodes whose render state changed. The batch is rebuilt from
//! the cache when anything was regenerated or the draw order changed.

use std::collections::HashMap;

use log::debug;

use crate::foundation::math::Vec2;
use crate::ui::backend::{BackendError, FrameInfo, RenderBackend, RenderItem};
use crate::ui::rendering::{commands_for, DrawCommand, RenderBatch};
use crate::ui::NodeId;

/// Retained widget renderer
#[derive(Debug, Default)]
pub struct ElementBackend {
    surface_size: Option<Vec2>,
    cache: HashMap<NodeId, Vec<DrawCommand>>,
    frame_order: Vec<NodeId>,
    previous_order: Vec<NodeId>,
    batch: RenderBatch,
    frame: Option<FrameInfo>,
    regenerated: usize,
}

impl ElementBackend {
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

    /// Nodes whose commands were regenerated in the last frame
    pub fn regenerated_last_frame(&self) -> usize {
        self.regenerated
    }

    /// Nodes with cached commands
    pub fn cached_nodes(&self) -> usize {
        self.cache.len()
    }
}

impl RenderBackend for ElementBackend {
    fn viewport_size(&self) -> Option<Vec2> {
        self.surface_size
    }

    fn begin_frame(&mut self, frame: &FrameInfo) -> Result<(), BackendError> {
        if frame.viewport_changed {
            self.cache.clear();
        }
        self.previous_order = std::mem::take(&mut self.frame_order);
        self.regenerated = 0;
        self.frame = Some(*frame);
        Ok(())
    }

    fn draw(&mut self, item: &RenderItem<'_>) -> Result<(), BackendError> {
        let frame = self.frame.ok_or(BackendError::NotInFrame)?;
        if item.changed || !self.cache.contains_key(&item.id) {
            self.cache.insert(item.id, commands_for(item, frame.viewport));
            self.regenerated += 1;
        }
        self.frame_order.push(item.id);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        let frame = self.frame.take().ok_or(BackendError::NotInFrame)?;

        if self.regenerated > 0 || self.frame_order != self.previous_order {
            self.batch.clear();
            for id in &self.frame_order {
                if let Some(commands) = self.cache.get(id) {
                    for command in commands {
                        self.batch.push(command);
                    }
                }
            }
            debug!(
                "Element UI frame {}: {} nodes, {} regenerated, {} draws",
                frame.frame,
                self.frame_order.len(),
                self.regenerated,
                self.batch.draw_count()
            );
        }
        Ok(())
    }

    fn node_removed(&mut self, id: NodeId) {
        self.cache.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{colors, Rect};
    use crate::ui::node::RenderPayload;
    use crate::ui::style::InteractionState;
    use slotmap::SlotMap;

    fn frame(n: u64) -> FrameInfo {
        FrameInfo { frame: n, viewport: Vec2::new(800.0, 600.0), viewport_changed: n == 0 }
    }

    #[test]
    fn test_unchanged_nodes_reuse_cached_commands() {
        let mut ids: SlotMap<NodeId, ()> = SlotMap::with_key();
        let id = ids.insert(());
        let payload = RenderPayload::panel(colors::white());
        let mut item = RenderItem {
            id,
            world: Rect::new(0.0, 0.0, 10.0, 10.0),
            depth: 0,
            payload: &payload,
            state: InteractionState::Normal,
            changed: true,
        };

        let mut backend = ElementBackend::new();
        backend.begin_frame(&frame(0)).unwrap();
        backend.draw(&item).unwrap();
        backend.end_frame().unwrap();
        assert_eq!(backend.regenerated_last_frame(), 1);
        assert_eq!(backend.batch().draw_count(), 1);

        item.changed = false;
        backend.begin_frame(&frame(1)).unwrap();
        backend.draw(&item).unwrap();
        backend.end_frame().unwrap();
        assert_eq!(backend.regenerated_last_frame(), 0);
        assert_eq!(backend.batch().draw_count(), 1);
    }

    #[test]
    fn test_draw_outside_frame_fails() {
        let payload = RenderPayload::Empty;
        let item = RenderItem {
            id: NodeId::default(),
            world: Rect::zero(),
            depth: 0,
            payload: &payload,
            state: InteractionState::Normal,
            changed: true,
        };
        let mut backend = ElementBackend::new();
        assert_eq!(backend.draw(&item), Err(BackendError::NotInFrame));
        assert_eq!(backend.end_frame(), Err(BackendError::NotInFrame));
    }
}
