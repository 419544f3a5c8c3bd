//! Sprite-based UI backend
//!
//! Turns nodes into sprite renderer draws: images and sprites keep their
//! content, panels become untextured tinted sprites. Draws are ordered by
//! sorting layer first and by depth/tree order within a layer.

use log::trace;

use crate::foundation::math::{Rect, Vec2, Vec4};
use crate::ui::backend::{BackendError, FrameInfo, RenderBackend, RenderItem};
use crate::ui::node::{ContentHandle, RenderPayload};
use crate::ui::rendering::geometry;
use crate::ui::rendering::{TextDraw, UIVertex};
use crate::ui::NodeId;

/// One sprite renderer draw
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    /// Source node
    pub node: NodeId,
    /// Sprite frame, untextured when `None`
    pub content: Option<ContentHandle>,
    /// Screen rectangle in pixels
    pub rect: Rect,
    /// NDC quad with UVs (flips applied)
    pub vertices: [UIVertex; 6],
    /// Multiplied color
    pub tint: Vec4,
    /// Coarse sorting layer
    pub sorting_layer: i32,
    /// Order within the layer
    pub order_in_layer: i32,
}

/// Sprite renderer driver
#[derive(Debug, Default)]
pub struct SpriteBackend {
    surface_size: Option<Vec2>,
    sprites: Vec<SpriteDraw>,
    texts: Vec<TextDraw>,
    skipped: usize,
    frame: Option<FrameInfo>,
}

impl SpriteBackend {
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

    /// Sprite draws of the last frame, in submission order
    pub fn sprites(&self) -> &[SpriteDraw] {
        &self.sprites
    }

    /// Text labels of the last frame
    pub fn texts(&self) -> &[TextDraw] {
        &self.texts
    }

    /// Payloads that have no sprite representation (vector primitives)
    pub fn skipped_last_frame(&self) -> usize {
        self.skipped
    }

    fn push_sprite(&mut self, item: &RenderItem<'_>, viewport: Vec2, content: Option<ContentHandle>, tint: Vec4, flip: (bool, bool), layer: i32) {
        self.sprites.push(SpriteDraw {
            node: item.id,
            content,
            rect: item.world,
            vertices: geometry::textured_quad(&item.world, viewport, flip.0, flip.1),
            tint,
            sorting_layer: layer,
            order_in_layer: item.depth,
        });
    }
}

impl RenderBackend for SpriteBackend {
    fn viewport_size(&self) -> Option<Vec2> {
        self.surface_size
    }

    fn begin_frame(&mut self, frame: &FrameInfo) -> Result<(), BackendError> {
        self.sprites.clear();
        self.texts.clear();
        self.skipped = 0;
        self.frame = Some(*frame);
        Ok(())
    }

    fn draw(&mut self, item: &RenderItem<'_>) -> Result<(), BackendError> {
        let viewport = self.frame.ok_or(BackendError::NotInFrame)?.viewport;
        match item.payload {
            RenderPayload::Empty => {}
            RenderPayload::Panel { color, .. } => {
                self.push_sprite(item, viewport, None, *color, (false, false), 0);
            }
            RenderPayload::Image { content, tint } => {
                self.push_sprite(item, viewport, *content, *tint, (false, false), 0);
            }
            RenderPayload::Sprite { content, tint, flip_x, flip_y, sorting_layer } => {
                self.push_sprite(item, viewport, *content, *tint, (*flip_x, *flip_y), *sorting_layer);
            }
            RenderPayload::Text { text, font, font_size, color, h_align, v_align } => {
                self.texts.push(TextDraw {
                    text: text.clone(),
                    rect: item.world,
                    font: *font,
                    font_size: *font_size,
                    color: *color,
                    h_align: *h_align,
                    v_align: *v_align,
                });
            }
            RenderPayload::Primitive { .. } => {
                trace!("Sprite UI has no renderer for primitive node {:?}", item.id);
                self.skipped += 1;
            }
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        let frame = self.frame.take().ok_or(BackendError::NotInFrame)?;
        self.sprites.sort_by_key(|sprite| sprite.sorting_layer);
        trace!("Sprite UI frame {}: {} sprites, {} texts", frame.frame, self.sprites.len(), self.texts.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::colors;
    use crate::ui::style::InteractionState;
    use slotmap::SlotMap;

    #[test]
    fn test_sorting_layer_wins_over_tree_order() {
        let mut ids: SlotMap<NodeId, ()> = SlotMap::with_key();
        let (back, front) = (ids.insert(()), ids.insert(()));
        let overlay = RenderPayload::Sprite {
            content: Some(ContentHandle(7)),
            tint: colors::white(),
            flip_x: false,
            flip_y: false,
            sorting_layer: 1,
        };
        let panel = RenderPayload::panel(colors::black());
        let item = |id, payload| RenderItem {
            id,
            world: Rect::new(0.0, 0.0, 10.0, 10.0),
            depth: 0,
            payload,
            state: InteractionState::Normal,
            changed: true,
        };

        let mut backend = SpriteBackend::with_surface_size(100.0, 100.0);
        backend
            .begin_frame(&FrameInfo { frame: 0, viewport: Vec2::new(100.0, 100.0), viewport_changed: true })
            .unwrap();
        backend.draw(&item(back, &overlay)).unwrap();
        backend.draw(&item(front, &panel)).unwrap();
        backend.end_frame().unwrap();

        let order: Vec<NodeId> = backend.sprites().iter().map(|sprite| sprite.node).collect();
        assert_eq!(order, vec![front, back]);
        assert_eq!(backend.sprites()[0].content, None);
    }
}
