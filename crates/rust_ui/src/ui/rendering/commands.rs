//! UI draw commands

use super::geometry;
use super::vertex::{PanelVertex, UIVertex};
use crate::foundation::math::{Rect, Vec2, Vec4};
use crate::ui::backend::RenderItem;
use crate::ui::node::{ContentHandle, RenderPayload};
use crate::ui::placement::{HorizontalAlign, VerticalAlign};

/// Draw command for a single element
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Solid color geometry (position-only vertices, 8 bytes per vertex)
    Panel {
        /// Panel vertex data
        vertices: Vec<PanelVertex>,
        /// Panel color
        color: Vec4,
    },
    /// Textured quad (position + UV vertices, 16 bytes per vertex)
    Textured {
        /// Quad vertex data
        vertices: Vec<UIVertex>,
        /// Texture content, untextured when `None`
        content: Option<ContentHandle>,
        /// Multiplied color
        tint: Vec4,
    },
    /// Text laid out by the host's glyph renderer
    Text {
        /// Text content
        text: String,
        /// Layout box in screen pixels
        rect: Rect,
        /// Font content, host default when `None`
        font: Option<ContentHandle>,
        /// Font size in pixels
        font_size: f32,
        /// Text color
        color: Vec4,
        /// Horizontal alignment inside `rect`
        h_align: HorizontalAlign,
        /// Vertical alignment inside `rect`
        v_align: VerticalAlign,
    },
}

/// Commands for one finalized node
pub fn commands_for(item: &RenderItem<'_>, viewport: Vec2) -> Vec<DrawCommand> {
    let rect = &item.world;
    match item.payload {
        RenderPayload::Empty => Vec::new(),
        RenderPayload::Panel { color, border_color, border_width, .. } => {
            let mut commands = vec![DrawCommand::Panel {
                vertices: geometry::panel_quad(rect, viewport).to_vec(),
                color: *color,
            }];
            let border = geometry::border_quads(rect, *border_width, viewport);
            if !border.is_empty() {
                commands.push(DrawCommand::Panel { vertices: border, color: *border_color });
            }
            commands
        }
        RenderPayload::Image { content, tint } => vec![DrawCommand::Textured {
            vertices: geometry::textured_quad(rect, viewport, false, false).to_vec(),
            content: *content,
            tint: *tint,
        }],
        RenderPayload::Sprite { content, tint, flip_x, flip_y, .. } => vec![DrawCommand::Textured {
            vertices: geometry::textured_quad(rect, viewport, *flip_x, *flip_y).to_vec(),
            content: *content,
            tint: *tint,
        }],
        RenderPayload::Text { text, font, font_size, color, h_align, v_align } => {
            if text.is_empty() {
                return Vec::new();
            }
            vec![DrawCommand::Text {
                text: text.clone(),
                rect: *rect,
                font: *font,
                font_size: *font_size,
                color: *color,
                h_align: *h_align,
                v_align: *v_align,
            }]
        }
        RenderPayload::Primitive { points, color } => {
            let vertices = geometry::polygon_fan(points, rect, viewport);
            if vertices.is_empty() {
                return Vec::new();
            }
            vec![DrawCommand::Panel { vertices, color: *color }]
        }
    }
}
