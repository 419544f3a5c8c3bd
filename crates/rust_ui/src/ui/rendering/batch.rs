//! Frame batching
//!
//! Flattens draw commands into two shared vertex buffers plus an ordered
//! draw list, so the host can upload once and issue draws in tree order.

use super::commands::DrawCommand;
use super::vertex::{PanelVertex, UIVertex};
use crate::foundation::math::{Rect, Vec4};
use crate::ui::node::ContentHandle;
use crate::ui::placement::{HorizontalAlign, VerticalAlign};

/// Text draw forwarded to the host's glyph renderer
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    /// Text content
    pub text: String,
    /// Layout box in screen pixels
    pub rect: Rect,
    /// Font content
    pub font: Option<ContentHandle>,
    /// Font size in pixels
    pub font_size: f32,
    /// Text color
    pub color: Vec4,
    /// Horizontal alignment
    pub h_align: HorizontalAlign,
    /// Vertical alignment
    pub v_align: VerticalAlign,
}

/// One draw call, in submission order
#[derive(Debug, Clone, PartialEq)]
pub enum BatchDraw {
    /// Range of `panel_vertices`
    Panel {
        /// First vertex
        start: usize,
        /// Vertex count
        count: usize,
        /// Fill color
        color: Vec4,
    },
    /// Range of `textured_vertices`
    Textured {
        /// First vertex
        start: usize,
        /// Vertex count
        count: usize,
        /// Texture content
        content: Option<ContentHandle>,
        /// Multiplied color
        tint: Vec4,
    },
    /// Text label
    Text(TextDraw),
}

/// Batched frame output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBatch {
    /// All panel vertices in a single buffer
    pub panel_vertices: Vec<PanelVertex>,
    /// All textured vertices in a single buffer
    pub textured_vertices: Vec<UIVertex>,
    /// Draw calls in order
    pub draws: Vec<BatchDraw>,
}

impl RenderBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one command
    pub fn push(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Panel { vertices, color } => {
                let start = self.panel_vertices.len();
                self.panel_vertices.extend_from_slice(vertices);
                self.draws.push(BatchDraw::Panel { start, count: vertices.len(), color: *color });
            }
            DrawCommand::Textured { vertices, content, tint } => {
                let start = self.textured_vertices.len();
                self.textured_vertices.extend_from_slice(vertices);
                self.draws.push(BatchDraw::Textured {
                    start,
                    count: vertices.len(),
                    content: *content,
                    tint: *tint,
                });
            }
            DrawCommand::Text { text, rect, font, font_size, color, h_align, v_align } => {
                self.draws.push(BatchDraw::Text(TextDraw {
                    text: text.clone(),
                    rect: *rect,
                    font: *font,
                    font_size: *font_size,
                    color: *color,
                    h_align: *h_align,
                    v_align: *v_align,
                }));
            }
        }
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.panel_vertices.clear();
        self.textured_vertices.clear();
        self.draws.clear();
    }

    /// Number of draw calls
    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    /// Panel vertex buffer as raw bytes for upload
    pub fn panel_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.panel_vertices)
    }

    /// Textured vertex buffer as raw bytes for upload
    pub fn textured_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.textured_vertices)
    }
}
