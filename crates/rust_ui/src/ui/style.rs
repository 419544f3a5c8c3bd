//! Visual style service
//!
//! A registry of named property sets keyed by (style name, element category,
//! interaction state). Applying a style copies the matching values into the
//! node's render payload once; later registry edits only reach nodes that are
//! styled again.

use std::collections::HashMap;

use log::trace;

use super::error::{UiError, UiResult};
use super::node::{ContentHandle, ElementCategory, RenderPayload};
use super::tree::ElementTree;
use super::NodeId;
use crate::foundation::math::Vec4;

/// Interaction state used for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    /// Normal resting state
    #[default]
    Normal,
    /// Pointer is hovering over the node
    Hovered,
    /// Node is being pressed
    Pressed,
    /// Node holds keyboard focus
    Selected,
    /// Node is disabled (non-interactive)
    Disabled,
}

/// Registry key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleKey {
    /// Style name, e.g. "Button"
    pub name: String,
    /// Category of nodes the entry applies to
    pub category: ElementCategory,
    /// Interaction state the entry applies to
    pub state: InteractionState,
}

/// Property values of one style entry; `None` leaves the payload untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleValues {
    /// Main color (panel background, text color, image/sprite tint)
    pub color: Option<Vec4>,
    /// Image or sprite content
    pub content: Option<ContentHandle>,
    /// Panel border color
    pub border_color: Option<Vec4>,
    /// Panel border width
    pub border_width: Option<f32>,
    /// Panel corner radius
    pub corner_radius: Option<f32>,
    /// Text size
    pub font_size: Option<f32>,
    /// Text font
    pub font: Option<ContentHandle>,
}

impl StyleValues {
    /// Empty value set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: main color
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = Some(color);
        self
    }

    /// Builder pattern: image or sprite content
    pub fn with_content(mut self, content: ContentHandle) -> Self {
        self.content = Some(content);
        self
    }

    /// Builder pattern: panel border
    pub fn with_border(mut self, color: Vec4, width: f32) -> Self {
        self.border_color = Some(color);
        self.border_width = Some(width);
        self
    }

    /// Builder pattern: panel corner radius
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    /// Builder pattern: text size
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Builder pattern: text font
    pub fn with_font(mut self, font: ContentHandle) -> Self {
        self.font = Some(font);
        self
    }

    /// Copy the values that fit the payload variant into it
    pub fn apply_to(&self, payload: &mut RenderPayload) {
        if let Some(color) = self.color {
            payload.set_color(color);
        }
        if let Some(content) = self.content {
            payload.set_content(content);
        }
        match payload {
            RenderPayload::Panel { border_color, border_width, corner_radius, .. } => {
                if let Some(color) = self.border_color {
                    *border_color = color;
                }
                if let Some(width) = self.border_width {
                    *border_width = width;
                }
                if let Some(radius) = self.corner_radius {
                    *corner_radius = radius;
                }
            }
            RenderPayload::Text { font_size, font, .. } => {
                if let Some(size) = self.font_size {
                    *font_size = size;
                }
                if self.font.is_some() {
                    *font = self.font;
                }
            }
            _ => {}
        }
    }
}

/// Style lookup table owned by a dispatcher
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    entries: HashMap<StyleKey, StyleValues>,
}

impl StyleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the replaced values
    pub fn register(
        &mut self,
        name: impl Into<String>,
        category: ElementCategory,
        state: InteractionState,
        values: StyleValues,
    ) -> Option<StyleValues> {
        let key = StyleKey { name: name.into(), category, state };
        trace!("Registering style {:?}", key);
        self.entries.insert(key, values)
    }

    /// Look up an entry
    pub fn get(&self, name: &str, category: &ElementCategory, state: InteractionState) -> Option<&StyleValues> {
        // HashMap<StyleKey, _> cannot be queried by borrowed parts, so build the key
        let key = StyleKey { name: name.to_owned(), category: category.clone(), state };
        self.entries.get(&key)
    }

    /// Remove an entry
    pub fn remove(&mut self, name: &str, category: &ElementCategory, state: InteractionState) -> Option<StyleValues> {
        let key = StyleKey { name: name.to_owned(), category: category.clone(), state };
        self.entries.remove(&key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy the entry for (`name`, node category, `state`) into the node's payload
    pub fn apply(&self, tree: &mut ElementTree, id: NodeId, name: &str, state: InteractionState) -> UiResult<()> {
        let node = tree.get(id).ok_or(UiError::UnknownNode(id))?;
        let category = node.category();
        let values = self.get(name, &category, state).ok_or_else(|| UiError::UnknownStyle {
            name: name.to_owned(),
            category: category.clone(),
            state,
        })?;
        tree.update_payload(id, |payload| values.apply_to(payload))
    }
}
