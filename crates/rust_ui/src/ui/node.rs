//! Element tree nodes
//!
//! A node is a bag of optional capabilities (layout descriptor, layout group,
//! interactive state, event handlers) around a placement and a render payload.
//! Behaviour comes from which capabilities are present, not from a type
//! hierarchy.

use std::cell::Cell;
use std::fmt;

use bitflags::bitflags;

use super::input::{InputEvent, EventContext, NodeHandler};
use super::layout::{LayoutElement, LayoutGroup, SizeContract};
use super::placement::{HorizontalAlign, Placement, VerticalAlign};
use super::style::InteractionState;
use super::NodeId;
use crate::foundation::math::{colors, Rect, Vec2, Vec4};

bitflags! {
    /// Per-node switches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree are drawn and hit-tested
        const VISIBLE = 1 << 0;
        /// Node itself is a hit-test candidate
        const INTERACTIVE = 1 << 1;
        /// Node and its subtree are skipped by hit-testing
        const IGNORE_INPUT = 1 << 2;
        /// Parent layout group leaves this node alone
        const IGNORE_LAYOUT = 1 << 3;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Opaque handle to host content (image, sprite sheet frame, font)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHandle(pub u64);

/// Element category used as part of the style key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    /// Payload-less container
    Container,
    /// Solid panel
    Panel,
    /// Image
    Image,
    /// Text label
    Text,
    /// Vector primitive
    Primitive,
    /// Sprite
    Sprite,
    /// Host-defined category (e.g. "Button")
    Named(String),
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => f.write_str("Container"),
            Self::Panel => f.write_str("Panel"),
            Self::Image => f.write_str("Image"),
            Self::Text => f.write_str("Text"),
            Self::Primitive => f.write_str("Primitive"),
            Self::Sprite => f.write_str("Sprite"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Backend-visible render data of a node
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPayload {
    /// Nothing to draw
    Empty,
    /// Colored rectangle with optional border
    Panel {
        /// Background color (RGBA)
        color: Vec4,
        /// Border color (RGBA), if border_width > 0
        border_color: Vec4,
        /// Border width in pixels
        border_width: f32,
        /// Corner rounding radius (0 = sharp corners)
        corner_radius: f32,
    },
    /// Textured rectangle
    Image {
        /// Image content
        content: Option<ContentHandle>,
        /// Multiplied color
        tint: Vec4,
    },
    /// Text label
    Text {
        /// Text content to display
        text: String,
        /// Font content, backend default when `None`
        font: Option<ContentHandle>,
        /// Font size in pixels
        font_size: f32,
        /// Text color (RGBA)
        color: Vec4,
        /// Horizontal alignment within the node
        h_align: HorizontalAlign,
        /// Vertical alignment within the node
        v_align: VerticalAlign,
    },
    /// Filled polygon; points are normalized to the node rectangle
    Primitive {
        /// Polygon outline, (0,0) = top-left and (1,1) = bottom-right
        points: Vec<Vec2>,
        /// Fill color
        color: Vec4,
    },
    /// Sprite renderer data
    Sprite {
        /// Sprite frame
        content: Option<ContentHandle>,
        /// Multiplied color
        tint: Vec4,
        /// Mirror horizontally
        flip_x: bool,
        /// Mirror vertically
        flip_y: bool,
        /// Coarse sorting layer, lower draws first
        sorting_layer: i32,
    },
}

impl Default for RenderPayload {
    fn default() -> Self {
        Self::Empty
    }
}

impl RenderPayload {
    /// Solid panel with no border
    pub fn panel(color: Vec4) -> Self {
        Self::Panel {
            color,
            border_color: colors::white(),
            border_width: 0.0,
            corner_radius: 0.0,
        }
    }

    /// Image with a white tint
    pub fn image(content: ContentHandle) -> Self {
        Self::Image { content: Some(content), tint: colors::white() }
    }

    /// Top-left aligned text label
    pub fn text(text: impl Into<String>, font_size: f32) -> Self {
        Self::Text {
            text: text.into(),
            font: None,
            font_size,
            color: colors::white(),
            h_align: HorizontalAlign::Left,
            v_align: VerticalAlign::Top,
        }
    }

    /// Sprite on the default sorting layer
    pub fn sprite(content: ContentHandle) -> Self {
        Self::Sprite {
            content: Some(content),
            tint: colors::white(),
            flip_x: false,
            flip_y: false,
            sorting_layer: 0,
        }
    }

    /// Filled polygon
    pub fn primitive(points: Vec<Vec2>, color: Vec4) -> Self {
        Self::Primitive { points, color }
    }

    /// Category derived from the payload variant
    pub fn category(&self) -> ElementCategory {
        match self {
            Self::Empty => ElementCategory::Container,
            Self::Panel { .. } => ElementCategory::Panel,
            Self::Image { .. } => ElementCategory::Image,
            Self::Text { .. } => ElementCategory::Text,
            Self::Primitive { .. } => ElementCategory::Primitive,
            Self::Sprite { .. } => ElementCategory::Sprite,
        }
    }

    /// Main color of the payload
    pub fn color(&self) -> Option<Vec4> {
        match self {
            Self::Empty => None,
            Self::Panel { color, .. } | Self::Text { color, .. } | Self::Primitive { color, .. } => Some(*color),
            Self::Image { tint, .. } | Self::Sprite { tint, .. } => Some(*tint),
        }
    }

    /// Overwrite the main color; returns false for payloads without one
    pub fn set_color(&mut self, value: Vec4) -> bool {
        match self {
            Self::Empty => false,
            Self::Panel { color, .. } | Self::Text { color, .. } | Self::Primitive { color, .. } => {
                *color = value;
                true
            }
            Self::Image { tint, .. } | Self::Sprite { tint, .. } => {
                *tint = value;
                true
            }
        }
    }

    /// Referenced image or sprite content
    pub fn content(&self) -> Option<ContentHandle> {
        match self {
            Self::Image { content, .. } | Self::Sprite { content, .. } => *content,
            _ => None,
        }
    }

    /// Swap the referenced content; returns false for payloads without one
    pub fn set_content(&mut self, value: ContentHandle) -> bool {
        match self {
            Self::Image { content, .. } | Self::Sprite { content, .. } => {
                *content = Some(value);
                true
            }
            _ => false,
        }
    }
}

/// Interactive capability: pointer state machine and optional auto-styling
#[derive(Debug, Clone, PartialEq)]
pub struct Interactive {
    /// Disabled nodes still block hits but never enter hovered/pressed
    pub enabled: bool,
    /// Current interaction state
    pub state: InteractionState,
    /// Style re-applied on every state change
    pub style: Option<String>,
    /// Take input capture on press, release it on pointer up
    pub capture_on_press: bool,
    /// Take keyboard focus on press
    pub focusable: bool,
}

impl Default for Interactive {
    fn default() -> Self {
        Self {
            enabled: true,
            state: InteractionState::Normal,
            style: None,
            capture_on_press: true,
            focusable: true,
        }
    }
}

impl Interactive {
    /// Interactive capability that re-applies `style` on state changes
    pub fn styled(style: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            ..Self::default()
        }
    }

    /// State the node should show, taking `enabled` into account
    pub fn effective_state(&self) -> InteractionState {
        if self.enabled { self.state } else { InteractionState::Disabled }
    }
}

/// The addressable unit of the element tree
pub struct ElementNode {
    pub(crate) id: NodeId,
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) placement: Placement,
    pub(crate) flags: NodeFlags,
    pub(crate) category: Option<ElementCategory>,
    pub(crate) layout_element: Option<LayoutElement>,
    pub(crate) layout_group: Option<LayoutGroup>,
    pub(crate) interactive: Option<Interactive>,
    pub(crate) payload: RenderPayload,
    pub(crate) handlers: Vec<NodeHandler>,

    // Derived state owned by the tree
    pub(crate) world: Cell<Option<Rect>>,
    pub(crate) layout_dirty: bool,
    pub(crate) render_dirty: bool,
    pub(crate) measured: Option<SizeContract>,
    pub(crate) allocated: Option<Vec2>,
}

impl ElementNode {
    /// Create a visible, stretched node with the given payload
    pub fn new(payload: RenderPayload) -> Self {
        Self {
            id: NodeId::default(),
            name: None,
            parent: None,
            children: Vec::new(),
            placement: Placement::default(),
            flags: NodeFlags::default(),
            category: None,
            layout_element: None,
            layout_group: None,
            interactive: None,
            payload,
            handlers: Vec::new(),
            world: Cell::new(None),
            layout_dirty: true,
            render_dirty: true,
            measured: None,
            allocated: None,
        }
    }

    /// Payload-less container
    pub fn container() -> Self {
        Self::new(RenderPayload::Empty)
    }

    /// Builder pattern: debug name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder pattern: placement
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Builder pattern: size contract for the parent group
    pub fn with_layout_element(mut self, element: LayoutElement) -> Self {
        self.layout_element = Some(element);
        self
    }

    /// Builder pattern: arrange children with a layout group
    pub fn with_layout_group(mut self, group: LayoutGroup) -> Self {
        self.layout_group = Some(group);
        self
    }

    /// Builder pattern: make the node a hit-test candidate with a state machine
    pub fn with_interactive(mut self, interactive: Interactive) -> Self {
        self.interactive = Some(interactive);
        self.flags.insert(NodeFlags::INTERACTIVE);
        self
    }

    /// Builder pattern: override the style category
    pub fn with_category(mut self, category: ElementCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Builder pattern: start hidden
    pub fn hidden(mut self) -> Self {
        self.flags.remove(NodeFlags::VISIBLE);
        self
    }

    /// Builder pattern: exclude from the parent's layout group
    pub fn ignore_layout(mut self) -> Self {
        self.flags.insert(NodeFlags::IGNORE_LAYOUT);
        self
    }

    /// Builder pattern: exclude this subtree from hit-testing
    pub fn ignore_input(mut self) -> Self {
        self.flags.insert(NodeFlags::IGNORE_INPUT);
        self
    }

    /// Builder pattern: add an input handler
    pub fn on_event<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&InputEvent, &mut EventContext<'_>) + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Stable identifier (null until registered)
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Debug name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in sibling order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent-relative placement
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Node switches
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Whether the node's own visibility flag is set
    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    /// Whether the node is a hit-test candidate
    pub fn is_interactive(&self) -> bool {
        self.flags.contains(NodeFlags::INTERACTIVE)
    }

    /// Style category (override or derived from the payload)
    pub fn category(&self) -> ElementCategory {
        self.category.clone().unwrap_or_else(|| self.payload.category())
    }

    /// Size contract descriptor
    pub fn layout_element(&self) -> Option<&LayoutElement> {
        self.layout_element.as_ref()
    }

    /// Layout group arranging the children
    pub fn layout_group(&self) -> Option<&LayoutGroup> {
        self.layout_group.as_ref()
    }

    /// Interactive capability
    pub fn interactive(&self) -> Option<&Interactive> {
        self.interactive.as_ref()
    }

    /// Current interaction state, `Normal` for non-interactive nodes
    pub fn interaction_state(&self) -> InteractionState {
        self.interactive
            .as_ref()
            .map_or(InteractionState::Normal, Interactive::effective_state)
    }

    /// Render payload
    pub fn payload(&self) -> &RenderPayload {
        &self.payload
    }

    /// Size allocated by the last layout pass
    pub fn allocated_size(&self) -> Option<Vec2> {
        self.allocated
    }

    /// Whether the node waits for the next layout pass
    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    /// Copy the declarative parts of `other` into this node
    ///
    /// Tree links, derived state and the interaction state survive, so a node
    /// re-declared every frame keeps its hover, press and focus.
    pub(crate) fn refresh_from(&mut self, other: ElementNode) -> RefreshOutcome {
        let layout_changed = self.placement != other.placement
            || self.layout_element != other.layout_element
            || self.layout_group != other.layout_group
            || self.flags.contains(NodeFlags::IGNORE_LAYOUT) != other.flags.contains(NodeFlags::IGNORE_LAYOUT)
            || (self.layout_element.is_none() && self.payload.content() != other.payload.content());
        let render_changed = layout_changed
            || self.payload != other.payload
            || self.flags != other.flags;

        self.name = other.name;
        self.placement = other.placement;
        self.flags = other.flags;
        self.category = other.category;
        self.layout_element = other.layout_element;
        self.layout_group = other.layout_group;
        self.payload = other.payload;
        self.handlers = other.handlers;
        self.interactive = match (self.interactive.take(), other.interactive) {
            (Some(previous), Some(mut declared)) => {
                declared.state = previous.state;
                Some(declared)
            }
            (_, declared) => declared,
        };

        RefreshOutcome { layout_changed, render_changed }
    }
}

/// What changed when a node was refreshed from a new declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RefreshOutcome {
    pub layout_changed: bool,
    pub render_changed: bool,
}

impl fmt::Debug for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementNode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("placement", &self.placement)
            .field("flags", &self.flags)
            .field("payload", &self.payload)
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}
