//! # Rust UI
//!
//! A 2D user-interface core shared by three presentation backends.
//!
//! ## Features
//!
//! - **One Dispatcher**: route input, advance effects, lay out, render
//! - **Constraint Layout**: min/preferred/flexible contracts with horizontal,
//!   vertical and grid groups
//! - **Styles and Effects**: registry-driven styling and time-based tweens
//! - **Interactive Router**: hit-testing, capture, hover, press and focus
//! - **Backends**: retained element UI, immediate-mode UI, sprite driver
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_ui::prelude::*;
//!
//! fn main() -> Result<(), UiError> {
//!     let mut ui = ElementDispatcher::new(ElementBackend::with_surface_size(800.0, 600.0));
//!
//!     let row = ui.register(
//!         ElementNode::container().with_layout_group(LayoutGroup::horizontal().with_spacing(8.0)),
//!         None,
//!     )?;
//!     ui.register(
//!         ElementNode::new(RenderPayload::panel(colors::white()))
//!             .with_layout_element(LayoutElement::default().with_preferred(120.0, 40.0))
//!             .with_interactive(Interactive::default()),
//!         Some(row),
//!     )?;
//!
//!     let report = ui.tick(0.016, [InputEvent::pointer_move(10.0, 10.0)])?;
//!     println!("drew {} nodes", report.drawn);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod events;
pub mod foundation;
pub mod ui;

/// Common imports for UI hosts
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, UiConfig},
        events::{Event, EventArg, EventSystem, EventType},
        foundation::{
            math::{colors, Rect, Vec2, Vec4},
            time::FrameTimer,
        },
        ui::{
            Anchor, BackendError, Completion, ContentHandle, ContentProvider, Curve, Dispatcher,
            EffectHandle, EffectKind, EffectParams, ElementBackend, ElementCategory, ElementDispatcher,
            ElementNode, FrameReport, ImmediateBackend, ImmediateDispatcher, InputEvent, InputKind,
            Interactive, InteractionState, Key, LayoutElement, LayoutGroup, MouseButton, NodeFlags,
            NodeId, Padding, Placement, RenderBackend, RenderPayload, SpriteBackend, SpriteDispatcher,
            StyleValues, UiError, UiResult,
        },
    };
}
