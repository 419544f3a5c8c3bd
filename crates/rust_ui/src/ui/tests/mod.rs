//! Whole-pipeline scenarios driven through the dispatcher

mod effect_scenarios;
mod layout_scenarios;

use crate::foundation::math::colors;
use crate::ui::backends::RecordingBackend;
use crate::ui::dispatcher::Dispatcher;
use crate::ui::node::{ElementNode, Interactive, RenderPayload};
use crate::ui::placement::Placement;

/// Dispatcher over a recording backend with an 800x600 viewport
pub(super) fn recording_dispatcher() -> Dispatcher<RecordingBackend> {
    Dispatcher::new(RecordingBackend::with_viewport(800.0, 600.0))
}

/// Interactive white panel at a fixed rectangle
pub(super) fn button_at(x: f32, y: f32, width: f32, height: f32) -> ElementNode {
    ElementNode::new(RenderPayload::panel(colors::white()))
        .with_placement(Placement::absolute(x, y, width, height))
        .with_interactive(Interactive::default())
}
