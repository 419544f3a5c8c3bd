//! UI rendering module
//!
//! Backend-agnostic draw data shared by the render backends

pub mod batch;
pub mod commands;
pub mod geometry;
pub mod vertex;

pub use batch::{BatchDraw, RenderBatch, TextDraw};
pub use commands::{commands_for, DrawCommand};
pub use vertex::{PanelVertex, UIVertex};
