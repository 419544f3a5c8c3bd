//! UI error taxonomy
//!
//! Every variant is local and recoverable: the operation that produced it
//! did nothing, and the dispatcher keeps running.

use thiserror::Error;

use super::style::InteractionState;
use super::{ElementCategory, NodeId};
use crate::foundation::math::Axis;

/// Errors reported by dispatcher operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    /// The requested parent is not registered
    #[error("parent node {0:?} is not registered")]
    InvalidParent(NodeId),

    /// The node is not registered
    #[error("node {0:?} is not registered")]
    UnknownNode(NodeId),

    /// No style entry matches (name, category, state)
    #[error("no style '{name}' for category {category} in state {state:?}")]
    UnknownStyle {
        /// Style name
        name: String,
        /// Category of the node the style was applied to
        category: ElementCategory,
        /// Requested interaction state
        state: InteractionState,
    },

    /// A layout descriptor has min greater than preferred
    #[error("invalid {axis} layout constraint: min {min} exceeds preferred {preferred}")]
    InvalidLayoutConstraint {
        /// Offending axis
        axis: Axis,
        /// Supplied minimum size
        min: f32,
        /// Supplied preferred size
        preferred: f32,
    },

    /// The render backend failed during the render phase
    #[error("render backend failure: {0}")]
    Backend(String),
}

/// Result type for UI operations
pub type UiResult<T> = Result<T, UiError>;
