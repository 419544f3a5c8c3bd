//! UI input routing
//!
//! Input events arrive from the host in UI space, are resolved to a target
//! node by the [`InputRouter`] and delivered to that node's handlers only.
//! There is no implicit bubbling to ancestors.

mod context;
mod event;
mod router;

pub use context::EventContext;
pub(crate) use context::{set_enabled, set_flag, set_visible};
pub use event::{InputEvent, InputKind, Key, MouseButton};
pub use router::InputRouter;

/// Handler attached to a node with [`ElementNode::on_event`](crate::ui::ElementNode::on_event)
pub type NodeHandler = Box<dyn FnMut(&InputEvent, &mut EventContext<'_>)>;
