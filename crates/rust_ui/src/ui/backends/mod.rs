//! Render backend implementations
//!
//! - `ElementBackend`: retained-mode widget renderer with per-node caching
//! - `ImmediateBackend`: immediate-mode renderer, regenerated every frame
//! - `SpriteBackend`: sprite renderer driver with sorting layers
//! - `RecordingBackend`: records render items for tests and headless hosts

mod element;
mod immediate;
mod recording;
mod sprite;

pub use element::ElementBackend;
pub use immediate::ImmediateBackend;
pub use recording::{RecordedItem, RecordingBackend};
pub use sprite::{SpriteBackend, SpriteDraw};
