//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the UI core:
//! - Math types (vectors, colors, rectangles)
//! - Frame timing for hosts that do not keep their own clock
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
