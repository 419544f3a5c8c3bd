//! Dispatcher settings

use serde::{Serialize, Deserialize};

use super::{Config, ConfigError};
use crate::foundation::math::Vec2;

/// # UI Configuration
///
/// Settings shared by every dispatcher regardless of backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Log filter passed to `env_logger` (e.g. `"info"`, `"rust_ui=debug"`)
    pub log_filter: String,
    /// Root allocation used while the backend reports no viewport
    pub default_viewport: [f32; 2],
    /// Log a diagnostic when a layout group runs out of space
    pub overflow_diagnostics: bool,
    /// Upper bound on input events routed per tick (extra events are dropped)
    pub max_input_events_per_tick: Option<usize>,
}

impl UiConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            log_filter: "info".to_string(),
            default_viewport: [800.0, 600.0],
            overflow_diagnostics: true,
            max_input_events_per_tick: None,
        }
    }

    /// Set the log filter
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Set the fallback viewport size
    pub fn with_default_viewport(mut self, width: f32, height: f32) -> Self {
        self.default_viewport = [width, height];
        self
    }

    /// Enable or disable overflow diagnostics
    pub fn with_overflow_diagnostics(mut self, enabled: bool) -> Self {
        self.overflow_diagnostics = enabled;
        self
    }

    /// Cap the number of input events routed per tick
    pub fn with_max_input_events(mut self, max: usize) -> Self {
        self.max_input_events_per_tick = Some(max);
        self
    }

    /// Fallback viewport as a vector
    pub fn default_viewport_size(&self) -> Vec2 {
        Vec2::new(self.default_viewport[0], self.default_viewport[1])
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [width, height] = self.default_viewport;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "default viewport must be positive, got {}x{}",
                width, height
            )));
        }

        if self.max_input_events_per_tick == Some(0) {
            return Err(ConfigError::Invalid(
                "max input events per tick must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for UiConfig {}
