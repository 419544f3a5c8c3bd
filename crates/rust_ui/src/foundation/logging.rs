//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use crate::config::UiConfig;

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with the filter from a [`UiConfig`]
///
/// `RUST_LOG` still takes precedence when it is set. Calling this twice is
/// harmless; the second initialization is ignored.
pub fn init_with_filter(config: &UiConfig) {
    let env = env_logger::Env::default().default_filter_or(config.log_filter.as_str());
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing filter");
    }
}
