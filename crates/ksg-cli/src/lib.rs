//! Ksheersagar survey terminal front-end
//!
//! The rendering side of the survey: it draws each step, writes answers into
//! the session and hands transitions to the step controller. Configuration
//! and logging setup live here as well.

pub mod config;
pub mod render;

pub use config::AppConfig;
pub use render::{Clock, Exit, Terminal};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` wins over the configured filter.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
