//! HTTP boundary: the platform's webhook and a few operational endpoints

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::{RuntimeManager, SessionLifecycle};
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
}

impl AppState {
    pub fn new(lifecycle: SessionLifecycle, worker_idle_timeout: Duration) -> Self {
        Self {
            runtime: Arc::new(RuntimeManager::new(lifecycle, worker_idle_timeout)),
        }
    }
}
