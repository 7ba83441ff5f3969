// Application state module
// Immutable after startup, shared by every connection

use super::types::Config;
use crate::routing::Router;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    pub const fn new(config: Config, router: Router) -> Self {
        Self { config, router }
    }
}
