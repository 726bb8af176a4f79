//! Shared application state for request handlers.

use crate::artifacts::Artifacts;

/// Shared application state, cloneable across handlers.
///
/// The artifacts are `Arc`-wrapped and read-only after startup, so handlers
/// use them without any locking.
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Artifacts,
}

impl AppState {
    pub fn new(artifacts: Artifacts) -> Self {
        Self { artifacts }
    }
}
