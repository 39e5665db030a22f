//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources handed to the router and WebSocket handlers.

use hirevox_core::orchestrator::InterviewOrchestrator;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<InterviewOrchestrator>,
}
