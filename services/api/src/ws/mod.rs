//! WebSocket Session Handling
//!
//! This module carries the real-time interview conversation:
//!
//! - `protocol`: Defines the JSON-based message format for client-server communication.
//! - `session`: Manages the WebSocket connection lifecycle, from upgrade to termination.

pub mod protocol;
pub mod session;

pub use session::ws_handler;
