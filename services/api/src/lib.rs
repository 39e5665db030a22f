//! Hirevox API Library Crate
//!
//! This library contains the web service for the voice interview relay:
//! application state, configuration, routing, and the WebSocket session
//! handling. The `api` binary is a thin wrapper around this library.

pub mod config;
pub mod router;
pub mod state;
pub mod ws;
