pub mod analysis;
pub mod gateway;
pub mod orchestrator;
pub mod pacing;
pub mod prompt;
pub mod sanitize;
pub mod session;

use session::Turn;

/// Represents outbound notifications the core issues to an external runtime.
///
/// This enum is the primary API for decoupling the interview state machine
/// from the transport that delivers its output (a WebSocket connection in
/// the bundled service). The runtime maps each variant onto its own wire
/// protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A spoken turn for the client, with a speech-markup envelope for TTS.
    Speak { text: String, ssml: String },
    /// A recoverable error surfaced to the client.
    Error { msg: String },
    /// The interview is over; carries the full accepted-answer history.
    Completed { history: Vec<Turn> },
}
