//! Manages the WebSocket connection lifecycle for an interview session.

use super::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use hirevox_core::orchestrator::StartRequest;
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Main handler for an individual WebSocket connection.
///
/// Each connection is one interview session: the session id is minted here,
/// lives for the duration of the socket, and is destroyed when the socket
/// goes away.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    let span = info_span!("interview_session", %session_id);
    async move {
        info!("New WebSocket connection.");
        if let Err(e) = run_session(socket, &state, session_id).await {
            error!(error = ?e, "Session loop terminated with error.");
        }
        state.orchestrator.disconnect(session_id).await;
        info!("WebSocket connection closed.");
    }
    .instrument(span)
    .await
}

/// The main event loop for an active WebSocket connection.
///
/// Inbound frames are handled strictly one at a time, so a session never has
/// two answer events in flight concurrently.
async fn run_session(socket: WebSocket, state: &Arc<AppState>, session_id: Uuid) -> Result<()> {
    let (mut socket_tx, mut socket_rx): (SplitSink<WebSocket, Message>, SplitStream<WebSocket>) =
        socket.split();

    while let Some(msg_result) = socket_rx.next().await {
        let ws_msg = match msg_result {
            Ok(msg) => msg,
            Err(e) => {
                error!("Error receiving from client WebSocket: {:?}", e);
                break;
            }
        };
        match ws_msg {
            Message::Text(text) => {
                let msg = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => msg,
                    Err(_) => {
                        warn!("Ignoring malformed client message.");
                        continue;
                    }
                };
                let events = match msg {
                    ClientMessage::StartVoiceInterview {
                        api_key,
                        provider,
                        job_role,
                        job_desc,
                    } => {
                        state
                            .orchestrator
                            .start(
                                session_id,
                                StartRequest {
                                    api_key,
                                    provider,
                                    job_role,
                                    job_desc,
                                },
                            )
                            .await
                    }
                    ClientMessage::UserSpoke { text } => {
                        state.orchestrator.answer(session_id, &text).await
                    }
                };
                for event in events {
                    send_msg(&mut socket_tx, event.into()).await?;
                }
            }
            Message::Close(_) => {
                info!("Client sent close frame. Shutting down session.");
                break;
            }
            Message::Binary(_) => warn!("Ignoring unexpected binary frame."),
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
    Ok(())
}

/// A helper function to serialize and send a `ServerMessage` to the client.
pub(crate) async fn send_msg(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
