//! Per-interview session records and the live-session store.

use crate::analysis::Sentiment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Number of accepted answers before an interview closes, unless overridden.
pub const DEFAULT_TURN_LIMIT: u32 = 5;

/// Minimum sanitized answer length, in characters, for a turn to count.
pub const MIN_ANSWER_LEN: usize = 5;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A start request was missing the credential, role title, or description.
    #[error("Please provide API key, job role, and description.")]
    MissingFields,
    /// The session id does not resolve to a live interview.
    #[error("Session expired. Please restart the interview.")]
    NotFound,
    /// The sanitized answer was empty or below the minimum length.
    #[error("unintelligible answer")]
    Unintelligible,
}

/// One accepted answer plus its derived signals. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub answer: String,
    pub sentiment: Sentiment,
    pub vague: bool,
    pub confident: bool,
}

/// Server-side state for one ongoing interview, tied to one connection.
///
/// Owned exclusively by the orchestrator for its lifetime; `history` and
/// `sentiment_trend` are append-only and stay the same length as
/// `turns_completed`.
#[derive(Clone)]
pub struct Session {
    pub id: Uuid,
    credential: String,
    pub provider: String,
    pub job_role: String,
    pub job_desc: String,
    pub turns_completed: u32,
    pub turn_limit: u32,
    pub history: Vec<Turn>,
    pub sentiment_trend: Vec<Sentiment>,
}

impl Session {
    /// Creates a session from already-sanitized start fields.
    ///
    /// Rejects an empty credential, role title, or role description.
    pub fn new(
        id: Uuid,
        credential: String,
        provider: String,
        job_role: String,
        job_desc: String,
        turn_limit: u32,
    ) -> Result<Self, SessionError> {
        if credential.trim().is_empty() || job_role.is_empty() || job_desc.is_empty() {
            return Err(SessionError::MissingFields);
        }
        Ok(Self {
            id,
            credential,
            provider,
            job_role,
            job_desc,
            turns_completed: 0,
            turn_limit: turn_limit.max(1),
            history: Vec::new(),
            sentiment_trend: Vec::new(),
        })
    }

    /// The caller-supplied API credential. Never logged, never echoed back.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Appends an accepted turn and advances the counter.
    ///
    /// Rejects answers below [`MIN_ANSWER_LEN`] without mutating anything.
    pub fn push_turn(&mut self, turn: Turn) -> Result<u32, SessionError> {
        if turn.answer.trim().chars().count() < MIN_ANSWER_LEN {
            return Err(SessionError::Unintelligible);
        }
        self.sentiment_trend.push(turn.sentiment);
        self.history.push(turn);
        self.turns_completed += 1;
        Ok(self.turns_completed)
    }

    /// True once the turn limit has been reached and the session must retire.
    pub fn is_exhausted(&self) -> bool {
        self.turns_completed >= self.turn_limit
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("credential", &"<redacted>")
            .field("provider", &self.provider)
            .field("job_role", &self.job_role)
            .field("turns_completed", &self.turns_completed)
            .field("turn_limit", &self.turn_limit)
            .finish_non_exhaustive()
    }
}

/// In-memory mapping from session id to live interview state.
///
/// Each session sits behind its own async mutex, so answer events for one
/// session serialize for their full processing span while distinct sessions
/// proceed in parallel. The store itself only guards insert/lookup/remove.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new live session and returns its shared handle.
    pub async fn create(&self, session: Session) -> Arc<Mutex<Session>> {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    /// Looks up a live session by id.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Retires a session, removing it from the live set.
    pub async fn remove(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.write().await.remove(&id)
    }
}
