//! The interview state machine: start, per-turn processing, completion.
//!
//! A session only exists while it is active: completion is represented by
//! removal from the store plus a final [`Event::Completed`] notification.
//! Gateway failures are forwarded to the client as reply text and never
//! retried; a turn that fails validation never touches session state or the
//! gateway.

use crate::{
    Event, analysis,
    gateway::LlmGateway,
    pacing, prompt,
    sanitize::sanitize_input,
    session::{Session, SessionError, SessionStore, Turn},
};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const GREETING_PAUSE_MS: u32 = 600;
const RETRY_PAUSE_MS: u32 = 600;
const CLOSING_PAUSE_MS: u32 = 800;
const REPLY_PAUSE_MS: RangeInclusive<u32> = 400..=800;

const DEFAULT_PROVIDER: &str = "groq";
const RETRY_TEXT: &str = "I didn't quite catch that. Could you say it again a bit more clearly?";
const CLOSING_CODA: &str = " That's all the questions I have for today. Thank you so much for your time—your insights were really valuable!";

/// Wraps text in a speech-markup envelope with a trailing pause directive.
fn ssml(text: &str, pause_ms: u32) -> String {
    format!("<speak>{text}<break time=\"{pause_ms}ms\"/></speak>")
}

fn speak(text: String, pause_ms: u32) -> Event {
    Event::Speak {
        ssml: ssml(&text, pause_ms),
        text,
    }
}

/// Inputs for the start event. Deliberately not `Debug`: it carries the
/// caller's credential.
pub struct StartRequest {
    pub api_key: String,
    pub provider: String,
    pub job_role: String,
    pub job_desc: String,
}

/// Drives interview session lifecycles against an injected session store and
/// LLM gateway.
pub struct InterviewOrchestrator {
    store: Arc<SessionStore>,
    gateway: Arc<dyn LlmGateway>,
    turn_limit: u32,
}

impl InterviewOrchestrator {
    pub fn new(store: Arc<SessionStore>, gateway: Arc<dyn LlmGateway>, turn_limit: u32) -> Self {
        Self {
            store,
            gateway,
            turn_limit,
        }
    }

    /// Handles a start event: validates the fields, registers the session,
    /// and emits the greeting.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn start(&self, session_id: Uuid, req: StartRequest) -> Vec<Event> {
        let provider = {
            let name = req.provider.trim().to_lowercase();
            if name.is_empty() {
                DEFAULT_PROVIDER.to_string()
            } else {
                name
            }
        };
        let session = match Session::new(
            session_id,
            req.api_key.trim().to_string(),
            provider,
            sanitize_input(&req.job_role),
            sanitize_input(&req.job_desc),
            self.turn_limit,
        ) {
            Ok(session) => session,
            Err(e) => {
                warn!("start request rejected: missing fields");
                return vec![Event::Error { msg: e.to_string() }];
            }
        };

        let greeting = format!(
            "Hello! Welcome to your {} interview. I'm really looking forward to learning more \
             about you. To get us started—could you tell me a bit about yourself and your background?",
            session.job_role
        );
        info!(job_role = %session.job_role, provider = %session.provider, "interview started");
        self.store.create(session).await;
        vec![speak(greeting, GREETING_PAUSE_MS)]
    }

    /// Handles an answer event for a live session.
    ///
    /// The session's mutex is held for the whole processing span, so answers
    /// within one session are strictly serialized; the pacing sleep inside is
    /// cooperative and never stalls other sessions.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn answer(&self, session_id: Uuid, raw_text: &str) -> Vec<Event> {
        let Some(handle) = self.store.get(session_id).await else {
            warn!("answer for unknown or expired session");
            return vec![Event::Error {
                msg: SessionError::NotFound.to_string(),
            }];
        };
        let mut session = handle.lock().await;

        let answer = sanitize_input(raw_text);
        let signals = analysis::analyze(&answer);
        let turn = Turn {
            answer,
            sentiment: signals.sentiment,
            vague: signals.vague,
            confident: signals.confident,
        };
        // The length check lives in `push_turn`, so the re-prompt fires before
        // the pacing sleep and never after it.
        let turns_completed = match session.push_turn(turn.clone()) {
            Ok(n) => n,
            Err(_) => {
                info!("answer too short, asking the candidate to repeat");
                return vec![speak(RETRY_TEXT.to_string(), RETRY_PAUSE_MS)];
            }
        };

        tokio::time::sleep(pacing::thinking_delay(&turn.answer, signals.vague)).await;

        let prompts = prompt::compose(&session, &turn);
        let reply = match self
            .gateway
            .generate_reply(
                session.credential(),
                &prompts.user,
                &prompts.system,
                &session.provider,
            )
            .await
        {
            Ok(text) => text,
            // Error text stands in for the reply; the client cannot tell the
            // difference and no retry happens.
            Err(e) => e.to_string(),
        };

        if session.is_exhausted() {
            let closing = format!("{reply}{CLOSING_CODA}");
            let history = session.history.clone();
            drop(session);
            self.store.remove(session_id).await;
            info!(turns_completed, "interview complete, session retired");
            return vec![
                speak(closing, CLOSING_PAUSE_MS),
                Event::Completed { history },
            ];
        }

        info!(turns_completed, "turn accepted, continuing interview");
        vec![speak(reply, rand::random_range(REPLY_PAUSE_MS))]
    }

    /// Destroys the session when the underlying connection terminates.
    pub async fn disconnect(&self, session_id: Uuid) {
        if self.store.remove(session_id).await.is_some() {
            info!(%session_id, "session removed on disconnect");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, MockLlmGateway};

    fn start_request() -> StartRequest {
        StartRequest {
            api_key: "test-key".into(),
            provider: "groq".into(),
            job_role: "Backend Engineer".into(),
            job_desc: "Design and run the billing platform.".into(),
        }
    }

    fn orchestrator(gateway: MockLlmGateway) -> (InterviewOrchestrator, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::new());
        let orchestrator = InterviewOrchestrator::new(store.clone(), Arc::new(gateway), 5);
        (orchestrator, store)
    }

    #[tokio::test]
    async fn start_emits_greeting_mentioning_the_role() {
        let (orchestrator, store) = orchestrator(MockLlmGateway::new());
        let id = Uuid::new_v4();
        let events = orchestrator.start(id, start_request()).await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::Speak { text, ssml } => {
                assert!(text.contains("Backend Engineer"));
                assert!(ssml.starts_with("<speak>"));
                assert!(ssml.contains("<break time=\"600ms\"/>"));
            }
            other => panic!("expected greeting, got {other:?}"),
        }
        assert!(store.get(id).await.is_some());
    }

    #[tokio::test]
    async fn start_rejects_missing_fields_without_registering() {
        let (orchestrator, store) = orchestrator(MockLlmGateway::new());
        let id = Uuid::new_v4();
        let events = orchestrator
            .start(
                id,
                StartRequest {
                    api_key: "".into(),
                    ..start_request()
                },
            )
            .await;

        match &events[0] {
            Event::Error { msg } => assert!(msg.contains("API key")),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn answer_for_unknown_session_reports_expired() {
        let (orchestrator, _) = orchestrator(MockLlmGateway::new());
        let events = orchestrator.answer(Uuid::new_v4(), "a perfectly fine answer").await;
        match &events[0] {
            Event::Error { msg } => assert!(msg.contains("Session expired")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn short_answer_gets_a_reprompt_and_touches_nothing() {
        // No gateway expectations: any call would panic the mock.
        let (orchestrator, store) = orchestrator(MockLlmGateway::new());
        let id = Uuid::new_v4();
        orchestrator.start(id, start_request()).await;

        let events = orchestrator.answer(id, "ok").await;
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::Speak { text, ssml } => {
                assert!(text.contains("didn't quite catch that"));
                assert!(ssml.contains("600ms"));
            }
            other => panic!("expected reprompt, got {other:?}"),
        }

        let session = store.get(id).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.turns_completed, 0);
        assert!(session.history.is_empty());
        assert!(session.sentiment_trend.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_multibyte_answer_gets_a_reprompt() {
        // Four characters but twelve UTF-8 bytes; any gateway call would
        // panic the mock.
        let (orchestrator, store) = orchestrator(MockLlmGateway::new());
        let id = Uuid::new_v4();
        orchestrator.start(id, start_request()).await;

        let events = orchestrator.answer(id, "日本語は").await;
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::Speak { text, .. } => assert!(text.contains("didn't quite catch that")),
            other => panic!("expected reprompt, got {other:?}"),
        }

        let session = store.get(id).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.turns_completed, 0);
        assert!(session.history.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn full_interview_closes_after_the_turn_limit() {
        let mut gateway = MockLlmGateway::new();
        gateway
            .expect_generate_reply()
            .times(5)
            .returning(|_, _, _, _| Ok("Great. Tell me more about that.".to_string()));
        let (orchestrator, store) = orchestrator(gateway);
        let id = Uuid::new_v4();
        orchestrator.start(id, start_request()).await;

        for i in 1..=4u32 {
            let events = orchestrator
                .answer(id, &format!("Substantial answer number {i} with detail"))
                .await;
            assert_eq!(events.len(), 1, "turn {i} should only speak");
            match &events[0] {
                Event::Speak { text, .. } => {
                    assert_eq!(text, "Great. Tell me more about that.")
                }
                other => panic!("expected reply, got {other:?}"),
            }
        }

        let events = orchestrator.answer(id, "Final answer with plenty of detail").await;
        assert_eq!(events.len(), 2);
        match &events[0] {
            Event::Speak { text, ssml } => {
                assert!(text.starts_with("Great. Tell me more about that."));
                assert!(text.contains("That's all the questions I have for today"));
                assert!(ssml.contains("800ms"));
            }
            other => panic!("expected closing, got {other:?}"),
        }
        match &events[1] {
            Event::Completed { history } => {
                assert_eq!(history.len(), 5);
                assert_eq!(history[0].answer, "Substantial answer number 1 with detail");
                assert_eq!(history[4].answer, "Final answer with plenty of detail");
            }
            other => panic!("expected completion, got {other:?}"),
        }

        assert!(store.get(id).await.is_none());
        match &orchestrator.answer(id, "one answer too many").await[0] {
            Event::Error { msg } => assert!(msg.contains("Session expired")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn gateway_error_text_is_spoken_as_the_reply() {
        let mut gateway = MockLlmGateway::new();
        gateway.expect_generate_reply().times(1).returning(|_, _, _, _| {
            Err(GatewayError::Status {
                provider: "Groq",
                status: 429,
                body: "rate limit reached".into(),
            })
        });
        let (orchestrator, store) = orchestrator(gateway);
        let id = Uuid::new_v4();
        orchestrator.start(id, start_request()).await;

        let events = orchestrator.answer(id, "A solid answer about my last role").await;
        match &events[0] {
            Event::Speak { text, .. } => {
                assert_eq!(text, "Groq Error 429: rate limit reached")
            }
            other => panic!("expected spoken error text, got {other:?}"),
        }

        let session = store.get(id).await.unwrap();
        assert_eq!(session.lock().await.turns_completed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gateway_receives_credential_and_provider() {
        let mut gateway = MockLlmGateway::new();
        gateway
            .expect_generate_reply()
            .times(1)
            .withf(|credential, user, system, provider| {
                credential == "test-key"
                    && provider == "groq"
                    && user.contains("Backend Engineer")
                    && system.contains("interviewer")
            })
            .returning(|_, _, _, _| Ok("Understood.".to_string()));
        let (orchestrator, _) = orchestrator(gateway);
        let id = Uuid::new_v4();
        orchestrator.start(id, start_request()).await;
        orchestrator.answer(id, "I shipped the payments rewrite").await;
    }

    #[tokio::test]
    async fn disconnect_removes_the_session() {
        let (orchestrator, store) = orchestrator(MockLlmGateway::new());
        let id = Uuid::new_v4();
        orchestrator.start(id, start_request()).await;
        assert!(store.get(id).await.is_some());

        orchestrator.disconnect(id).await;
        assert!(store.get(id).await.is_none());
    }

    #[test]
    fn ssml_wraps_with_break_directive() {
        assert_eq!(
            ssml("Hello there.", 600),
            "<speak>Hello there.<break time=\"600ms\"/></speak>"
        );
    }
}
