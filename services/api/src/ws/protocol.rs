//! Defines the WebSocket message protocol between the browser client and the server.

use hirevox_core::{Event, session::Turn};
use serde::{Deserialize, Serialize};

fn default_provider() -> String {
    "groq".to_string()
}

/// Messages sent from the client (browser) to the server.
///
/// No `Debug` impl: the start message carries the caller's API credential,
/// which must never end up in a log line.
#[derive(Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Begins a new interview on this connection.
    #[serde(rename = "start_voice_interview")]
    StartVoiceInterview {
        api_key: String,
        #[serde(default = "default_provider")]
        provider: String,
        job_role: String,
        job_desc: String,
    },
    /// A transcribed utterance from the candidate.
    #[serde(rename = "user_spoke")]
    UserSpoke { text: String },
}

/// Messages sent from the server to the client (browser).
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A spoken turn, with a speech-markup envelope for the TTS client.
    AiSpeak { text: String, ssml: String },
    /// Reports a recoverable error to the client.
    Error { msg: String },
    /// Final notification carrying the full accepted-answer history.
    InterviewComplete { history: Vec<Turn> },
}

impl From<Event> for ServerMessage {
    fn from(event: Event) -> Self {
        match event {
            Event::Speak { text, ssml } => ServerMessage::AiSpeak { text, ssml },
            Event::Error { msg } => ServerMessage::Error { msg },
            Event::Completed { history } => ServerMessage::InterviewComplete { history },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hirevox_core::analysis::Sentiment;

    #[test]
    fn start_message_deserializes_with_explicit_provider() {
        let raw = r#"{"type":"start_voice_interview","api_key":"k","provider":"together","job_role":"SRE","job_desc":"Keep it up"}"#;
        match serde_json::from_str::<ClientMessage>(raw).unwrap() {
            ClientMessage::StartVoiceInterview {
                api_key,
                provider,
                job_role,
                job_desc,
            } => {
                assert_eq!(api_key, "k");
                assert_eq!(provider, "together");
                assert_eq!(job_role, "SRE");
                assert_eq!(job_desc, "Keep it up");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn start_message_defaults_the_provider() {
        let raw = r#"{"type":"start_voice_interview","api_key":"k","job_role":"SRE","job_desc":"d"}"#;
        match serde_json::from_str::<ClientMessage>(raw).unwrap() {
            ClientMessage::StartVoiceInterview { provider, .. } => assert_eq!(provider, "groq"),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn user_spoke_deserializes() {
        let raw = r#"{"type":"user_spoke","text":"I led the rollout"}"#;
        match serde_json::from_str::<ClientMessage>(raw).unwrap() {
            ClientMessage::UserSpoke { text } => assert_eq!(text, "I led the rollout"),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn ai_speak_serializes_with_tag_and_ssml() {
        let msg = ServerMessage::AiSpeak {
            text: "Hello.".into(),
            ssml: "<speak>Hello.<break time=\"600ms\"/></speak>".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "ai_speak");
        assert_eq!(json["text"], "Hello.");
        assert!(json["ssml"].as_str().unwrap().contains("600ms"));
    }

    #[test]
    fn interview_complete_carries_history_turns() {
        let msg = ServerMessage::InterviewComplete {
            history: vec![Turn {
                answer: "I enjoy the work".into(),
                sentiment: Sentiment::Positive,
                vague: false,
                confident: true,
            }],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "interview_complete");
        assert_eq!(json["history"][0]["answer"], "I enjoy the work");
        assert_eq!(json["history"][0]["sentiment"], 1);
        assert_eq!(json["history"][0]["confident"], true);
    }

    #[test]
    fn core_events_map_onto_server_messages() {
        let speak: ServerMessage = Event::Speak {
            text: "t".into(),
            ssml: "s".into(),
        }
        .into();
        assert!(matches!(speak, ServerMessage::AiSpeak { .. }));

        let err: ServerMessage = Event::Error { msg: "m".into() }.into();
        assert!(matches!(err, ServerMessage::Error { .. }));

        let done: ServerMessage = Event::Completed { history: vec![] }.into();
        assert!(matches!(done, ServerMessage::InterviewComplete { .. }));
    }
}
