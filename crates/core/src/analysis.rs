//! Keyword-based lexical signals over candidate answers.
//!
//! All three signals are deterministic given the fixed indicator lists: no
//! external calls, no model inference. Matching is case-insensitive substring
//! membership, which keeps the analyzer cheap enough to run on every turn.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;

const POSITIVE_INDICATORS: &[&str] = &[
    "excited",
    "love",
    "passionate",
    "enjoy",
    "thrilled",
    "proud",
    "accomplished",
    "satisfied",
    "motivated",
    "inspired",
];

const NEGATIVE_INDICATORS: &[&str] = &[
    "frustrated",
    "disappointed",
    "struggled",
    "challenged",
    "difficult",
    "tough",
    "stress",
    "overwhelmed",
    "hard",
    "struggle",
];

const CONFIDENCE_INDICATORS: &[&str] = &[
    "definitely",
    "clearly",
    "absolutely",
    "confidently",
    "certainly",
    "undoubtedly",
    "without a doubt",
    "sure",
];

const VAGUE_INDICATORS: &[&str] = &[
    "kind of",
    "sort of",
    "maybe",
    "a bit",
    "somewhat",
    "pretty much",
    "thing is",
    "well",
    "um",
    "uh",
];

/// Three-valued sentiment polarity.
///
/// Serialized as the integers -1 / 0 / 1, which is the shape the interview
/// history payload carries on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    pub fn score(self) -> i8 {
        match self {
            Sentiment::Negative => -1,
            Sentiment::Neutral => 0,
            Sentiment::Positive => 1,
        }
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.score())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match i8::deserialize(deserializer)? {
            -1 => Ok(Sentiment::Negative),
            0 => Ok(Sentiment::Neutral),
            1 => Ok(Sentiment::Positive),
            other => Err(serde::de::Error::custom(format!(
                "sentiment score out of range: {other}"
            ))),
        }
    }
}

/// Signals derived from one sanitized answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerSignals {
    pub sentiment: Sentiment,
    pub vague: bool,
    pub confident: bool,
}

fn hits(lower: &str, indicators: &[&str]) -> usize {
    indicators.iter().filter(|w| lower.contains(**w)).count()
}

/// Scores a sanitized answer for sentiment polarity, vagueness, and confidence.
///
/// Sentiment compares how many positive versus negative indicators appear in
/// the text; ties (including none on either side) resolve to neutral.
pub fn analyze(text: &str) -> AnswerSignals {
    let lower = text.to_lowercase();
    let sentiment = match hits(&lower, POSITIVE_INDICATORS).cmp(&hits(&lower, NEGATIVE_INDICATORS))
    {
        Ordering::Greater => Sentiment::Positive,
        Ordering::Less => Sentiment::Negative,
        Ordering::Equal => Sentiment::Neutral,
    };
    AnswerSignals {
        sentiment,
        vague: VAGUE_INDICATORS.iter().any(|p| lower.contains(p)),
        confident: CONFIDENCE_INDICATORS.iter().any(|p| lower.contains(p)),
    }
}
