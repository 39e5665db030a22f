//! Human-like response pacing.
//!
//! The model emulates how long a person pauses before replying: longer
//! answers earn a longer pause, vague answers more so, with a little jitter
//! for realism. The result is awaited as a cooperative delay, never a
//! blocking sleep, so one session's pause does not stall the others.

use std::time::Duration;

const BASE_SECS: f64 = 0.6;
const LENGTH_CAP_SECS: f64 = 1.2;
const VAGUENESS_SECS: f64 = 0.8;
const JITTER_SECS: f64 = 0.2;
const MIN_SECS: f64 = 0.5;
const MAX_SECS: f64 = 2.5;

/// Computes the thinking delay to insert before replying to `text`.
///
/// Always within 0.5..=2.5 seconds regardless of input.
pub fn thinking_delay(text: &str, vague: bool) -> Duration {
    let jitter = rand::random_range(-JITTER_SECS..JITTER_SECS);
    Duration::from_secs_f64(delay_secs(text, vague, jitter))
}

fn delay_secs(text: &str, vague: bool, jitter: f64) -> f64 {
    let words = text.split_whitespace().count() as f64;
    let length_factor = (words / 20.0).min(LENGTH_CAP_SECS);
    let vagueness_factor = if vague { VAGUENESS_SECS } else { 0.0 };
    (BASE_SECS + length_factor + vagueness_factor + jitter).clamp(MIN_SECS, MAX_SECS)
}
