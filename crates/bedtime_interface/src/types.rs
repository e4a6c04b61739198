//! Core type definitions for the bedtime interface.

use bedtime_core::WordBoundaryEvent;
use bedtime_error::{GenerationResult, NarrationError, UnavailableReason};
use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Whether the generative capability can serve a request right now.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Availability {
    /// Ready to open a stream
    Available,
    /// Not usable; the reason says why
    Unavailable(UnavailableReason),
}

impl Availability {
    /// Whether the capability is ready.
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// The deterministic prompt sent to a story model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPrompt {
    /// Standing instructions (role, safety, output rules)
    pub instructions: String,
    /// The request itself
    pub prompt: String,
    /// Sampling temperature, provider default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Ordered stream of raw partial items from a story model.
///
/// Each item is a JSON object holding whatever fields the model has produced
/// so far. A malformed item arrives as `Err` with a schema violation and the
/// stream may continue; any other `Err` ends the run.
pub type PartialItemStream =
    Pin<Box<dyn Stream<Item = GenerationResult<serde_json::Value>> + Send>>;

/// One notification from a narration engine.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationEvent {
    /// The engine started vocalizing a span of its input text
    WordBoundary(WordBoundaryEvent),
    /// The engine finished the utterance naturally
    PhaseComplete,
    /// The engine gave up mid-utterance
    Failed(NarrationError),
}

/// Ordered stream of narration events for one utterance.
pub type NarrationEvents = Pin<Box<dyn Stream<Item = NarrationEvent> + Send>>;

/// A raster illustration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Illustration {
    /// MIME type of the image
    pub mime: String,
    /// Encoded image bytes
    pub data: Vec<u8>,
}
