//! Narration session state and word-boundary events.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, start + len)` within some text.
///
/// # Examples
///
/// ```
/// use bedtime_core::TextRange;
///
/// let range = TextRange::new(3, 3);
/// assert_eq!(range.end(), 6);
/// assert_eq!(range.slice("Hi Sam"), Some("Sam"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TextRange {
    /// Byte offset of the first character
    pub start: usize,
    /// Length in bytes
    pub len: usize,
}

impl TextRange {
    /// Create a range from a start offset and a length.
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Create a range from start and end offsets; an inverted pair yields an empty range.
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The covered slice of `text`, if the range lies on character boundaries inside it.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end())
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

/// Which text section the narration is currently vocalizing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
pub enum NarrationPhase {
    /// Nothing is being narrated
    #[default]
    Idle,
    /// The story title is being read
    Title,
    /// The story body is being read
    Body,
}

/// Playback state, orthogonal to the phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
pub enum PlaybackState {
    /// No audio; session torn down or never started
    #[default]
    Stopped,
    /// The engine is speaking
    Playing,
    /// The engine is holding its position
    Paused,
}

/// A narration engine's report of the span currently being vocalized.
///
/// `range` is expressed in the engine's own input text, which may be the
/// markup variant rather than the displayed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordBoundaryEvent {
    /// Monotonically increasing index within one utterance
    pub sequence: u64,
    /// Span within the engine input text
    pub range: TextRange,
}

/// Observable state of one narration run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NarrationSession {
    /// Current phase
    pub phase: NarrationPhase,
    /// Current playback state
    pub playback: PlaybackState,
    /// Highlighted span of the displayed text for the current phase, if any
    pub highlight: Option<TextRange>,
    /// Fraction of the body already vocalized, in `[0, 1]`
    pub progress: f64,
}

impl NarrationSession {
    /// Whether a narration run is live (playing or paused).
    pub fn is_active(&self) -> bool {
        self.playback != PlaybackState::Stopped
    }
}
