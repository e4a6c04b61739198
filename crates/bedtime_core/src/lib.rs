//! Core data types for the bedtime story library.
//!
//! This crate provides the data model shared by generation and narration:
//! request parameters, partial and finalized story records, narration session
//! state, the voice table, and the markup sanitizer that keeps displayed text plain.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod markup;
mod narration;
mod params;
mod record;
mod story_id;
mod voice;

pub use markup::{contains_markup, sanitize, tag_spans, MarkupTag, RESERVED_TAGS};
pub use narration::{NarrationPhase, NarrationSession, PlaybackState, TextRange, WordBoundaryEvent};
pub use params::{
    AgeBracket, Pronouns, StoryLength, StoryRequestParameters, StoryRequestParametersBuilder,
    StoryRequestParametersBuilderError, Tone,
};
pub use record::{FinalizedStory, PartialStoryRecord, StoryField};
pub use story_id::{StoredStory, StoryId};
pub use voice::{VoiceProfile, VoiceSettings, VoiceTable};
