//! Trait definitions for the external collaborators.

use crate::{Availability, Illustration, NarrationEvents, PartialItemStream, StoryPrompt, StorySchema};
use async_trait::async_trait;
use bedtime_core::{FinalizedStory, StoredStory, StoryId, StoryRequestParameters, VoiceProfile};
use bedtime_error::{BedtimeResult, GenerationResult, NarrationResult};

/// A generative capability producing schema-constrained story records.
#[async_trait]
pub trait StoryModel: Send + Sync {
    /// Report whether a stream could be opened now.
    ///
    /// Synchronous so that unavailability fails fast, before any stream exists.
    fn availability(&self) -> Availability;

    /// Open a stream of partial items for `prompt`, constrained by `schema`.
    async fn open_stream(
        &self,
        prompt: &StoryPrompt,
        schema: &StorySchema,
    ) -> GenerationResult<PartialItemStream>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Audio narration of a text, reporting the word being spoken.
///
/// Implementations do their audio work in the background and deliver events
/// through the returned stream. Starting a new utterance supersedes the old one.
pub trait NarrationEngine: Send + Sync {
    /// Begin speaking `text`; does not block.
    fn speak(&self, text: &str, voice: &VoiceProfile) -> NarrationResult<NarrationEvents>;

    /// Hold the current position.
    fn pause(&self);

    /// Continue from the held position.
    fn resume(&self);

    /// Silence the engine and end the current utterance.
    fn stop(&self);
}

/// Produces an illustration from an already human-figure-filtered prompt.
#[async_trait]
pub trait IllustrationProvider: Send + Sync {
    /// Yield zero or one image.
    async fn illustrate(&self, prompt: &str) -> BedtimeResult<Option<Illustration>>;
}

/// External store for finished stories; owns the storage format.
#[async_trait]
pub trait StoryLibrary: Send + Sync {
    /// Store a story with the parameters that produced it.
    async fn save(
        &self,
        story: &FinalizedStory,
        parameters: &StoryRequestParameters,
    ) -> BedtimeResult<StoryId>;

    /// Fetch a stored story.
    async fn get(&self, id: &StoryId) -> BedtimeResult<StoredStory>;

    /// All stored stories, newest first.
    async fn list(&self) -> BedtimeResult<Vec<StoredStory>>;

    /// Remove a stored story.
    async fn delete(&self, id: &StoryId) -> BedtimeResult<()>;
}
