//! The story screen: one generation session and one narration session.

use bedtime_core::{FinalizedStory, StoredStory, StoryId, StoryRequestParameters, VoiceProfile};
use bedtime_error::{
    BedtimeResult, GenerationError, GenerationErrorKind, LibraryError, LibraryErrorKind,
    NarrationError, NarrationErrorKind,
};
use bedtime_generation::{GenerationController, GenerationState};
use bedtime_interface::{NarrationEngine, StoryLibrary, StoryModel};
use bedtime_narration::NarrationSequencer;
use std::sync::Arc;
use tracing::{info, instrument};

/// What happens to narration when the story is regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegeneratePolicy {
    /// Stop narrating; the listener starts it again by hand
    #[default]
    StopNarration,
    /// Start narrating the new story as soon as it is finalized
    RestartNarration,
}

/// Owns the single generation session and single narration session of a screen.
///
/// Starting either one again implicitly cancels or stops the previous one.
/// Generating or regenerating always stops narration first, since the text
/// being read is about to change.
pub struct StoryScreen<M: StoryModel, E: NarrationEngine> {
    controller: GenerationController<M>,
    sequencer: NarrationSequencer<E>,
    parameters: StoryRequestParameters,
    library: Option<Arc<dyn StoryLibrary>>,
    regenerate_policy: RegeneratePolicy,
}

impl<M: StoryModel, E: NarrationEngine> StoryScreen<M, E> {
    /// Create a screen for a story request.
    pub fn new(
        controller: GenerationController<M>,
        sequencer: NarrationSequencer<E>,
        parameters: StoryRequestParameters,
    ) -> Self {
        Self {
            controller,
            sequencer,
            parameters,
            library: None,
            regenerate_policy: RegeneratePolicy::default(),
        }
    }

    /// Persist stories through `library`.
    pub fn with_library(mut self, library: Arc<dyn StoryLibrary>) -> Self {
        self.library = Some(library);
        self
    }

    /// Choose what regeneration does to narration.
    pub fn with_regenerate_policy(mut self, policy: RegeneratePolicy) -> Self {
        self.regenerate_policy = policy;
        self
    }

    /// Parameters of the current request.
    pub fn parameters(&self) -> &StoryRequestParameters {
        &self.parameters
    }

    /// Story shown on the screen, once one is finalized or opened.
    ///
    /// Kept by the controller, so it is current however the run was driven.
    pub fn current(&self) -> Option<&FinalizedStory> {
        self.controller.finalized()
    }

    /// Generation controller.
    pub fn controller(&self) -> &GenerationController<M> {
        &self.controller
    }

    /// Generation controller, for subscribing and stepping through events.
    pub fn controller_mut(&mut self) -> &mut GenerationController<M> {
        &mut self.controller
    }

    /// Narration sequencer.
    pub fn sequencer(&self) -> &NarrationSequencer<E> {
        &self.sequencer
    }

    /// Narration sequencer, for subscribing, pausing and stepping through events.
    pub fn sequencer_mut(&mut self) -> &mut NarrationSequencer<E> {
        &mut self.sequencer
    }

    /// Stop narration and start generating a fresh story.
    ///
    /// Returns once the first item has been merged; step through the rest
    /// with [`controller_mut`](Self::controller_mut) or call
    /// [`finish`](Self::finish).
    ///
    /// # Errors
    ///
    /// Propagates the controller's start failure.
    pub async fn start(&mut self) -> BedtimeResult<()> {
        self.sequencer.stop();
        self.controller.start(&self.parameters).await?;
        Ok(())
    }

    /// Drain the running generation and adopt its story.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the run.
    pub async fn finish(&mut self) -> BedtimeResult<Option<FinalizedStory>> {
        Ok(self.controller.run_to_completion().await?)
    }

    /// Generate a fresh story to completion.
    ///
    /// Returns `None` if the run was cancelled.
    ///
    /// # Errors
    ///
    /// Returns whatever ended the run.
    #[instrument(skip(self), fields(child = %self.parameters.child_name()))]
    pub async fn generate(&mut self) -> BedtimeResult<Option<FinalizedStory>> {
        self.start().await?;
        self.finish().await
    }

    /// Regenerate the story with a modification, replacing it once complete.
    ///
    /// # Errors
    ///
    /// Fails when no story has been generated yet, or with whatever ended the run.
    #[instrument(skip(self, instruction))]
    pub async fn regenerate(&mut self, instruction: &str) -> BedtimeResult<Option<FinalizedStory>> {
        self.sequencer.stop();
        self.controller
            .regenerate(&self.parameters, instruction)
            .await?;
        let story = self.finish().await?;

        if story.is_some() && self.regenerate_policy == RegeneratePolicy::RestartNarration {
            info!("Restarting narration for the regenerated story");
            self.narrate_current(None)?;
        }
        Ok(story)
    }

    /// Cancel generation, keeping whatever has been shown.
    pub fn cancel_generation(&mut self) {
        self.controller.cancel();
    }

    /// Start reading the current story aloud.
    ///
    /// Uses the voice for the request's age bracket unless `voice` is given.
    ///
    /// # Errors
    ///
    /// Fails when there is no story yet or the engine refuses it.
    pub fn narrate_current(&mut self, voice: Option<&VoiceProfile>) -> BedtimeResult<()> {
        let story = self
            .controller
            .finalized()
            .ok_or_else(|| NarrationError::new(NarrationErrorKind::EmptyText))?;
        self.sequencer
            .speak_story(story, *self.parameters.age(), voice)?;
        Ok(())
    }

    /// Save the current story to the library.
    ///
    /// # Errors
    ///
    /// Fails when there is no library, no story, or the library fails.
    #[instrument(skip(self))]
    pub async fn save_current(&self) -> BedtimeResult<StoryId> {
        let library = self.library()?;
        let story = self.current().ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::Unknown(
                "no finalized story to save".to_string(),
            ))
        })?;
        let id = library.save(story, &self.parameters).await?;
        info!(%id, "Story saved to library");
        Ok(id)
    }

    /// Show a saved story, replacing the current one.
    ///
    /// Any generation or narration in progress is cancelled.
    ///
    /// # Errors
    ///
    /// Fails when there is no library or the story is missing.
    #[instrument(skip(self))]
    pub async fn open_saved(&mut self, id: &StoryId) -> BedtimeResult<StoredStory> {
        let stored = self.library()?.get(id).await?;
        self.controller.adopt(stored.story().clone());
        self.sequencer.stop();
        self.parameters = stored.parameters().clone();
        Ok(stored)
    }

    /// Whether a generation is streaming.
    pub fn is_generating(&self) -> bool {
        *self.controller.state() == GenerationState::Generating
    }

    fn library(&self) -> BedtimeResult<Arc<dyn StoryLibrary>> {
        self.library.clone().ok_or_else(|| {
            LibraryError::new(LibraryErrorKind::Storage("no library configured".to_string()))
                .into()
        })
    }
}
