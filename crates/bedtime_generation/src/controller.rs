//! Generation session controller.
//!
//! Owns at most one in-flight model stream, folds its items into a monotonic
//! snapshot and publishes each change to subscribers in arrival order.

use crate::{merge, PromptBuilder};
use bedtime_core::{FinalizedStory, PartialStoryRecord, StoryField, StoryRequestParameters};
use bedtime_error::{GenerationError, GenerationErrorKind, GenerationResult};
use bedtime_interface::{Availability, PartialItemStream, StoryModel, StoryPrompt, StorySchema};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Lifecycle of the controller's current run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationState {
    /// No run has started
    #[default]
    Idle,
    /// A stream is open and items are being merged
    Generating,
    /// The last run produced a finalized story
    Completed,
    /// The last run failed
    Failed(GenerationError),
    /// The last run was cancelled by the caller
    Cancelled,
}

impl GenerationState {
    /// Whether the state is terminal for the current run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationState::Completed | GenerationState::Failed(_) | GenerationState::Cancelled
        )
    }
}

/// A change published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// The snapshot changed
    Snapshot {
        /// The new snapshot
        record: PartialStoryRecord,
        /// Fields that were empty in the previous snapshot
        newly_populated: Vec<StoryField>,
    },
    /// One streamed item was malformed and skipped; the run continues
    ItemRejected(GenerationError),
    /// The stream ended with every required field populated
    Completed(FinalizedStory),
    /// The run ended in failure; the last snapshot stays visible
    Failed(GenerationError),
    /// The run was cancelled; the last snapshot stays visible
    Cancelled,
}

/// Drives story generation against a [`StoryModel`].
///
/// The controller is pull-driven: [`start`](Self::start) opens the stream and
/// waits for the first item, then each [`next_event`](Self::next_event) call
/// consumes items until something observable changes. Starting a new run
/// cancels the current one first, so at most one stream is ever open.
pub struct GenerationController<M: StoryModel> {
    model: M,
    schema: StorySchema,
    prompts: PromptBuilder,
    state: GenerationState,
    snapshot: PartialStoryRecord,
    finalized: Option<FinalizedStory>,
    stream: Option<PartialItemStream>,
    cancel: CancellationToken,
    subscribers: Vec<mpsc::UnboundedSender<GenerationEvent>>,
    run: u64,
}

impl<M: StoryModel> GenerationController<M> {
    /// Create a controller with the default schema and prompt builder.
    pub fn new(model: M) -> Self {
        Self::with_prompts(model, PromptBuilder::default())
    }

    /// Create a controller using a configured prompt builder.
    pub fn with_prompts(model: M, prompts: PromptBuilder) -> Self {
        Self {
            model,
            schema: StorySchema::story(),
            prompts,
            state: GenerationState::Idle,
            snapshot: PartialStoryRecord::default(),
            finalized: None,
            stream: None,
            cancel: CancellationToken::new(),
            subscribers: Vec::new(),
            run: 0,
        }
    }

    /// The underlying model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Schema sent with every stream request.
    pub fn schema(&self) -> &StorySchema {
        &self.schema
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> &PartialStoryRecord {
        &self.snapshot
    }

    /// Latest finalized story, kept across later runs until one completes.
    pub fn finalized(&self) -> Option<&FinalizedStory> {
        self.finalized.as_ref()
    }

    /// Whether a stream is open.
    pub fn is_generating(&self) -> bool {
        self.state == GenerationState::Generating
    }

    /// Number of runs started so far.
    pub fn run_count(&self) -> u64 {
        self.run
    }

    /// Token cancelling the current run.
    ///
    /// Cancelling it from another task ends the run at the next await point;
    /// items arriving afterwards are never merged.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receive every event published from now on, in order, without drops.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<GenerationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Start generating a fresh story.
    ///
    /// Cancels any run in flight, checks availability, opens the stream and
    /// waits for its first item.
    ///
    /// # Errors
    ///
    /// Fails with `ModelUnavailable` (before any stream opens) when the model
    /// cannot serve requests, or with whatever ended the run if it fails on
    /// its first item. The controller's state reflects the failure too.
    #[instrument(skip(self, params), fields(model = self.model.model_name(), age = %params.age(), length = %params.length()))]
    pub async fn start(&mut self, params: &StoryRequestParameters) -> GenerationResult<()> {
        let prompt = self.prompts.story_prompt(params);
        self.begin(prompt).await
    }

    /// Generate a modified version of the last finalized story.
    ///
    /// The new run starts from an empty snapshot; its finalized story replaces
    /// the previous one wholesale once it completes.
    ///
    /// # Errors
    ///
    /// Fails when no story has been finalized yet, plus everything
    /// [`start`](Self::start) can fail with.
    #[instrument(skip(self, params, instruction), fields(model = self.model.model_name()))]
    pub async fn regenerate(
        &mut self,
        params: &StoryRequestParameters,
        instruction: &str,
    ) -> GenerationResult<()> {
        self.cancel();
        let Some(prior) = self.finalized.clone() else {
            let err = GenerationError::new(GenerationErrorKind::Unknown(
                "no finalized story to regenerate".to_string(),
            ));
            self.fail(err.clone());
            return Err(err);
        };
        let prompt = self.prompts.regeneration_prompt(params, &prior, instruction);
        self.begin(prompt).await
    }

    async fn begin(&mut self, prompt: StoryPrompt) -> GenerationResult<()> {
        self.cancel();
        self.run += 1;
        self.cancel = CancellationToken::new();

        if let Availability::Unavailable(reason) = self.model.availability() {
            warn!(run = self.run, %reason, "Story model unavailable");
            let err = GenerationError::new(GenerationErrorKind::ModelUnavailable(reason));
            self.fail(err.clone());
            return Err(err);
        }

        self.snapshot = PartialStoryRecord::default();
        self.state = GenerationState::Generating;
        info!(run = self.run, "Opening story stream");

        let stream = match self.model.open_stream(&prompt, &self.schema).await {
            Ok(stream) => stream,
            Err(err) => {
                self.fail(err.clone());
                return Err(err);
            }
        };
        self.stream = Some(stream);

        match self.next_event().await {
            Some(GenerationEvent::Failed(err)) => Err(err),
            _ => Ok(()),
        }
    }

    /// Consume stream items until something observable happens.
    ///
    /// Returns `None` once the run is no longer generating. Items that merge
    /// into an identical snapshot are absorbed silently.
    pub async fn next_event(&mut self) -> Option<GenerationEvent> {
        loop {
            if self.state != GenerationState::Generating {
                return None;
            }
            let cancel = self.cancel.clone();
            let next = {
                let stream = self.stream.as_mut()?;
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    item = stream.next() => Some(item),
                }
            };

            let Some(item) = next else {
                return Some(self.finish_cancelled());
            };

            match item {
                Some(Ok(value)) => match self.schema.validate(&value) {
                    Ok(partial) => {
                        if let Some(event) = self.apply(&partial) {
                            return Some(event);
                        }
                    }
                    Err(err) => return Some(self.reject(err)),
                },
                Some(Err(err)) if err.kind.is_item_level() => return Some(self.reject(err)),
                Some(Err(err)) => return Some(self.fail(err)),
                None => return Some(self.complete()),
            }
        }
    }

    /// Drain the current run.
    ///
    /// Returns the finalized story, or `None` if the run was cancelled.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the run.
    pub async fn run_to_completion(&mut self) -> GenerationResult<Option<FinalizedStory>> {
        while self.next_event().await.is_some() {}
        match &self.state {
            GenerationState::Failed(err) => Err(err.clone()),
            GenerationState::Completed => Ok(self.finalized.clone()),
            _ => Ok(None),
        }
    }

    /// Treat `story` as the last finalized story, such as one reopened from a library.
    ///
    /// Cancels any run in flight; the snapshot shows the adopted story.
    pub fn adopt(&mut self, story: FinalizedStory) {
        self.cancel();
        debug!(title = %story.title(), "Adopting finalized story");
        self.snapshot = PartialStoryRecord::from(&story);
        self.finalized = Some(story);
    }

    /// Cancel the current run, if any.
    ///
    /// The stream is dropped immediately and nothing it yields afterwards is
    /// merged. The last published snapshot stays visible. Idempotent.
    pub fn cancel(&mut self) {
        if self.state != GenerationState::Generating {
            return;
        }
        self.cancel.cancel();
        self.finish_cancelled();
    }

    fn apply(&mut self, partial: &PartialStoryRecord) -> Option<GenerationEvent> {
        let merged = merge(&self.snapshot, partial);
        if merged == self.snapshot {
            debug!(run = self.run, "Item left snapshot unchanged");
            return None;
        }
        let newly_populated = merged.newly_populated(&self.snapshot);
        if !newly_populated.is_empty() {
            debug!(run = self.run, fields = ?newly_populated, "Fields populated");
        }
        self.snapshot = merged;
        let event = GenerationEvent::Snapshot {
            record: self.snapshot.clone(),
            newly_populated,
        };
        self.publish(&event);
        Some(event)
    }

    fn reject(&mut self, err: GenerationError) -> GenerationEvent {
        warn!(run = self.run, error = %err, "Skipping malformed item");
        let event = GenerationEvent::ItemRejected(err);
        self.publish(&event);
        event
    }

    fn complete(&mut self) -> GenerationEvent {
        self.stream = None;
        match self.schema.finalize(&self.snapshot) {
            Ok(story) => {
                info!(run = self.run, title = %story.title(), "Story finalized");
                self.finalized = Some(story.clone());
                self.state = GenerationState::Completed;
                let event = GenerationEvent::Completed(story);
                self.publish(&event);
                event
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: GenerationError) -> GenerationEvent {
        error!(run = self.run, error = %err, "Generation failed");
        self.stream = None;
        self.state = GenerationState::Failed(err.clone());
        let event = GenerationEvent::Failed(err);
        self.publish(&event);
        event
    }

    fn finish_cancelled(&mut self) -> GenerationEvent {
        info!(run = self.run, "Generation cancelled");
        self.stream = None;
        self.state = GenerationState::Cancelled;
        let event = GenerationEvent::Cancelled;
        self.publish(&event);
        event
    }

    fn publish(&mut self, event: &GenerationEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl<M: StoryModel> Drop for GenerationController<M> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
