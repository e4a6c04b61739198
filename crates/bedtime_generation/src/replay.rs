//! A story model that replays a recorded stream.
//!
//! Scripts are JSON Lines files: each line is one partial item exactly as a
//! model would stream it. Used by the CLI to drive the controller without a
//! live model, and by tests.

use async_trait::async_trait;
use bedtime_error::{
    BedtimeResult, GenerationError, GenerationErrorKind, GenerationResult, JsonError,
    UnavailableReason,
};
use bedtime_interface::{Availability, PartialItemStream, StoryModel, StoryPrompt, StorySchema};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument};

/// One scripted stream element.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayItem {
    /// A raw partial item
    Item(Value),
    /// A line that failed to parse; streamed as a schema violation
    Malformed(String),
    /// Transport failure; ends the stream
    Interrupt(String),
}

/// Replays a fixed list of items each time a stream is opened.
///
/// # Examples
///
/// ```
/// use bedtime_generation::ReplayStoryModel;
/// use bedtime_interface::StoryModel;
/// use serde_json::json;
///
/// let model = ReplayStoryModel::new(vec![json!({"title": "The Fox"})]);
/// assert!(model.availability().is_available());
/// assert_eq!(model.model_name(), "replay");
/// ```
#[derive(Debug)]
pub struct ReplayStoryModel {
    name: String,
    items: Vec<ReplayItem>,
    availability: Availability,
    item_delay: Duration,
    prompts: Mutex<Vec<StoryPrompt>>,
}

impl ReplayStoryModel {
    /// Replay `items` in order.
    pub fn new(items: Vec<Value>) -> Self {
        Self::from_items(items.into_iter().map(ReplayItem::Item).collect())
    }

    /// Replay scripted elements, including failures.
    pub fn from_items(items: Vec<ReplayItem>) -> Self {
        Self {
            name: "replay".to_string(),
            items,
            availability: Availability::Available,
            item_delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Load a JSON Lines script. Blank lines are skipped; lines that are not
    /// JSON replay as schema violations.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_jsonl(path: impl AsRef<Path>) -> BedtimeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            JsonError::new(format!("Failed to read script {}: {}", path.display(), e))
        })?;
        let model = Self::from_jsonl_str(&text).named(path.display().to_string());
        debug!(items = model.items.len(), "Loaded replay script");
        Ok(model)
    }

    /// Parse a JSON Lines script held in memory.
    pub fn from_jsonl_str(text: &str) -> Self {
        let items = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match serde_json::from_str(line) {
                Ok(value) => ReplayItem::Item(value),
                Err(_) => ReplayItem::Malformed(line.to_string()),
            })
            .collect();
        Self::from_items(items)
    }

    /// Rename the model, for logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Report a fixed availability.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Report the model as unavailable for `reason`.
    pub fn unavailable(self, reason: UnavailableReason) -> Self {
        self.with_availability(Availability::Unavailable(reason))
    }

    /// Wait between items, to imitate a live model.
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Break the stream after `count` elements.
    pub fn with_interruption_after(mut self, count: usize) -> Self {
        self.items.truncate(count);
        self.items
            .push(ReplayItem::Interrupt("connection reset".to_string()));
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<StoryPrompt> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl StoryModel for ReplayStoryModel {
    fn availability(&self) -> Availability {
        self.availability.clone()
    }

    async fn open_stream(
        &self,
        prompt: &StoryPrompt,
        _schema: &StorySchema,
    ) -> GenerationResult<PartialItemStream> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.clone());
        }
        let items = self.items.clone();
        let delay = self.item_delay;

        let stream = async_stream::stream! {
            for item in items {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                match item {
                    ReplayItem::Item(value) => yield Ok(value),
                    ReplayItem::Malformed(line) => {
                        yield Err(GenerationError::schema(format!("unparseable item: {}", line)));
                    }
                    ReplayItem::Interrupt(reason) => {
                        yield Err(GenerationError::new(GenerationErrorKind::StreamInterrupted(reason)));
                        break;
                    }
                }
            }
        };
        Ok(Box::pin(stream))
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
