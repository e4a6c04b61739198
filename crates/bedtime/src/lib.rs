//! Bedtime - personalized children's stories, generated and read aloud.
//!
//! A child's name, age and a few preferences go in; a story streams out field
//! by field, and can then be narrated with the current word highlighted.
//!
//! # Features
//!
//! - **Streaming generation**: monotonic snapshots from a schema-constrained model
//! - **Plain display text**: narration markup never reaches the screen
//! - **Narration**: title then body, with pause, resume and stop
//! - **Word highlighting**: engine offsets mapped onto the displayed text
//! - **Story library**: save and reopen finished stories
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bedtime::{
//!     AgeBracket, GenerationController, NarrationSequencer, PacedNarrationEngine,
//!     ReplayStoryModel, StoryRequestParameters, StoryScreen,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = StoryRequestParameters::builder()
//!         .child_name("Sam")
//!         .age(AgeBracket::EarlyReader)
//!         .setting("a treehouse")
//!         .build()?;
//!
//!     let controller = GenerationController::new(ReplayStoryModel::from_jsonl("fox.jsonl")?);
//!     let sequencer = NarrationSequencer::new(PacedNarrationEngine::default());
//!     let mut screen = StoryScreen::new(controller, sequencer, params);
//!
//!     if let Some(story) = screen.generate().await? {
//!         println!("{} {}", story.emoji(), story.title());
//!         screen.narrate_current(None)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `bedtime_error` - Error types
//! - `bedtime_core` - Data model, sanitizer, voice table
//! - `bedtime_interface` - Model, engine, illustration and library traits; story schema
//! - `bedtime_config` - Layered TOML configuration
//! - `bedtime_generation` - Merger, prompt builder, generation controller
//! - `bedtime_narration` - Word-boundary mapper, phase sequencer, paced engine
//!
//! This crate re-exports everything and adds the story screen, an in-memory
//! library and telemetry setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod library;
mod screen;
mod telemetry;

pub use library::InMemoryStoryLibrary;
pub use screen::{RegeneratePolicy, StoryScreen};
pub use telemetry::init_console_telemetry;

pub use bedtime_config::{
    BedtimeConfig, GenerationSettings, NarrationSettings, StorySettings, WordTargets,
};
pub use bedtime_core::*;
pub use bedtime_error::*;
pub use bedtime_generation::{
    GenerationController, GenerationEvent, GenerationState, PromptBuilder, ReplayItem,
    ReplayStoryModel, merge, request_illustration,
};
pub use bedtime_interface::*;
pub use bedtime_narration::{
    NarrationSequencer, PacedNarrationEngine, SequencerEvent, WordBoundaryMapper, map_range,
};
