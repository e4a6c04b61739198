//! Streaming story generation for bedtime.
//!
//! This crate turns a schema-constrained model stream into a sequence of
//! immutable story snapshots.
//!
//! # Features
//!
//! - **Merger**: folds partial records into a monotonic snapshot, keeping content plain
//! - **Prompt builder**: deterministic prompts from request parameters
//! - **Controller**: start, cancel and regenerate one generation at a time
//! - **Replay model**: replays a recorded stream, for the CLI and tests
//!
//! # Example
//!
//! ```rust,ignore
//! use bedtime_generation::{GenerationController, ReplayStoryModel};
//!
//! # async fn example(params: bedtime_core::StoryRequestParameters) -> Result<(), Box<dyn std::error::Error>> {
//! let model = ReplayStoryModel::from_jsonl("fox.jsonl")?;
//! let mut controller = GenerationController::new(model);
//! let mut updates = controller.subscribe();
//!
//! controller.start(&params).await?;
//! let story = controller.run_to_completion().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod controller;
mod illustration;
mod merge;
mod prompt;
mod replay;

pub use controller::{GenerationController, GenerationEvent, GenerationState};
pub use illustration::request_illustration;
pub use merge::merge;
pub use prompt::PromptBuilder;
pub use replay::{ReplayItem, ReplayStoryModel};
