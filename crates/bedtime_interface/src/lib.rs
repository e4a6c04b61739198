//! Trait definitions for the bedtime story library.
//!
//! The generation and narration cores talk to four external collaborators:
//! a schema-constrained story model, a narration engine, an illustration
//! capability and a story library. This crate defines those seams plus the
//! explicit [`StorySchema`] value passed to the model.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod schema;
mod traits;
mod types;

pub use schema::{FieldKind, FieldSpec, FieldValidator, StorySchema};
pub use traits::{IllustrationProvider, NarrationEngine, StoryLibrary, StoryModel};
pub use types::{
    Availability, Illustration, NarrationEvent, NarrationEvents, PartialItemStream, StoryPrompt,
};
