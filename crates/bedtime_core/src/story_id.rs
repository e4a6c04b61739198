//! Identifiers for stories handed to the library.

use crate::{FinalizedStory, StoryRequestParameters};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned by a story library.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
pub struct StoryId(Uuid);

impl StoryId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

/// A story together with the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct StoredStory {
    /// Library id
    id: StoryId,
    /// The story itself
    story: FinalizedStory,
    /// Parameters used to generate it
    parameters: StoryRequestParameters,
    /// When it was saved
    saved_at: DateTime<Utc>,
}
