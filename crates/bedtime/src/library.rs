//! In-memory implementation of StoryLibrary.
//!
//! A HashMap-backed library for tests and for the CLI. All stories are lost
//! when the library is dropped.

use async_trait::async_trait;
use bedtime_core::{FinalizedStory, StoredStory, StoryId, StoryRequestParameters};
use bedtime_error::{BedtimeResult, LibraryError, LibraryErrorKind};
use bedtime_interface::StoryLibrary;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// In-memory story library.
///
/// Clones share the same storage.
///
/// # Example
/// ```no_run
/// use bedtime::{InMemoryStoryLibrary, StoryLibrary};
///
/// #[tokio::main]
/// async fn main() {
///     let library = InMemoryStoryLibrary::new();
///     assert!(library.list().await.unwrap().is_empty());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoryLibrary {
    stories: Arc<RwLock<HashMap<StoryId, StoredStory>>>,
}

impl InMemoryStoryLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored stories.
    pub async fn len(&self) -> usize {
        self.stories.read().await.len()
    }

    /// Whether the library is empty.
    pub async fn is_empty(&self) -> bool {
        self.stories.read().await.is_empty()
    }
}

#[async_trait]
impl StoryLibrary for InMemoryStoryLibrary {
    #[instrument(skip_all, fields(title = %story.title()))]
    async fn save(
        &self,
        story: &FinalizedStory,
        parameters: &StoryRequestParameters,
    ) -> BedtimeResult<StoryId> {
        let id = StoryId::new();
        let stored = StoredStory::new(id, story.clone(), parameters.clone(), Utc::now());
        self.stories.write().await.insert(id, stored);
        debug!(%id, "Story saved");
        Ok(id)
    }

    async fn get(&self, id: &StoryId) -> BedtimeResult<StoredStory> {
        self.stories
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| LibraryError::new(LibraryErrorKind::NotFound(id.to_string())).into())
    }

    async fn list(&self) -> BedtimeResult<Vec<StoredStory>> {
        let mut stories: Vec<StoredStory> = self.stories.read().await.values().cloned().collect();
        stories.sort_by(|a, b| b.saved_at().cmp(a.saved_at()));
        Ok(stories)
    }

    async fn delete(&self, id: &StoryId) -> BedtimeResult<()> {
        match self.stories.write().await.remove(id) {
            Some(_) => {
                debug!(%id, "Story deleted");
                Ok(())
            }
            None => Err(LibraryError::new(LibraryErrorKind::NotFound(id.to_string())).into()),
        }
    }
}
