//! Illustration requests for finished stories.

use bedtime_core::FinalizedStory;
use bedtime_error::BedtimeResult;
use bedtime_interface::{Illustration, IllustrationProvider};
use tracing::{debug, instrument};

/// Ask `provider` for an illustration of `story`.
///
/// The story's illustration description is already free of human figures, so
/// it is passed through as the prompt. Stories without one yield `None`
/// without calling the provider.
#[instrument(skip_all, fields(title = %story.title()))]
pub async fn request_illustration<P>(
    provider: &P,
    story: &FinalizedStory,
) -> BedtimeResult<Option<Illustration>>
where
    P: IllustrationProvider + ?Sized,
{
    let Some(description) = story
        .illustration_description()
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    else {
        debug!("Story has no illustration description");
        return Ok(None);
    };
    provider.illustrate(description).await
}
