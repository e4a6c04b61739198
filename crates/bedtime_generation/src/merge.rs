//! Partial record merging.

use bedtime_core::{sanitize, PartialStoryRecord, StoryField};
use strum::IntoEnumIterator;
use tracing::trace;

/// Fold an incoming partial record into the previous snapshot.
///
/// For each field, a non-blank incoming value replaces the previous one; a
/// blank or missing incoming value leaves it alone, so a populated field never
/// reverts to empty. `title` and `content` are display and narration text, so
/// both pass through the sanitizer first.
///
/// Pure: the running snapshot belongs to the caller.
///
/// # Examples
///
/// ```
/// use bedtime_core::PartialStoryRecord;
/// use bedtime_generation::merge;
///
/// let previous = PartialStoryRecord {
///     title: Some("The Fox".to_string()),
///     ..Default::default()
/// };
/// let incoming = PartialStoryRecord {
///     content: Some("Hello <break time=\"500ms\"/> world".to_string()),
///     ..Default::default()
/// };
///
/// let merged = merge(&previous, &incoming);
/// assert_eq!(merged.title.as_deref(), Some("The Fox"));
/// assert_eq!(merged.content.as_deref(), Some("Hello world"));
/// ```
pub fn merge(previous: &PartialStoryRecord, incoming: &PartialStoryRecord) -> PartialStoryRecord {
    let mut merged = previous.clone();

    for field in StoryField::iter() {
        let Some(value) = incoming.field(field) else {
            continue;
        };
        let value = if is_plain_text(field) {
            sanitize(value)
        } else {
            value.to_string()
        };
        if value.trim().is_empty() {
            trace!(field = %field, "Ignoring blank incoming value");
            continue;
        }
        *merged.field_mut(field) = Some(value);
    }

    // Snapshots handed in from elsewhere (restored state) get the same guarantee.
    for text in [merged.title.as_mut(), merged.content.as_mut()].into_iter().flatten() {
        *text = sanitize(text);
    }

    merged
}

fn is_plain_text(field: StoryField) -> bool {
    matches!(field, StoryField::Title | StoryField::Content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: Option<&str>, content: Option<&str>) -> PartialStoryRecord {
        PartialStoryRecord {
            title: title.map(str::to_string),
            content: content.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_never_reverts() {
        let previous = record(Some("The Fox"), Some("Once"));
        let merged = merge(&previous, &record(Some(""), Some("  ")));
        assert_eq!(merged, previous);
    }

    #[test]
    fn test_refinement_replaces_value() {
        let previous = record(None, Some("Once upon"));
        let merged = merge(&previous, &record(None, Some("Once upon a time")));
        assert_eq!(merged.content.as_deref(), Some("Once upon a time"));
    }

    #[test]
    fn test_markup_only_content_does_not_populate() {
        let merged = merge(&PartialStoryRecord::default(), &record(None, Some("<break/>")));
        assert!(merged.content.is_none());
    }

    #[test]
    fn test_dirty_previous_content_is_cleaned() {
        let previous = record(None, Some("Hi <emphasis>there</emphasis>"));
        let merged = merge(&previous, &PartialStoryRecord::default());
        assert_eq!(merged.content.as_deref(), Some("Hi there"));
    }

    #[test]
    fn test_title_markup_is_stripped() {
        let merged = merge(
            &PartialStoryRecord::default(),
            &record(Some("<emphasis>The Fox</emphasis>"), None),
        );
        assert_eq!(merged.title.as_deref(), Some("The Fox"));

        let merged = merge(&merged, &record(Some("<speak>"), None));
        assert_eq!(merged.title.as_deref(), Some("The Fox"));

        let restored = record(Some("The <break/>Fox"), None);
        let merged = merge(&restored, &PartialStoryRecord::default());
        assert_eq!(merged.title.as_deref(), Some("The Fox"));
    }

    #[test]
    fn test_markup_variant_kept_verbatim() {
        let incoming = PartialStoryRecord {
            markup_content: Some("<speak>Hi</speak>".to_string()),
            ..Default::default()
        };
        let merged = merge(&PartialStoryRecord::default(), &incoming);
        assert_eq!(merged.markup_content.as_deref(), Some("<speak>Hi</speak>"));
    }
}
